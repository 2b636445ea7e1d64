//! # Layout Error Types
//!
//! Raised when a layout (usually a persisted one) fails validation. The
//! generator never surfaces these to players: a rejected layout is simply
//! regenerated.

use thiserror::Error;

use vaultcrawl_core::Direction;

/// Reasons a layout is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Written by a different generator format.
    #[error("layout version {found} does not match generator version {expected}")]
    VersionMismatch {
        /// Version found in the record.
        found: u32,
        /// Version this generator writes.
        expected: u32,
    },

    /// Cell count is not a whole number of rows.
    #[error("grid width {width} does not divide cell count {cell_count}")]
    GridMismatch {
        /// Declared width.
        width: usize,
        /// Declared cell count.
        cell_count: usize,
    },

    /// Per-cell arrays disagree with the cell count.
    #[error("expected {expected} cells, found {rooms} rooms and {passages} passage masks")]
    LengthMismatch {
        /// Declared cell count.
        expected: usize,
        /// Length of the room order.
        rooms: usize,
        /// Length of the passage array.
        passages: usize,
    },

    /// A passage mask lies outside `[0, 15]`.
    #[error("passage value {value} at cell {index} is out of range")]
    PassageOutOfRange {
        /// Cell index.
        index: usize,
        /// Offending raw value.
        value: u8,
    },

    /// A passage opens through the outer wall of the grid.
    #[error("cell {index} opens {direction} through the grid edge")]
    EdgePassage {
        /// Cell index.
        index: usize,
        /// Direction of the opening.
        direction: Direction,
    },

    /// A passage is open on one side only.
    #[error("cell {index} opens {direction} but its neighbor does not open back")]
    AsymmetricPassage {
        /// Cell index.
        index: usize,
        /// Direction of the opening.
        direction: Direction,
    },

    /// A link door exists without a base passage under it.
    #[error("cell {index} has a link door {direction} without a base passage")]
    UnbackedLinkDoor {
        /// Cell index.
        index: usize,
        /// Direction of the door.
        direction: Direction,
    },

    /// A room id appears in more than one cell.
    #[error("room {0} occupies more than one cell")]
    DuplicateRoom(String),

    /// The layout has no cells.
    #[error("layout has no cells")]
    Empty,
}

/// Result type for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;
