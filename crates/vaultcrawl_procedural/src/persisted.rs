//! # Persisted Layout Record
//!
//! The durable form of a layout:
//!
//! ```text
//! { version, signature, width, cellCount, noteOrder, basePassages }
//! ```
//!
//! Loading is strict. A record from another format version, with lengths
//! that disagree with `width x (cellCount / width)`, or with a passage value
//! outside `[0, 15]` is rejected and the caller regenerates.

use serde::{Deserialize, Serialize};

use vaultcrawl_core::{Passages, RoomId};

use crate::error::{LayoutError, LayoutResult};
use crate::layout::{MazeLayout, LAYOUT_VERSION};

/// A layout as stored in the host's key-value store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedLayout {
    /// Generator format version.
    pub version: u32,
    /// Cache key.
    pub signature: String,
    /// Grid width.
    pub width: usize,
    /// Total cells.
    pub cell_count: usize,
    /// Room id per cell, voids included.
    pub note_order: Vec<RoomId>,
    /// Raw passage bits per cell.
    pub base_passages: Vec<u8>,
}

impl TryFrom<&PersistedLayout> for MazeLayout {
    type Error = LayoutError;

    fn try_from(record: &PersistedLayout) -> LayoutResult<Self> {
        if record.version != LAYOUT_VERSION {
            return Err(LayoutError::VersionMismatch {
                found: record.version,
                expected: LAYOUT_VERSION,
            });
        }
        if record.width == 0 || record.cell_count == 0 || record.cell_count % record.width != 0 {
            return Err(LayoutError::GridMismatch {
                width: record.width,
                cell_count: record.cell_count,
            });
        }
        if record.note_order.len() != record.cell_count
            || record.base_passages.len() != record.cell_count
        {
            return Err(LayoutError::LengthMismatch {
                expected: record.cell_count,
                rooms: record.note_order.len(),
                passages: record.base_passages.len(),
            });
        }

        let passages = record
            .base_passages
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                Passages::from_bits(value).ok_or(LayoutError::PassageOutOfRange { index, value })
            })
            .collect::<LayoutResult<Vec<_>>>()?;

        MazeLayout::from_parts(
            record.width,
            record.note_order.clone(),
            passages,
            record.signature.clone(),
        )
    }
}
