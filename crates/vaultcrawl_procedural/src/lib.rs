//! # Vaultcrawl Procedural Generation
//!
//! Deterministic maze layouts derived from a document-id set.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: the same document ids always produce the same maze
//! 2. **Cached**: a layout is keyed by a signature and reused verbatim while
//!    the signature matches
//! 3. **Perfect base**: every cell is reachable through base passages alone
//! 4. **Overlay only**: link doors never open a wall the carver left closed
//!
//! ## Core Components
//!
//! - `content_hash32` / `LayoutSeed`: signature hashing and RNG seeding
//! - `carve_perfect_maze` / `braid`: maze connectivity
//! - `LayoutGenerator`: grid sizing, room placement, reuse and reconciliation
//! - `MazeLayout::update_link_openings`: hyperlink doors
//! - `PersistedLayout`: the durable record and its validation
//!
//! ## Example
//!
//! ```rust,ignore
//! use vaultcrawl_procedural::{LayoutConfig, LayoutGenerator};
//!
//! let generator = LayoutGenerator::new(LayoutConfig::default());
//! let layout = generator.build_or_reuse(&graph, None).expect("non-empty graph");
//!
//! // Persist and reuse on the next load
//! let record = layout.to_persisted();
//! let again = generator.build_or_reuse(&graph, Some(&record)).unwrap();
//! assert_eq!(again.signature(), layout.signature());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod grid;
pub mod hash;
pub mod layout;
pub mod maze;
pub mod overlay;
pub mod persisted;

pub use error::{LayoutError, LayoutResult};
pub use grid::{grid_dimensions, neighbor_index};
pub use hash::{content_hash32, LayoutSeed};
pub use layout::{layout_signature, LayoutConfig, LayoutGenerator, MazeLayout, LAYOUT_VERSION};
pub use maze::{braid, carve_perfect_maze};
pub use persisted::PersistedLayout;
