//! # Vaultcrawl Core
//!
//! Shared vocabulary for the Vaultcrawl dungeon.
//!
//! ## Core Components
//!
//! - `Direction` / `Passages`: grid directions and 4-bit wall-opening masks
//! - `DocumentNode` / `DocumentGraph`: the host-supplied corpus graph
//! - Void markers: synthetic ids for filler cells
//!
//! ## Example
//!
//! ```rust,ignore
//! use vaultcrawl_core::{DocumentGraph, DocumentNode};
//!
//! let mut graph = DocumentGraph::new();
//! graph.insert_node(DocumentNode::new("a.md", "A"))?;
//! graph.insert_node(DocumentNode::new("b.md", "B"))?;
//! graph.add_link("a.md", "b.md")?;
//!
//! assert!(graph.neighbors("b.md").contains("a.md"));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod direction;
pub mod error;
pub mod graph;
pub mod room;

pub use direction::{Direction, Passages};
pub use error::{GraphError, GraphResult};
pub use graph::{DocumentGraph, DocumentNode};
pub use room::{is_void_room, void_marker, RoomId, VOID_PREFIX};
