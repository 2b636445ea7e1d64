//! # Vaultcrawl
//!
//! Explore a linked document corpus as a procedurally generated dungeon.
//! Documents are rooms, the maze is derived deterministically from the
//! document-id set, and hyperlinks become doors where the maze happens to
//! place two linked documents side by side.
//!
//! ## Architecture
//!
//! ```text
//! Host ──graph──> LayoutGenerator ──> MazeLayout
//!                                        │
//!   command line ──> Engine ──> NavigationState ──> GameLog
//!                      │                 │
//!                      └── MapViewport <─┘──> SessionView (snapshot)
//! ```
//!
//! - [`Engine`]: synchronous core owning all mutable state
//! - [`Session`] / [`SessionHandle`]: serialized async worker over a [`Host`]
//! - [`NavigationState`]: current room, discovered and unsealed sets, history
//! - [`search_rooms`] / [`find_matches`]: room resolution
//! - [`MapViewport`]: view-box math for renderers
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vaultcrawl::{EngineConfig, MemoryHost, Session};
//!
//! let host = Arc::new(MemoryHost::new(graph));
//! let session = Session::spawn(host, EngineConfig::default()).await;
//!
//! session.submit_command("look").await?;
//! session.submit_command("east").await?;
//! println!("{:?}", session.snapshot().current_room);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod autocomplete;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod host;
mod interpreter;
pub mod log;
pub mod navigation;
pub mod persistence;
pub mod render;
pub mod search;
pub mod session;
pub mod view;
pub mod viewport;

pub use autocomplete::LinkAutocomplete;
pub use command::{split_verb, Command};
pub use config::{EngineConfig, MapConfig, NavigationConfig, SearchConfig, ViewportConfig};
pub use engine::Engine;
pub use error::{ConfigError, HostError, PersistError, SessionError};
pub use history::{CommandHistory, TravelHistory};
pub use host::{Host, HostOutcome, HostRequest, MemoryHost, NullHost};
pub use log::{GameLog, LogAuthor, LogEntry};
pub use navigation::{MoveOutcome, NavigationState, UnsealOutcome};
pub use persistence::{decode_state, encode_state, PersistedState};
pub use render::{render_map, MapWindow};
pub use search::{
    compute_query_affinity, find_matches, rank_all, resolve_room, search_rooms,
    tokenize_for_similarity, Candidate, Match, SearchOptions, TokenIndex,
};
pub use session::{CommandTicket, Recall, Session, SessionHandle, Ticket, ViewportAction};
pub use view::{AutocompleteView, SessionView};
pub use viewport::{MapViewport, ViewBox};

pub use vaultcrawl_core::{Direction, DocumentGraph, DocumentNode, RoomId};
pub use vaultcrawl_procedural::{LayoutConfig, LayoutGenerator, MazeLayout};
