//! # Persisted State
//!
//! One JSON record in the host's key-value store:
//!
//! ```text
//! { currentRoomId, discovered, inventory, travelHistory, mazeLayout }
//! ```
//!
//! Decoding never fails the caller. An unparsable blob means "no saved
//! state"; a malformed `mazeLayout` drops only the layout, which the
//! generator then rebuilds.

use serde::{Deserialize, Serialize};
use vaultcrawl_core::RoomId;
use vaultcrawl_procedural::PersistedLayout;

use crate::error::PersistError;

/// Navigation progress plus the cached layout.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    /// Room the player stands in.
    pub current_room_id: Option<RoomId>,
    /// Rooms revealed on the map.
    pub discovered: Vec<RoomId>,
    /// Unsealed rooms.
    pub inventory: Vec<RoomId>,
    /// Travel history, oldest first.
    pub travel_history: Vec<RoomId>,
    /// Cached layout, kept as raw JSON until validated.
    pub maze_layout: Option<serde_json::Value>,
}

impl PersistedState {
    /// Parses the cached layout. A malformed record is logged and ignored.
    #[must_use]
    pub fn layout(&self) -> Option<PersistedLayout> {
        let value = self.maze_layout.as_ref()?;
        match serde_json::from_value(value.clone()) {
            Ok(layout) => Some(layout),
            Err(e) => {
                tracing::warn!("Ignoring malformed persisted layout: {}", e);
                None
            }
        }
    }

    /// Stores `layout` as the cached layout.
    ///
    /// # Errors
    ///
    /// Fails only if the record cannot be represented as JSON.
    pub fn set_layout(&mut self, layout: Option<&PersistedLayout>) -> Result<(), PersistError> {
        self.maze_layout = layout.map(serde_json::to_value).transpose()?;
        Ok(())
    }
}

/// Encodes `state` as a JSON blob.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode_state(state: &PersistedState) -> Result<String, PersistError> {
    Ok(serde_json::to_string(state)?)
}

/// Decodes a blob. Anything unreadable is logged and treated as no saved
/// state.
#[must_use]
pub fn decode_state(blob: &str) -> Option<PersistedState> {
    if blob.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(blob) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!("Discarding unreadable saved state: {}", e);
            None
        }
    }
}
