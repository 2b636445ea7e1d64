//! Read-only snapshots handed to renderers.

use serde::Serialize;
use vaultcrawl_core::RoomId;

use crate::log::LogEntry;
use crate::viewport::ViewBox;

/// Link-autocomplete state for the input box.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AutocompleteView {
    /// Whether the input starts with `link`.
    pub active: bool,
    /// Text after the verb.
    pub query: String,
    /// Ranked room ids.
    pub suggestions: Vec<RoomId>,
    /// Highlighted suggestion.
    pub selected: usize,
}

/// Everything a renderer needs, copied out of the engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SessionView {
    /// Player-facing log, oldest first.
    pub log: Vec<LogEntry>,
    /// Current room.
    pub current_room: Option<RoomId>,
    /// Rooms revealed on the map.
    pub discovered: Vec<RoomId>,
    /// Unsealed rooms.
    pub inventory: Vec<RoomId>,
    /// Current view box, `None` without a maze.
    pub viewport: Option<ViewBox>,
    /// Signature of the layout the view box belongs to.
    pub layout_signature: Option<String>,
    /// Grid size as `(width, height)`.
    pub grid: Option<(usize, usize)>,
    /// Link autocomplete.
    pub autocomplete: AutocompleteView,
    /// A command is waiting on the host.
    pub busy: bool,
    /// An external companion is busy.
    pub pending_ai: bool,
}
