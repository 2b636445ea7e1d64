//! # Navigation State Machine
//!
//! ## States
//!
//! - **Unrooted**: no current room. Only before the first room is chosen.
//! - **Rooted**: the current room is a cell of the layout.
//!
//! ## Invariants
//!
//! - `current ∈ discovered` whenever `current` is set
//! - `inventory ⊆ discovered`
//! - `travel_history.len() <= history_cap`, oldest evicted first
//!
//! Failed moves (a wall, an empty history, no match) are outcomes, not
//! errors, and leave the state untouched.

use std::collections::{BTreeSet, VecDeque};

use vaultcrawl_core::{is_void_room, Direction, DocumentGraph, RoomId};
use vaultcrawl_procedural::MazeLayout;

use crate::config::NavigationConfig;
use crate::history::{CommandHistory, TravelHistory};
use crate::search::{resolve_room, TokenIndex};

/// Result of a movement request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The current room changed.
    Moved {
        /// Room left behind, if any.
        from: Option<RoomId>,
        /// Room entered.
        to: RoomId,
    },
    /// Target is the current room.
    AlreadyHere,
    /// No passage in that direction.
    Blocked(Direction),
    /// No current room to move from.
    Unrooted,
    /// Travel history is empty.
    NoHistory,
    /// Nothing matched the query.
    NoMatch,
    /// The target is not a cell of the layout.
    UnknownRoom,
}

impl MoveOutcome {
    /// Returns true if the current room changed.
    #[must_use]
    pub fn moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Result of unsealing a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnsealOutcome {
    /// Added to the inventory.
    Unsealed,
    /// Already in the inventory.
    AlreadyUnsealed,
    /// Not a discovered document room.
    NotAllowed,
}

/// Where the player is and what they have seen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationState {
    current: Option<RoomId>,
    discovered: BTreeSet<RoomId>,
    inventory: BTreeSet<RoomId>,
    travel_history: TravelHistory,
    command_history: CommandHistory,
    reveal_radius: usize,
    pending_ai: bool,
}

impl NavigationState {
    /// Creates an unrooted state.
    #[must_use]
    pub fn new(config: &NavigationConfig) -> Self {
        Self {
            current: None,
            discovered: BTreeSet::new(),
            inventory: BTreeSet::new(),
            travel_history: TravelHistory::new(config.history_cap),
            command_history: CommandHistory::new(config.command_history_cap),
            reveal_radius: config.reveal_radius,
            pending_ai: false,
        }
    }

    /// Current room, `None` while unrooted.
    #[must_use]
    pub fn current_room(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Rooms revealed on the map.
    #[must_use]
    pub fn discovered(&self) -> &BTreeSet<RoomId> {
        &self.discovered
    }

    /// Rooms whose content is known.
    #[must_use]
    pub fn inventory(&self) -> &BTreeSet<RoomId> {
        &self.inventory
    }

    /// Previously visited rooms, oldest first.
    #[must_use]
    pub fn travel_history(&self) -> &TravelHistory {
        &self.travel_history
    }

    /// Submitted command lines.
    pub fn command_history_mut(&mut self) -> &mut CommandHistory {
        &mut self.command_history
    }

    /// Whether an external companion is busy.
    #[must_use]
    pub fn pending_ai(&self) -> bool {
        self.pending_ai
    }

    /// Sets the companion-busy flag.
    pub fn set_pending_ai(&mut self, pending: bool) {
        self.pending_ai = pending;
    }

    /// Returns true if `room` is unsealed.
    #[must_use]
    pub fn is_unsealed(&self, room: &str) -> bool {
        self.inventory.contains(room)
    }

    /// Returns true if `room` is on the map.
    #[must_use]
    pub fn is_discovered(&self, room: &str) -> bool {
        self.discovered.contains(room)
    }

    /// Picks the first room: the host's open document if it is in the graph,
    /// else the lexicographically first id. `None` for an empty graph.
    #[must_use]
    pub fn choose_initial_room(graph: &DocumentGraph, open_document: Option<&str>) -> Option<RoomId> {
        if let Some(open) = open_document.filter(|id| graph.contains(id)) {
            return Some(open.to_string());
        }
        graph.nodes().next().map(|node| node.id.clone())
    }

    /// Enters `room`, recording the previous room in the travel history.
    pub fn move_to_room(&mut self, layout: &MazeLayout, room: &str) -> MoveOutcome {
        self.enter(layout, room)
    }

    /// Walks one step in `dir` through a base passage or a link door.
    pub fn move_by_direction(&mut self, layout: &MazeLayout, dir: Direction) -> MoveOutcome {
        let Some(index) = self.current.as_deref().and_then(|room| layout.index_of(room)) else {
            return MoveOutcome::Unrooted;
        };
        match layout.step(index, dir).and_then(|next| layout.room_at(next)) {
            Some(next) => {
                let next = next.to_string();
                self.move_to_room(layout, &next)
            }
            None => MoveOutcome::Blocked(dir),
        }
    }

    /// Pops the most recent room off the travel history and moves there.
    /// The room being left is recorded like any other move.
    pub fn go_back(&mut self, layout: &MazeLayout) -> MoveOutcome {
        while let Some(room) = self.travel_history.pop() {
            if layout.index_of(&room).is_none() || self.current.as_deref() == Some(room.as_str()) {
                continue;
            }
            return self.move_to_room(layout, &room);
        }
        MoveOutcome::NoHistory
    }

    /// Moves to the room best matching `query` (exact id first).
    pub fn teleport(
        &mut self,
        layout: &MazeLayout,
        graph: &DocumentGraph,
        index: &TokenIndex,
        query: &str,
        limit: usize,
    ) -> MoveOutcome {
        match resolve_room(graph, index, query, limit) {
            Some(room) => self.move_to_room(layout, &room),
            None => MoveOutcome::NoMatch,
        }
    }

    /// Adds the current room to the inventory.
    pub fn unseal_current(&mut self) -> UnsealOutcome {
        match self.current.clone() {
            Some(room) => self.unseal(&room),
            None => UnsealOutcome::NotAllowed,
        }
    }

    /// Adds a discovered document room to the inventory.
    pub fn unseal(&mut self, room: &str) -> UnsealOutcome {
        if is_void_room(room) || !self.discovered.contains(room) {
            return UnsealOutcome::NotAllowed;
        }
        if self.inventory.insert(room.to_string()) {
            UnsealOutcome::Unsealed
        } else {
            UnsealOutcome::AlreadyUnsealed
        }
    }

    fn enter(&mut self, layout: &MazeLayout, room: &str) -> MoveOutcome {
        if room.is_empty() {
            return MoveOutcome::NoMatch;
        }
        if self.current.as_deref() == Some(room) {
            return MoveOutcome::AlreadyHere;
        }
        let Some(index) = layout.index_of(room) else {
            return MoveOutcome::UnknownRoom;
        };

        let from = self.current.replace(room.to_string());
        if let Some(previous) = &from {
            self.travel_history.push(previous.clone());
        }
        self.discovered.insert(room.to_string());
        self.reveal_around(layout, index, self.reveal_radius);

        MoveOutcome::Moved {
            from,
            to: room.to_string(),
        }
    }

    /// Reveals cells within `radius` passage steps of `index`.
    pub fn reveal_around(&mut self, layout: &MazeLayout, index: usize, radius: usize) {
        let mut seen = BTreeSet::from([index]);
        let mut frontier = VecDeque::from([(index, 0)]);
        while let Some((cell, depth)) = frontier.pop_front() {
            if let Some(room) = layout.room_at(cell) {
                self.discovered.insert(room.to_string());
            }
            if depth == radius {
                continue;
            }
            for dir in layout.base_passages()[cell].directions() {
                if let Some(next) = layout.neighbor(cell, dir) {
                    if seen.insert(next) {
                        frontier.push_back((next, depth + 1));
                    }
                }
            }
        }
    }

    /// Restores saved sets, dropping rooms the layout no longer has and
    /// re-establishing the invariants.
    pub fn restore(
        &mut self,
        layout: &MazeLayout,
        current: Option<&str>,
        discovered: &[RoomId],
        inventory: &[RoomId],
        travel_history: &[RoomId],
    ) {
        let known = |room: &String| layout.index_of(room).is_some();

        self.discovered = discovered.iter().filter(|r| known(*r)).cloned().collect();
        self.current = current
            .filter(|room| layout.index_of(room).is_some())
            .map(str::to_string);
        if let Some(room) = &self.current {
            self.discovered.insert(room.clone());
        }
        self.inventory = inventory
            .iter()
            .filter(|r| known(*r) && !is_void_room(r) && self.discovered.contains(*r))
            .cloned()
            .collect();
        self.travel_history = TravelHistory::new(self.travel_history.cap());
        for room in travel_history.iter().filter(|r| known(*r)) {
            self.travel_history.push(room.clone());
        }
    }

    /// Drops rooms missing from a replaced layout. Returns false if the
    /// current room was dropped (the state is unrooted again).
    pub fn retain_known(&mut self, layout: &MazeLayout) -> bool {
        self.discovered.retain(|room| layout.index_of(room).is_some());
        self.inventory.retain(|room| layout.index_of(room).is_some());
        self.travel_history.retain(|room| layout.index_of(room).is_some());
        match &self.current {
            Some(room) if layout.index_of(room).is_none() => {
                self.current = None;
                false
            }
            _ => true,
        }
    }

    /// Forgets everything except the command history.
    pub fn reset(&mut self) {
        self.current = None;
        self.discovered.clear();
        self.inventory.clear();
        self.travel_history = TravelHistory::new(self.travel_history.cap());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaultcrawl_core::{DocumentNode, Passages};

    /// 3x1 corridor: a - b - c.
    fn corridor() -> MazeLayout {
        let e = Passages::from(Direction::East);
        let w = Passages::from(Direction::West);
        MazeLayout::from_parts(
            3,
            vec!["a.md".into(), "b.md".into(), "c.md".into()],
            vec![e, e.union(w), w],
            "corridor".into(),
        )
        .unwrap()
    }

    fn state(cap: usize) -> NavigationState {
        NavigationState::new(&NavigationConfig {
            history_cap: cap,
            ..NavigationConfig::default()
        })
    }

    fn assert_invariants(nav: &NavigationState) {
        if let Some(room) = nav.current_room() {
            assert!(nav.discovered().contains(room));
        }
        assert!(nav.inventory().is_subset(nav.discovered()));
    }

    #[test]
    fn test_initial_room_prefers_open_document() {
        let mut graph = DocumentGraph::new();
        for id in ["b.md", "a.md", "c.md"] {
            graph.insert_node(DocumentNode::new(id, id)).unwrap();
        }
        assert_eq!(NavigationState::choose_initial_room(&graph, Some("c.md")).as_deref(), Some("c.md"));
        assert_eq!(NavigationState::choose_initial_room(&graph, Some("gone.md")).as_deref(), Some("a.md"));
        assert_eq!(NavigationState::choose_initial_room(&graph, None).as_deref(), Some("a.md"));
        assert_eq!(NavigationState::choose_initial_room(&DocumentGraph::new(), None), None);
    }

    #[test]
    fn test_move_reveals_neighbors() {
        let layout = corridor();
        let mut nav = state(8);
        assert!(nav.move_to_room(&layout, "a.md").moved());
        assert_eq!(nav.current_room(), Some("a.md"));
        assert!(nav.is_discovered("b.md"));
        assert!(!nav.is_discovered("c.md"));
        assert!(nav.travel_history().is_empty());
        assert_invariants(&nav);
    }

    #[test]
    fn test_noop_moves() {
        let layout = corridor();
        let mut nav = state(8);
        assert_eq!(nav.move_by_direction(&layout, Direction::East), MoveOutcome::Unrooted);
        nav.move_to_room(&layout, "a.md");
        assert_eq!(nav.move_to_room(&layout, "a.md"), MoveOutcome::AlreadyHere);
        assert_eq!(nav.move_to_room(&layout, ""), MoveOutcome::NoMatch);
        assert_eq!(nav.move_to_room(&layout, "zzz.md"), MoveOutcome::UnknownRoom);
        assert_eq!(nav.move_by_direction(&layout, Direction::West), MoveOutcome::Blocked(Direction::West));
        assert_eq!(nav.move_by_direction(&layout, Direction::North), MoveOutcome::Blocked(Direction::North));
        assert_eq!(nav.current_room(), Some("a.md"));
        assert!(nav.travel_history().is_empty());
    }

    #[test]
    fn test_walk_and_back() {
        let layout = corridor();
        let mut nav = state(8);
        nav.move_to_room(&layout, "a.md");
        nav.move_by_direction(&layout, Direction::East);
        nav.move_by_direction(&layout, Direction::East);
        assert_eq!(nav.current_room(), Some("c.md"));
        assert_eq!(nav.travel_history().iter().collect::<Vec<_>>(), vec!["a.md", "b.md"]);

        assert_eq!(
            nav.go_back(&layout),
            MoveOutcome::Moved { from: Some("c.md".into()), to: "b.md".into() }
        );
        assert_eq!(nav.travel_history().iter().collect::<Vec<_>>(), vec!["a.md", "c.md"]);

        // A second back returns to the room just left.
        assert!(nav.go_back(&layout).moved());
        assert_eq!(nav.current_room(), Some("c.md"));
        assert_eq!(nav.travel_history().iter().collect::<Vec<_>>(), vec!["a.md", "b.md"]);
        assert_invariants(&nav);
    }

    #[test]
    fn test_history_keeps_most_recent_cap_rooms() {
        let layout = corridor();
        let mut nav = state(3);
        nav.move_to_room(&layout, "a.md");
        let mut visited = vec!["a.md".to_string()];
        for i in 0..10 {
            let dir = if i % 2 == 0 { Direction::East } else { Direction::West };
            nav.move_by_direction(&layout, dir);
            visited.push(nav.current_room().unwrap().to_string());
        }
        assert_eq!(nav.travel_history().len(), 3);
        let expected: Vec<&str> = visited[visited.len() - 4..visited.len() - 1]
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(nav.travel_history().iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_unseal_requires_discovered_document() {
        let layout = corridor();
        let mut nav = state(8);
        assert_eq!(nav.unseal_current(), UnsealOutcome::NotAllowed);
        nav.move_to_room(&layout, "a.md");
        assert_eq!(nav.unseal("c.md"), UnsealOutcome::NotAllowed);
        assert_eq!(nav.unseal_current(), UnsealOutcome::Unsealed);
        assert_eq!(nav.unseal_current(), UnsealOutcome::AlreadyUnsealed);
        assert!(nav.is_unsealed("a.md"));
        assert_invariants(&nav);
    }

    #[test]
    fn test_restore_repairs_invariants() {
        let layout = corridor();
        let mut nav = state(2);
        nav.restore(
            &layout,
            Some("c.md"),
            &["a.md".into(), "gone.md".into()],
            &["a.md".into(), "b.md".into(), "gone.md".into()],
            &["a.md".into(), "gone.md".into(), "b.md".into(), "a.md".into()],
        );
        assert_eq!(nav.current_room(), Some("c.md"));
        assert!(nav.is_discovered("c.md"));
        assert!(!nav.is_discovered("gone.md"));
        assert_eq!(nav.inventory().iter().collect::<Vec<_>>(), vec!["a.md"]);
        assert_eq!(nav.travel_history().iter().collect::<Vec<_>>(), vec!["b.md", "a.md"]);
        assert_invariants(&nav);
    }

    #[test]
    fn test_radius_two_reveals_further() {
        let layout = corridor();
        let mut nav = NavigationState::new(&NavigationConfig {
            reveal_radius: 2,
            ..NavigationConfig::default()
        });
        nav.move_to_room(&layout, "a.md");
        assert!(nav.is_discovered("c.md"));
    }
}
