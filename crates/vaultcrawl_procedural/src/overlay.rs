//! # Link-Opening Overlay
//!
//! A hyperlink between two documents becomes a door only where the maze
//! already placed them side by side with an open passage between them. Most
//! links will not line up; finding the ones that do is part of the game.
//!
//! The overlay never opens a wall: a door bit is set only over an existing
//! base passage, on both cells.

use vaultcrawl_core::{is_void_room, Direction, DocumentGraph, Passages};

use crate::layout::MazeLayout;

impl MazeLayout {
    /// Recomputes link doors from the graph's adjacency.
    ///
    /// Idempotent; re-run whenever the edge set changes. Returns the number
    /// of doors (each counted once).
    pub fn update_link_openings(&mut self, graph: &DocumentGraph) -> usize {
        self.link_open.fill(Passages::NONE);

        let mut doors = 0;
        for index in 0..self.cell_count() {
            let room = &self.room_order[index];
            if is_void_room(room) {
                continue;
            }
            // East and South visit every adjacent pair exactly once.
            for dir in [Direction::East, Direction::South] {
                if !self.base_passages[index].contains(dir) {
                    continue;
                }
                let Some(next) = self.neighbor(index, dir) else {
                    continue;
                };
                if graph.are_adjacent(room, &self.room_order[next]) {
                    self.link_open[index].insert(dir);
                    self.link_open[next].insert(dir.opposite());
                    doors += 1;
                }
            }
        }

        tracing::debug!("Link overlay opened {} doors", doors);
        doors
    }

    /// Returns true if cell `index` has a link door towards `dir`.
    #[must_use]
    pub fn is_link_door(&self, index: usize, dir: Direction) -> bool {
        self.link_open.get(index).is_some_and(|p| p.contains(dir))
    }
}
