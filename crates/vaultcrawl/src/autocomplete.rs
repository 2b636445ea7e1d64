//! # Link Autocomplete
//!
//! Active only while the live input buffer starts with the `link` verb.
//! Every keystroke re-ranks the rooms the current room does not already link
//! to, so a UI can show suggestions as the player types.

use vaultcrawl_core::{DocumentGraph, RoomId};

use crate::command::split_verb;
use crate::search::{rank_all, Candidate};

/// Suggestion state for the `link` verb.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkAutocomplete {
    active: bool,
    query: String,
    suggestions: Vec<RoomId>,
    scores: Vec<u32>,
    selected: usize,
}

impl LinkAutocomplete {
    /// Creates an inactive autocomplete.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-ranks for the live input `buffer`.
    ///
    /// Candidates exclude `current` and rooms it already links to.
    pub fn update(&mut self, buffer: &str, current: Option<&str>, graph: &DocumentGraph, limit: usize) {
        let (verb, rest) = split_verb(buffer);
        if !verb.eq_ignore_ascii_case("link") {
            self.clear();
            return;
        }
        let Some(current) = current else {
            self.clear();
            return;
        };

        let linked = graph.outbound(current);
        let candidates: Vec<Candidate<'_>> = graph
            .nodes()
            .filter(|node| node.id != current && !linked.contains(&node.id))
            .map(Candidate::from)
            .collect();
        let ranked = rank_all(rest, &candidates, limit);

        if self.query != rest {
            self.selected = 0;
        }
        self.active = true;
        self.query = rest.to_string();
        self.scores = ranked.iter().map(|m| m.score).collect();
        self.suggestions = ranked.into_iter().map(|m| m.id).collect();
        if self.selected >= self.suggestions.len() {
            self.selected = 0;
        }
    }

    /// Leaves the sub-mode.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether the sub-mode is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Text after the `link` verb.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Ranked suggestions, best first.
    #[must_use]
    pub fn suggestions(&self) -> &[RoomId] {
        &self.suggestions
    }

    /// Index of the highlighted suggestion.
    #[must_use]
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Highlighted suggestion.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.suggestions.get(self.selected).map(String::as_str)
    }

    /// Highlighted suggestion if it actually matches the query. With an
    /// empty query any suggestion counts.
    #[must_use]
    pub fn selected_match(&self) -> Option<&str> {
        let score = self.scores.get(self.selected).copied()?;
        if score > 0 || self.query.is_empty() {
            self.selected()
        } else {
            None
        }
    }

    /// Moves the highlight down, wrapping.
    pub fn select_next(&mut self) {
        if !self.suggestions.is_empty() {
            self.selected = (self.selected + 1) % self.suggestions.len();
        }
    }

    /// Moves the highlight up, wrapping.
    pub fn select_previous(&mut self) {
        if !self.suggestions.is_empty() {
            self.selected = self.selected.checked_sub(1).unwrap_or(self.suggestions.len() - 1);
        }
    }
}
