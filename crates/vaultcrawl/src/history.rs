//! Travel history and command recall.

use std::collections::VecDeque;

use vaultcrawl_core::RoomId;

/// Bounded list of previously visited rooms, oldest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TravelHistory {
    rooms: VecDeque<RoomId>,
    cap: usize,
}

impl TravelHistory {
    /// Creates an empty history holding at most `cap` rooms.
    #[must_use]
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            rooms: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// Appends a room, evicting the oldest beyond the cap.
    pub fn push(&mut self, room: RoomId) {
        self.rooms.push_back(room);
        while self.rooms.len() > self.cap {
            self.rooms.pop_front();
        }
    }

    /// Removes and returns the most recent room.
    pub fn pop(&mut self) -> Option<RoomId> {
        self.rooms.pop_back()
    }

    /// Keeps only rooms accepted by `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.rooms.retain(|room| keep(room));
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Returns true if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Capacity.
    #[must_use]
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.rooms.iter().map(String::as_str)
    }
}

/// Past command lines with an up/down recall cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandHistory {
    lines: VecDeque<String>,
    cap: usize,
    cursor: Option<usize>,
}

impl CommandHistory {
    /// Creates an empty history holding at most `cap` lines.
    #[must_use]
    pub fn new(cap: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            cap: cap.max(1),
            cursor: None,
        }
    }

    /// Records a submitted line and resets the cursor.
    ///
    /// Blank lines and immediate repeats are not recorded.
    pub fn record(&mut self, line: &str) {
        self.cursor = None;
        let line = line.trim();
        if line.is_empty() || self.lines.back().is_some_and(|last| last == line) {
            return;
        }
        self.lines.push_back(line.to_string());
        while self.lines.len() > self.cap {
            self.lines.pop_front();
        }
    }

    /// Steps back to an older line.
    pub fn older(&mut self) -> Option<&str> {
        if self.lines.is_empty() {
            return None;
        }
        let next = match self.cursor {
            None => self.lines.len() - 1,
            Some(0) => 0,
            Some(i) => i - 1,
        };
        self.cursor = Some(next);
        self.lines.get(next).map(String::as_str)
    }

    /// Steps forward to a newer line. Past the newest, returns `None` and
    /// leaves recall.
    pub fn newer(&mut self) -> Option<&str> {
        let i = self.cursor?;
        if i + 1 >= self.lines.len() {
            self.cursor = None;
            return None;
        }
        self.cursor = Some(i + 1);
        self.lines.get(i + 1).map(String::as_str)
    }

    /// Number of remembered lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if nothing is remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
