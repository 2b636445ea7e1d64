//! The player-facing log.
//!
//! Append-only; renderers show entries oldest first, newest last.

use serde::{Deserialize, Serialize};

/// Who speaks a log line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogAuthor {
    /// Echo of the player's command.
    Player,
    /// Mechanical feedback: errors, listings, stats.
    System,
    /// Descriptive prose.
    Narrator,
}

/// One log line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Speaker.
    pub author: LogAuthor,
    /// Text, possibly multi-line.
    pub text: String,
}

/// Append-only list of entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameLog {
    entries: Vec<LogEntry>,
}

impl GameLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&mut self, author: LogAuthor, text: impl Into<String>) {
        self.entries.push(LogEntry {
            author,
            text: text.into(),
        });
    }

    /// Appends a system entry.
    pub fn system(&mut self, text: impl Into<String>) {
        self.push(LogAuthor::System, text);
    }

    /// Appends a narrator entry.
    pub fn narrate(&mut self, text: impl Into<String>) {
        self.push(LogAuthor::Narrator, text);
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries appended after the first `from`.
    #[must_use]
    pub fn since(&self, from: usize) -> &[LogEntry] {
        self.entries.get(from..).unwrap_or(&[])
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry.
    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }
}
