//! # Vaultcrawl Error Types
//!
//! Player mistakes (unknown verbs, walls, empty history) are not errors:
//! they become log entries. These types cover configuration, host I/O and
//! the persisted blob.

use thiserror::Error;

/// Errors loading an [`EngineConfig`](crate::EngineConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Failures reported by host collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// Reading or writing storage failed.
    #[error("host I/O failed: {0}")]
    Io(String),

    /// The requested document does not exist.
    #[error("document not found: {0}")]
    NotFound(String),

    /// The host does not support this operation.
    #[error("host does not support {0}")]
    Unsupported(&'static str),
}

/// Errors encoding or decoding the persisted state blob.
#[derive(Error, Debug)]
pub enum PersistError {
    /// JSON encoding or decoding failed.
    #[error("persisted state is not valid: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the async session handle.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The worker task has stopped.
    #[error("session worker has stopped")]
    Closed,
}
