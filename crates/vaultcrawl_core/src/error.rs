//! # Graph Error Types

use thiserror::Error;

/// Errors raised while assembling a document graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A node was inserted with an empty id.
    #[error("document id must not be empty")]
    EmptyId,

    /// A node id collides with one already in the graph.
    #[error("duplicate document id: {0}")]
    DuplicateId(String),

    /// A node id uses the reserved void prefix.
    #[error("document id uses the reserved void prefix: {0}")]
    ReservedId(String),

    /// A link endpoint is not a node in the graph.
    #[error("unknown document: {0}")]
    UnknownDocument(String),
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
