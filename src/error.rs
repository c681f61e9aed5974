//! Error types for blocklex.

use thiserror::Error;

/// Errors that can occur while building a blocking index or searching it.
#[derive(Debug, Error)]
pub enum BlockingError {
    /// Invalid parameter value (`k < 1`, `frontier_cap < 1`, NaN score).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Trie keys must contain at least one character.
    #[error("trie keys must be non-empty")]
    EmptyKey,

    /// `pop_best` on an empty queue.
    #[error("queue is empty")]
    EmptyQueue,

    /// An upstream label record is missing a field or has the wrong type.
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// JSON decoding error (configuration or label records)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading label records
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BlockingError>;
