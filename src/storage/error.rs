//! Storage-specific error types.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors surfaced by a storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backend has no such table.
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// A returned row failed boundary validation.
    #[error("invalid row from '{table}': {reason}")]
    InvalidRow {
        table: String,
        reason: String,
    },

    /// The backend could not be reached or refused the request.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The transport gave up waiting.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// The backend returned an error response.
    #[error("storage error: {message} (code: {code})")]
    Remote {
        /// Error code from the backend.
        code: String,
        /// Error message from the backend.
        message: String,
    },

    /// A payload could not be decoded.
    #[error("failed to decode storage payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl StorageError {
    /// Create a remote error from an error response.
    pub fn remote(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            code: code.into(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_row(table: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRow {
            table: table.to_string(),
            reason: reason.into(),
        }
    }

    /// Check if re-running the report may succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}
