//! Error types for todo-core operations.
//!
//! Storage faults always surface to the caller. The only deliberate exception
//! is text decryption, which reports failure as `None` instead of an error
//! (see [`crate::crypto::decrypt`]).

use thiserror::Error;

/// Result type alias for todo-core operations.
pub type Result<T> = std::result::Result<T, TodoError>;

/// Core error type for todo-core operations.
#[derive(Debug, Error)]
pub enum TodoError {
    /// A task mutation referenced a project that is not stored
    #[error("Project with id {0} not found")]
    ProjectNotFound(String),

    /// Encryption error
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// Configuration could not be read or parsed
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl From<tokio::task::JoinError> for TodoError {
    fn from(err: tokio::task::JoinError) -> Self {
        TodoError::Storage(format!("Storage task failed: {}", err))
    }
}
