//! Error types for persistence operations

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A record points at data that is missing or unreadable
    #[error("Corrupted record: {0}")]
    Corrupted(String),
}

impl StorageError {
    pub fn corrupted(message: impl Into<String>) -> Self {
        StorageError::Corrupted(message.into())
    }
}
