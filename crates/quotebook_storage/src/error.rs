//! Error types for storage operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The store file exists but is not a valid key-value document.
    #[error("store corrupted: {0}")]
    Corrupted(String),

    /// Another process holds the lock on the data directory.
    #[error("data directory is locked by another process: {}", path.display())]
    Locked {
        /// The locked directory.
        path: PathBuf,
    },

    /// The in-memory map could not be encoded for writing.
    #[error("serialization error: {0}")]
    Serialization(String),
}
