//! Error types for the sync engine.

use quotebook_core::CoreError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during sync operations.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Network failure or non-success HTTP status.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// HTTP status, when the server answered.
        status: Option<u16>,
    },

    /// The response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Applying the snapshot to the repository failed.
    #[error("repository error: {0}")]
    Core(#[from] CoreError),
}

impl SyncError {
    /// Creates a transport error for a request that got no response.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: None,
        }
    }

    /// Creates a transport error for a non-success HTTP status.
    pub fn http_status(status: u16) -> Self {
        Self::Transport {
            message: format!("server returned HTTP {status}"),
            status: Some(status),
        }
    }

    /// Returns true if this is a transport error.
    pub fn is_transport(&self) -> bool {
        matches!(self, SyncError::Transport { .. })
    }
}
