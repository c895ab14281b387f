//! Error types for Quotebook core.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A quote field was empty after trimming whitespace.
    #[error("quote {field} must not be empty")]
    Validation {
        /// The offending field (`text` or `category`).
        field: &'static str,
    },

    /// A quote document did not have the expected shape.
    #[error("invalid quote document: {message}")]
    Format {
        /// Description of the shape problem.
        message: String,
    },

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] quotebook_storage::StorageError),

    /// I/O error while reading or writing an export file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The collection could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl CoreError {
    /// Creates a validation error for `field`.
    pub fn validation(field: &'static str) -> Self {
        Self::Validation { field }
    }

    /// Creates a format error.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Returns true for errors caused by caller input rather than the system.
    pub fn is_user_error(&self) -> bool {
        matches!(self, CoreError::Validation { .. } | CoreError::Format { .. })
    }
}
