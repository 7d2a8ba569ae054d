//! Error types for mini-scivis.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for loading and extraction operations.
#[derive(Error, Debug)]
pub enum ScivisError {
    /// Unrecognized voxel type, malformed config or truncated text input.
    #[error("format error: {0}")]
    Format(String),

    /// A file could not be opened or held fewer bytes than required.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A capability was not compiled in or not provided at run time.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// The indexed-dataset backend rejected or failed a query.
    #[error("query failed: {0}")]
    Query(String),

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScivisError {
    /// Wraps an I/O error together with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Shorthand for a [`ScivisError::Format`] error.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }
}

/// A specialized Result type for mini-scivis operations.
pub type Result<T> = std::result::Result<T, ScivisError>;
