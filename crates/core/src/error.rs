//! Error types for buildfiles-core

use thiserror::Error;

/// Errors raised by path lists and the filesystem adapter
///
/// Enumeration and staleness checks never fail: a vanished file is a
/// `missing` or `removed` classification, not an error.
#[derive(Debug, Error)]
pub enum FilesError {
    /// A glob pattern could not be compiled.
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as supplied.
        pattern: String,
        /// The underlying compile error.
        #[source]
        source: globset::Error,
    },

    /// A filesystem operation failed.
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path where the error occurred.
        path: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl FilesError {
    /// Wrap an IO error with the path it happened on
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type used throughout buildfiles-core
pub type Result<T> = std::result::Result<T, FilesError>;
