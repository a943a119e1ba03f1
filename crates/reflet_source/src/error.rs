//! Error types for data-source providers.

use std::path::PathBuf;

/// Errors raised by a [`Provider`](crate::Provider).
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The requested URI is not part of the enumerated data source.
    #[error("'{uri}' is not part of the data source")]
    NotFound {
        /// The URI that was requested.
        uri: PathBuf,
    },

    /// An I/O error occurred while enumerating or reading files.
    #[error("source I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
