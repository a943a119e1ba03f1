//! Error types for cache operations.

use std::path::PathBuf;

/// Errors that can occur during cache operations.
///
/// The read path never surfaces these to the pipeline: the storage layer
/// degrades any adapter failure to a cache miss. The write path returns
/// them so the caller can log and continue; a cache write failure must
/// never abort a parse run.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The backing store is unreachable (storage down, directory gone).
    #[error("cache backend unavailable: {reason}")]
    Unavailable {
        /// Description of why the backend could not be reached.
        reason: String,
    },

    /// An I/O error occurred while reading or writing a cache file.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A manifest or payload frame could not be encoded or decoded.
    #[error("cache serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_display() {
        let err = CacheError::Unavailable {
            reason: "connection refused".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "cache backend unavailable: connection refused"
        );
    }

    #[test]
    fn io_display() {
        let err = CacheError::Io {
            path: PathBuf::from("/tmp/cache/ab12.bin"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("cache I/O error"));
        assert!(msg.contains("ab12.bin"));
    }

    #[test]
    fn serialization_display() {
        let err = CacheError::Serialization {
            reason: "unexpected EOF".to_string(),
        };
        assert!(err.to_string().contains("unexpected EOF"));
    }
}
