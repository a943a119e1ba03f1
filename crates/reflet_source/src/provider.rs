//! The provider contract.

use crate::error::ProviderError;
use std::path::{Path, PathBuf};

/// A named, enumerable collection of files to be processed together.
///
/// `enumerate` defines the data source: an ordered list of file URIs.
/// `read` returns the current bytes of one member; `lookup` answers
/// whether a URI belongs to the data source at all, raising
/// [`ProviderError::NotFound`] when it does not. Implementations must be
/// `Send + Sync` so the pipeline can read files from worker threads.
pub trait Provider: Send + Sync {
    /// The ordered file URIs constituting the data source.
    fn enumerate(&self) -> Result<Vec<PathBuf>, ProviderError>;

    /// The current bytes of one member file.
    fn read(&self, uri: &Path) -> Result<Vec<u8>, ProviderError>;

    /// Resolves a URI to its canonical member path, or `NotFound`.
    fn lookup(&self, uri: &Path) -> Result<PathBuf, ProviderError> {
        let files = self.enumerate()?;
        files
            .into_iter()
            .find(|f| f == uri)
            .ok_or_else(|| ProviderError::NotFound {
                uri: uri.to_path_buf(),
            })
    }
}
