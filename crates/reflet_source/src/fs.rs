//! Filesystem-backed data sources.

use crate::error::ProviderError;
use crate::provider::Provider;
use std::path::{Path, PathBuf};

/// Default extensions recognized as PHP sources.
const DEFAULT_EXTENSIONS: [&str; 2] = ["php", "inc"];

/// A data source defined by a directory tree.
///
/// Enumeration recursively walks the root collecting files whose
/// extension is in the configured set, sorted by path so runs are
/// deterministic regardless of directory iteration order.
pub struct DirProvider {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DirProvider {
    /// Creates a provider over `root` recognizing the default PHP
    /// extensions (`.php`, `.inc`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replaces the recognized extension set.
    pub fn with_extensions(mut self, extensions: impl IntoIterator<Item = String>) -> Self {
        self.extensions = extensions.into_iter().collect();
        self
    }

    /// The directory this provider walks.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn recognizes(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|known| known == ext))
    }

    fn walk(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), ProviderError> {
        let entries = std::fs::read_dir(dir).map_err(|e| ProviderError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| ProviderError::Io {
                path: dir.to_path_buf(),
                source: e,
            })?;
            let path = entry.path();
            if path.is_dir() {
                self.walk(&path, files)?;
            } else if self.recognizes(&path) {
                files.push(path);
            }
        }
        Ok(())
    }
}

impl Provider for DirProvider {
    fn enumerate(&self) -> Result<Vec<PathBuf>, ProviderError> {
        let mut files = Vec::new();
        self.walk(&self.root, &mut files)?;
        files.sort();
        Ok(files)
    }

    fn read(&self, uri: &Path) -> Result<Vec<u8>, ProviderError> {
        std::fs::read(uri).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ProviderError::NotFound {
                    uri: uri.to_path_buf(),
                }
            } else {
                ProviderError::Io {
                    path: uri.to_path_buf(),
                    source: e,
                }
            }
        })
    }
}
