//! In-memory data sources for tests and embedders.

use crate::error::ProviderError;
use crate::provider::Provider;
use std::path::{Path, PathBuf};

/// A data source served entirely from memory.
///
/// Files are kept in insertion order, which is the enumeration order.
/// Adding a path twice replaces its content in place, preserving the
/// original position.
#[derive(Default)]
pub struct MemoryProvider {
    files: Vec<(PathBuf, Vec<u8>)>,
}

impl MemoryProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a file.
    pub fn add(mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    /// Adds (or replaces) a file on an existing provider.
    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        let path = path.into();
        let content = content.into();
        match self.files.iter_mut().find(|(p, _)| *p == path) {
            Some((_, existing)) => *existing = content,
            None => self.files.push((path, content)),
        }
    }

    /// Number of files in the data source.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if the data source has no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Provider for MemoryProvider {
    fn enumerate(&self) -> Result<Vec<PathBuf>, ProviderError> {
        Ok(self.files.iter().map(|(p, _)| p.clone()).collect())
    }

    fn read(&self, uri: &Path) -> Result<Vec<u8>, ProviderError> {
        self.files
            .iter()
            .find(|(p, _)| p == uri)
            .map(|(_, content)| content.clone())
            .ok_or_else(|| ProviderError::NotFound {
                uri: uri.to_path_buf(),
            })
    }
}
