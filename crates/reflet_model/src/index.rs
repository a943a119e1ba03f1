//! Aggregation of per-file models into a queryable index.

use crate::symbol::{FileModel, Symbol};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The reflection-style view over one processed data source.
///
/// Holds the [`FileModel`] of every visited file, keyed by path, and
/// answers cross-file queries. Iteration order is path order, so results
/// are deterministic regardless of how the pipeline scheduled the files.
#[derive(Debug, Clone, Default)]
pub struct ModelIndex {
    files: BTreeMap<PathBuf, FileModel>,
}

impl ModelIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the model for a file, replacing any previous model for the
    /// same path.
    pub fn insert(&mut self, path: PathBuf, model: FileModel) {
        self.files.insert(path, model);
    }

    /// The model for one file, if it was processed.
    pub fn file(&self, path: &Path) -> Option<&FileModel> {
        self.files.get(path)
    }

    /// Number of files in the index.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no file contributed a model.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// All class-like symbols across the data source, with their file.
    pub fn classes(&self) -> Vec<(&Path, &Symbol)> {
        self.symbols_matching(|s| matches!(s, Symbol::ClassLike { .. }))
    }

    /// All function symbols across the data source, with their file.
    pub fn functions(&self) -> Vec<(&Path, &Symbol)> {
        self.symbols_matching(|s| matches!(s, Symbol::FunctionLike { .. }))
    }

    /// All constant symbols across the data source, with their file.
    pub fn constants(&self) -> Vec<(&Path, &Symbol)> {
        self.symbols_matching(|s| matches!(s, Symbol::Constant { .. }))
    }

    /// Total number of symbols across all files.
    pub fn symbol_count(&self) -> usize {
        self.files.values().map(|m| m.symbols.len()).sum()
    }

    fn symbols_matching(&self, pred: impl Fn(&Symbol) -> bool) -> Vec<(&Path, &Symbol)> {
        self.files
            .iter()
            .flat_map(|(path, model)| {
                model
                    .symbols
                    .iter()
                    .filter(|s| pred(s))
                    .map(move |s| (path.as_path(), s))
            })
            .collect()
    }
}
