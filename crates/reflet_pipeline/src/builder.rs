//! Wiring a pipeline from project configuration.

use crate::pipeline::Pipeline;
use reflet_cache::{CacheAdapter, CacheStorage, FileAdapter, MemoryAdapter};
use reflet_config::{CacheBackend, ProjectConfig};
use reflet_model::SourceParser;
use reflet_source::DirProvider;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Builds a pipeline for a configured project.
///
/// The provider walks `<project_dir>/<source.root>` for the configured
/// extensions; the cache backend and TTL come from the `[cache]`
/// section. The parser stays a parameter: which PHP parser to wrap is
/// the embedder's choice, not configuration.
pub fn from_config(
    config: &ProjectConfig,
    project_dir: &Path,
    parser: Arc<dyn SourceParser>,
) -> Pipeline {
    let provider = DirProvider::new(project_dir.join(&config.source.root))
        .with_extensions(config.source.extensions.iter().cloned());

    let adapter: Arc<dyn CacheAdapter> = match config.cache.backend {
        CacheBackend::Memory => Arc::new(MemoryAdapter::new()),
        CacheBackend::File => Arc::new(FileAdapter::new(project_dir.join(&config.cache.dir))),
    };
    let storage = CacheStorage::new(adapter, Duration::from_secs(config.cache.ttl_secs));

    Pipeline::new(Arc::new(provider), parser, storage)
}
