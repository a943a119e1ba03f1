//! Configuration types deserialized from `reflet.toml`.

use serde::Deserialize;

/// The top-level project configuration parsed from `reflet.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata.
    pub project: ProjectMeta,

    /// Where the data source's files live.
    #[serde(default)]
    pub source: SourceConfig,

    /// Cache backend and lifetime settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Core project metadata required in every `reflet.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name; also the default data-source key.
    pub name: String,

    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
}

/// Where and what to enumerate as the data source.
#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    /// Directory to walk, relative to the project root.
    #[serde(default = "default_source_root")]
    pub root: String,

    /// File extensions recognized as sources.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: default_source_root(),
            extensions: default_extensions(),
        }
    }
}

/// Which cache backend to use and how long entries live.
#[derive(Debug, Deserialize)]
pub struct CacheConfig {
    /// The backend storing manifests and payloads.
    #[serde(default)]
    pub backend: CacheBackend,

    /// Cache directory for the file backend, relative to the project
    /// root.
    #[serde(default = "default_cache_dir")]
    pub dir: String,

    /// Seconds a cache entry stays servable regardless of content.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            dir: default_cache_dir(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

/// Available cache backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Persistent, one file per key (default).
    #[default]
    File,
    /// Process-local; forgets everything when the process exits.
    Memory,
}

fn default_source_root() -> String {
    "src".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["php".to_string(), "inc".to_string()]
}

fn default_cache_dir() -> String {
    ".reflet-cache".to_string()
}

fn default_ttl_secs() -> u64 {
    3600
}
