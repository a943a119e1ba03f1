//! Parsing and validation of `reflet.toml` project configuration files.
//!
//! The configuration names the project, describes where its sources live,
//! and selects the cache backend and entry time-to-live. Loading produces
//! a strongly-typed [`ProjectConfig`] with defaults filled in.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::{CacheBackend, CacheConfig, ProjectConfig, ProjectMeta, SourceConfig};
