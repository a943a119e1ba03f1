//! The caching and incremental-reparse layer of reflet.
//!
//! A [`CacheAdapter`] is plain key/value byte storage with pluggable
//! backends; [`CacheStorage`] builds the per-data-source manifest engine
//! on top of it: one manifest per source key maps file paths to
//! content-digest-addressed payload entries with expiration, so a second
//! run only re-parses files whose bytes actually changed (or whose entry
//! aged out). All reads are fail-safe: corruption, expiry, or an
//! unavailable backend degrade to a cache miss, never an error on the
//! parse path.

#![warn(missing_docs)]

pub mod adapter;
pub mod error;
pub mod manifest;
pub mod storage;

pub use adapter::{CacheAdapter, FileAdapter, MemoryAdapter};
pub use error::CacheError;
pub use manifest::{unix_now, CacheEntry, Manifest};
pub use storage::{CacheRequest, CacheStorage};
