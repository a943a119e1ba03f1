//! The per-data-source manifest and its entries.
//!
//! A manifest is the index of one data source's cached files: an ordered
//! list of entries mapping a source path to the digest-addressed payload
//! that holds its parse result, plus an absolute expiry. The manifest is
//! itself one adapter value, stored under the data source's key and
//! serialized as JSON.

use crate::error::CacheError;
use reflet_common::ContentHash;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in unix seconds.
///
/// All expiry arithmetic in the cache layer runs on this clock.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// One row of a manifest: the cache state of a single source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Canonical identifier of the source file within its data source.
    pub source_path: PathBuf,

    /// Digest of the file's bytes at cache-write time.
    pub content_digest: ContentHash,

    /// Unix-seconds timestamp at which the entry stops being served.
    pub expires_at: u64,

    /// Adapter key of the cached payload; equal to the digest's hex
    /// rendering, so identical content across files shares one payload.
    pub payload_key: String,
}

impl CacheEntry {
    /// Whether the entry has aged out. The boundary is inclusive so an
    /// entry written with a zero TTL is expired in the same second.
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }

    /// Whether the entry is servable: not expired and still describing
    /// the given current content digest.
    pub fn is_fresh(&self, now: u64, current_digest: &ContentHash) -> bool {
        !self.is_expired(now) && self.content_digest == *current_digest
    }

    /// Whether this entry indexes the given file.
    pub fn is_for(&self, path: &Path) -> bool {
        self.source_path == path
    }
}

/// The ordered entry list for one data source.
///
/// Invariant (maintained by the storage engine, not by this type): at
/// most one entry per `source_path`. An empty manifest is never
/// persisted; removing the last entry deletes the manifest's adapter key
/// instead, so "no manifest" and "empty manifest" cannot be confused.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Entries in insertion order.
    pub entries: Vec<CacheEntry>,
}

impl Manifest {
    /// Creates an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a manifest from adapter bytes.
    ///
    /// Fail-safe: undecodable bytes read as `None` (treated as no
    /// manifest), never as an error.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        serde_json::from_slice(bytes).ok()
    }

    /// Encodes the manifest for the adapter.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CacheError> {
        serde_json::to_vec(self).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })
    }

    /// The entry indexing `path`, if any.
    pub fn entry_for(&self, path: &Path) -> Option<&CacheEntry> {
        self.entries.iter().find(|e| e.is_for(path))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the manifest holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
