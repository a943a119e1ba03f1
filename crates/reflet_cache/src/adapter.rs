//! Key/value byte storage with pluggable backends.
//!
//! An adapter knows nothing about manifests or staleness; it stores and
//! returns opaque byte strings per key, with an optional time-to-live.
//! The manifest engine layers its semantics on top.

use crate::error::CacheError;
use crate::manifest::unix_now;
use reflet_common::ContentHash;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

/// Magic bytes identifying a reflet cache file.
const FRAME_MAGIC: [u8; 4] = *b"RFLT";

/// Current on-disk frame format version. Increment on breaking changes.
const FRAME_FORMAT_VERSION: u32 = 1;

/// Capability set every cache backend provides.
///
/// Keys are independent of each other; no cross-key ordering is
/// guaranteed. `delete` is idempotent: deleting an absent key reports
/// `false` rather than failing. Backend unreachability surfaces as
/// [`CacheError::Unavailable`]; callers on the read path treat that as
/// a miss.
pub trait CacheAdapter: Send + Sync {
    /// Whether a live (non-expired, valid) value exists for `key`.
    fn exists(&self, key: &str) -> bool;

    /// Fetches the value for `key`. Absent, expired, or corrupt values
    /// read as `Ok(None)`; only backend failures return an error.
    fn fetch(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Stores `data` under `key`, overwriting any existing value.
    ///
    /// With a `ttl`, the value expires that long after the save; without
    /// one it lives until deleted or overwritten.
    fn save(&self, key: &str, data: &[u8], ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Deletes the value for `key`. Returns `false` when nothing was
    /// there to delete.
    fn delete(&self, key: &str) -> bool;
}

/// One value held by the in-memory backend.
struct StoredValue {
    data: Vec<u8>,
    /// Unix seconds after which the value reads as absent.
    expires_at: Option<u64>,
}

impl StoredValue {
    fn is_expired(&self, now: u64) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Process-local in-memory backend.
///
/// Values live in a map behind a mutex; expired values are pruned on
/// access. Useful as the default backend for one-shot runs and as the
/// workhorse of the test suites.
#[derive(Default)]
pub struct MemoryAdapter {
    entries: Mutex<HashMap<String, StoredValue>>,
}

impl MemoryAdapter {
    /// Creates an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (non-expired) values currently held.
    pub fn len(&self) -> usize {
        let now = unix_now();
        let entries = self.entries.lock().unwrap();
        entries.values().filter(|v| !v.is_expired(now)).count()
    }

    /// Returns `true` if no live value is held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheAdapter for MemoryAdapter {
    fn exists(&self, key: &str) -> bool {
        let now = unix_now();
        let entries = self.entries.lock().unwrap();
        entries.get(key).is_some_and(|v| !v.is_expired(now))
    }

    fn fetch(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let now = unix_now();
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(value) if value.is_expired(now) => {
                entries.remove(key);
                Ok(None)
            }
            Some(value) => Ok(Some(value.data.clone())),
            None => Ok(None),
        }
    }

    fn save(&self, key: &str, data: &[u8], ttl: Option<Duration>) -> Result<(), CacheError> {
        let expires_at = ttl.map(|ttl| unix_now().saturating_add(ttl.as_secs()));
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key.to_string(),
            StoredValue {
                data: data.to_vec(),
                expires_at,
            },
        );
        Ok(())
    }

    fn delete(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(key).is_some()
    }
}

/// Frame header prepended to every value the file backend writes.
///
/// Magic bytes and a format version identify the file, the checksum
/// detects corruption, and the optional expiry implements TTL without a
/// sidecar index. Any validation failure on read is a miss.
#[derive(Debug, Serialize, Deserialize)]
struct FrameHeader {
    magic: [u8; 4],
    format_version: u32,
    expires_at: Option<u64>,
    checksum: ContentHash,
}

/// Filesystem backend: one file per key under a root directory.
///
/// Keys may contain arbitrary characters (source keys are caller-chosen
/// strings, payload keys are hex digests), so the file name is the
/// content hash of the key itself. Values are framed with a validated
/// binary header; reads are fail-safe.
pub struct FileAdapter {
    root: PathBuf,
}

impl FileAdapter {
    /// Creates a file backend rooted at the given directory.
    ///
    /// The directory is created lazily on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The file path a key is stored at.
    pub fn key_path(&self, key: &str) -> PathBuf {
        let name = ContentHash::from_bytes(key.as_bytes());
        self.root.join(format!("{name}.bin"))
    }

    /// Reads and validates the frame for `key`, returning the payload.
    ///
    /// Missing file, short frame, bad magic, unknown format version,
    /// checksum mismatch, and expiry all read as `None`.
    fn read_valid(&self, key: &str) -> Option<Vec<u8>> {
        let raw = std::fs::read(self.key_path(key)).ok()?;
        if raw.len() < 4 {
            return None;
        }

        let header_len = u32::from_le_bytes(raw[..4].try_into().ok()?) as usize;
        if raw.len() < 4 + header_len {
            return None;
        }

        let header: FrameHeader =
            bincode::serde::decode_from_slice(&raw[4..4 + header_len], bincode::config::standard())
                .ok()?
                .0;

        if header.magic != FRAME_MAGIC || header.format_version != FRAME_FORMAT_VERSION {
            return None;
        }
        if header.expires_at.is_some_and(|at| unix_now() >= at) {
            return None;
        }

        let payload = &raw[4 + header_len..];
        if ContentHash::from_bytes(payload) != header.checksum {
            return None;
        }

        Some(payload.to_vec())
    }
}

impl CacheAdapter for FileAdapter {
    fn exists(&self, key: &str) -> bool {
        self.read_valid(key).is_some()
    }

    fn fetch(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.read_valid(key))
    }

    fn save(&self, key: &str, data: &[u8], ttl: Option<Duration>) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.root).map_err(|e| CacheError::Unavailable {
            reason: format!("cannot create {}: {e}", self.root.display()),
        })?;

        let header = FrameHeader {
            magic: FRAME_MAGIC,
            format_version: FRAME_FORMAT_VERSION,
            expires_at: ttl.map(|ttl| unix_now().saturating_add(ttl.as_secs())),
            checksum: ContentHash::from_bytes(data),
        };
        let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
            .map_err(|e| CacheError::Serialization {
                reason: e.to_string(),
            })?;

        // Frame: 4-byte header length (little-endian) + header + payload.
        let header_len = header_bytes.len() as u32;
        let mut output = Vec::with_capacity(4 + header_bytes.len() + data.len());
        output.extend_from_slice(&header_len.to_le_bytes());
        output.extend_from_slice(&header_bytes);
        output.extend_from_slice(data);

        let path = self.key_path(key);
        std::fs::write(&path, &output).map_err(|e| CacheError::Io { path, source: e })
    }

    fn delete(&self, key: &str) -> bool {
        let path = self.key_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                log::warn!("failed to delete cache file {}: {e}", path.display());
                false
            }
        }
    }
}
