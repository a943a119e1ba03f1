//! The manifest engine: staleness detection, eviction, and
//! content-addressed payload storage over a [`CacheAdapter`].

use crate::adapter::CacheAdapter;
use crate::error::CacheError;
use crate::manifest::{unix_now, CacheEntry, Manifest};
use reflet_common::ContentHash;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// One cache operation's parameters.
///
/// The caller supplies the file's current bytes: it has already read
/// them to parse the file, and digesting them here is what makes the
/// cache safe against source edits between runs without the storage
/// layer touching the filesystem itself.
pub struct CacheRequest<'a> {
    /// Identifier of the data source the file belongs to.
    pub source_key: &'a str,

    /// Canonical identifier of the file within the data source.
    pub source_path: &'a Path,

    /// The file's current bytes.
    pub content: &'a [u8],
}

/// The per-data-source manifest engine.
///
/// Manifests are loaded lazily, at most once per source key, and kept
/// in memory across operations; every mutation is persisted through the
/// adapter before the operation returns. All manifest state sits behind
/// one mutex, which serializes reads and writes per engine — concurrent
/// pipeline workers cannot interleave an append with an eviction.
///
/// If persisting a mutation fails, the in-memory manifest for that key
/// is discarded so the next operation reloads the adapter's (older but
/// consistent) state instead of trusting a copy that was never written.
pub struct CacheStorage {
    adapter: Arc<dyn CacheAdapter>,
    ttl: Duration,
    manifests: Mutex<HashMap<String, Manifest>>,
}

impl CacheStorage {
    /// Creates a manifest engine over the given adapter.
    ///
    /// `ttl` bounds every entry's lifetime independently of content
    /// change; a zero TTL makes every entry expire on write (useful to
    /// force revalidation in tests).
    pub fn new(adapter: Arc<dyn CacheAdapter>, ttl: Duration) -> Self {
        Self {
            adapter,
            ttl,
            manifests: Mutex::new(HashMap::new()),
        }
    }

    /// Whether a manifest exists for `source_key` at all.
    ///
    /// Deliberately coarse: this answers "has anything ever been cached
    /// for this data source", not "is a particular file fresh" — only
    /// [`fetch`](Self::fetch) decides freshness.
    pub fn exists(&self, source_key: &str) -> bool {
        let mut table = self.lock_table();
        self.load_into(&mut table, source_key);
        table.contains_key(source_key)
    }

    /// Looks up the cached payload for the request's file.
    ///
    /// A hit requires an entry for the exact path whose digest matches
    /// the request's current content and whose TTL has not elapsed.
    /// A stale entry is evicted on the spot: dropped from the manifest,
    /// its payload deleted (unless another entry still references it),
    /// and the shrunken manifest persisted — or the manifest key deleted
    /// outright when the last entry goes. Adapter failures degrade to a
    /// miss.
    pub fn fetch(&self, req: &CacheRequest<'_>) -> Option<Vec<u8>> {
        let mut table = self.lock_table();
        self.load_into(&mut table, req.source_key);
        let manifest = table.get_mut(req.source_key)?;
        let idx = manifest
            .entries
            .iter()
            .position(|e| e.is_for(req.source_path))?;

        let now = unix_now();
        let digest = ContentHash::from_bytes(req.content);

        if manifest.entries[idx].is_fresh(now, &digest) {
            let payload_key = manifest.entries[idx].payload_key.clone();
            return match self.adapter.fetch(&payload_key) {
                Ok(payload) => payload,
                Err(err) => {
                    log::warn!("cache read for '{payload_key}' degraded to miss: {err}");
                    None
                }
            };
        }

        let evicted = manifest.entries.remove(idx);
        let shared = manifest
            .entries
            .iter()
            .any(|e| e.payload_key == evicted.payload_key);
        if !shared {
            self.delete_payload(&evicted.payload_key);
        }
        self.persist_or_invalidate(&mut table, req.source_key);
        None
    }

    /// Records a freshly computed payload for the request's file.
    ///
    /// Walks the existing entries once, retaining everything except
    /// time-expired entries and the entry for this exact path (their
    /// payloads are deleted unless still referenced), then appends the
    /// new entry and persists manifest and payload. The payload key is
    /// the content digest, so identical content across files shares one
    /// stored payload.
    pub fn cache(&self, req: &CacheRequest<'_>, payload: &[u8]) -> Result<(), CacheError> {
        let mut table = self.lock_table();
        self.load_into(&mut table, req.source_key);

        let now = unix_now();
        let digest = ContentHash::from_bytes(req.content);
        let payload_key = digest.to_string();

        // Two-pass replacement: partition into retained and dropped as
        // fresh collections, then persist once.
        let previous = table.remove(req.source_key).unwrap_or_default();
        let (retained, dropped): (Vec<CacheEntry>, Vec<CacheEntry>) = previous
            .entries
            .into_iter()
            .partition(|e| !e.is_expired(now) && !e.is_for(req.source_path));

        for old in &dropped {
            let still_referenced = retained.iter().any(|e| e.payload_key == old.payload_key)
                || old.payload_key == payload_key;
            if !still_referenced {
                self.delete_payload(&old.payload_key);
            }
        }

        let mut entries = retained;
        entries.push(CacheEntry {
            source_path: req.source_path.to_path_buf(),
            content_digest: digest,
            expires_at: now.saturating_add(self.ttl.as_secs()),
            payload_key: payload_key.clone(),
        });
        let manifest = Manifest { entries };

        // Persist the manifest first; only a persisted manifest goes
        // back into the in-memory table.
        let bytes = manifest.to_bytes()?;
        self.adapter.save(req.source_key, &bytes, None)?;
        table.insert(req.source_key.to_string(), manifest);

        self.adapter.save(&payload_key, payload, Some(self.ttl))
    }

    /// Removes everything cached for `source_key`: every entry's
    /// payload plus the manifest key itself. Returns the number of
    /// entries removed; an absent manifest is 0 and touches nothing.
    pub fn delete(&self, source_key: &str) -> usize {
        let mut table = self.lock_table();
        self.load_into(&mut table, source_key);
        let Some(manifest) = table.remove(source_key) else {
            return 0;
        };

        let count = manifest.len();
        let mut seen: HashSet<&str> = HashSet::new();
        for entry in &manifest.entries {
            if seen.insert(entry.payload_key.as_str()) {
                self.delete_payload(&entry.payload_key);
            }
        }
        self.adapter.delete(source_key);
        count
    }

    /// Convenience alias for [`delete`](Self::delete).
    pub fn purge(&self, source_key: &str) -> usize {
        self.delete(source_key)
    }

    /// The paths currently indexed for `source_key`, in entry order.
    pub fn indexed_paths(&self, source_key: &str) -> Vec<PathBuf> {
        let mut table = self.lock_table();
        self.load_into(&mut table, source_key);
        table
            .get(source_key)
            .map(|m| m.entries.iter().map(|e| e.source_path.clone()).collect())
            .unwrap_or_default()
    }

    fn lock_table(&self) -> MutexGuard<'_, HashMap<String, Manifest>> {
        self.manifests.lock().unwrap()
    }

    /// Loads the manifest for `source_key` from the adapter unless it is
    /// already in the table. Corrupt or unreachable manifests read as
    /// absent.
    fn load_into(&self, table: &mut HashMap<String, Manifest>, source_key: &str) {
        if table.contains_key(source_key) {
            return;
        }
        let bytes = match self.adapter.fetch(source_key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return,
            Err(err) => {
                log::warn!("manifest read for '{source_key}' degraded to miss: {err}");
                return;
            }
        };
        match Manifest::from_bytes(&bytes) {
            Some(manifest) => {
                table.insert(source_key.to_string(), manifest);
            }
            None => log::warn!("manifest for '{source_key}' is corrupt; treating as absent"),
        }
    }

    /// Persists the in-memory manifest after an eviction, deleting the
    /// manifest key instead when it emptied. A failed persist discards
    /// the in-memory copy.
    fn persist_or_invalidate(&self, table: &mut HashMap<String, Manifest>, source_key: &str) {
        let Some(manifest) = table.get(source_key) else {
            return;
        };
        if manifest.is_empty() {
            self.adapter.delete(source_key);
            table.remove(source_key);
            return;
        }

        let result = manifest
            .to_bytes()
            .and_then(|bytes| self.adapter.save(source_key, &bytes, None));
        if let Err(err) = result {
            log::warn!("failed to persist manifest for '{source_key}': {err}");
            table.remove(source_key);
        }
    }

    /// Deletes a payload, tolerating failure: an orphaned payload is a
    /// space leak, not a correctness bug, and must never block the
    /// manifest path.
    fn delete_payload(&self, payload_key: &str) {
        if !self.adapter.delete(payload_key) {
            log::debug!("payload '{payload_key}' was already absent");
        }
    }
}
