//! Content digests for staleness detection and content-addressed storage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit XXH3 digest of a source file's bytes.
///
/// The digest plays two roles in the cache layer: comparing it against a
/// manifest entry decides whether a cached parse result is still valid,
/// and its hex rendering is the storage key for the cached payload
/// (content-addressing). Two inputs with the same `ContentHash` are
/// assumed identical. This is a cache-integrity check, not a security
/// boundary.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes the digest of a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}
