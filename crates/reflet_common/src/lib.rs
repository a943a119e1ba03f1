//! Shared foundational types for the reflet toolkit.
//!
//! Currently this is the content-digest type used by the cache layer to
//! detect source changes and to address cached payloads.

#![warn(missing_docs)]

pub mod hash;

pub use hash::ContentHash;
