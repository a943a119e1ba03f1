//! Data-source providers: what files constitute a data source.
//!
//! The pipeline never walks the filesystem itself; a [`Provider`] hands
//! it an ordered file enumeration and reads file bytes on demand.
//! [`DirProvider`] is the filesystem implementation; [`MemoryProvider`]
//! serves in-memory fixtures for tests and embedders.

#![warn(missing_docs)]

pub mod error;
pub mod fs;
pub mod memory;
pub mod provider;

pub use error::ProviderError;
pub use fs::DirProvider;
pub use memory::MemoryProvider;
pub use provider::Provider;
