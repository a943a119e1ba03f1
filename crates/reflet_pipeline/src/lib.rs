//! The parse pipeline: orchestrates providers, parser, cache, and events.
//!
//! For each file of a data source the pipeline announces progress, asks
//! the cache for a still-valid parse result, parses live on a miss (and
//! writes the result through the cache), and reports the outcome as a
//! success, cache, or error event. Once every file has been visited it
//! emits the terminal complete event. One file failing never takes the
//! data source down with it.
//!
//! Runs are sequential by default ([`Pipeline::run`]) which gives strict
//! per-file event ordering; [`Pipeline::run_parallel`] fans files out
//! over a thread pool when order across files does not matter.

#![warn(missing_docs)]

pub mod builder;
pub mod cancel;
pub mod error;
pub mod parallel;
pub mod payload;
pub mod pipeline;

pub use builder::from_config;
pub use cancel::CancelToken;
pub use error::PipelineError;
pub use pipeline::{FileOutcome, FileStatus, Pipeline, RunOutcome, RunSummary};
