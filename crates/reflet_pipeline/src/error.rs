//! Error types for pipeline runs.

use reflet_source::ProviderError;

/// Errors that abort a run before (or instead of) processing files.
///
/// Per-file problems never show up here: parse failures and cache
/// hiccups are reported through events and the run summary. This enum is
/// for failures that make the whole operation meaningless, such as a
/// provider that cannot enumerate its data source at all.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The provider failed to enumerate the data source.
    #[error("failed to enumerate data source: {0}")]
    Provider(#[from] ProviderError),
}
