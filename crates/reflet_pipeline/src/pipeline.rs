//! The orchestrator and its run bookkeeping.

use crate::cancel::CancelToken;
use crate::error::PipelineError;
use crate::payload;
use reflet_cache::{CacheRequest, CacheStorage};
use reflet_events::{Event, EventDispatcher, EventKind, Subscriber};
use reflet_model::{build_file_model, FileModel, ModelIndex, SourceParser};
use reflet_source::Provider;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// Terminal state of one file within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Served from the cache.
    Cached,
    /// Parsed live and written through the cache.
    Parsed,
    /// Failed to load or to parse; contributed nothing further.
    Failed,
}

/// The result of processing one file.
#[derive(Debug)]
pub struct FileOutcome {
    /// How the file ended up.
    pub status: FileStatus,

    /// The file's model, when it produced one.
    pub model: Option<FileModel>,
}

impl FileOutcome {
    fn cached(model: FileModel) -> Self {
        Self {
            status: FileStatus::Cached,
            model: Some(model),
        }
    }

    fn parsed(model: FileModel) -> Self {
        Self {
            status: FileStatus::Parsed,
            model: Some(model),
        }
    }

    fn failed() -> Self {
        Self {
            status: FileStatus::Failed,
            model: None,
        }
    }
}

/// Per-run counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Files the provider enumerated.
    pub total: usize,

    /// Files parsed live.
    pub parsed: usize,

    /// Files served from the cache.
    pub cached: usize,

    /// Files that failed to load or to parse.
    pub failed: usize,

    /// Whether the run stopped early on a cancellation request.
    pub cancelled: bool,
}

impl RunSummary {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            total,
            parsed: 0,
            cached: 0,
            failed: 0,
            cancelled: false,
        }
    }

    pub(crate) fn record(&mut self, status: FileStatus) {
        match status {
            FileStatus::Cached => self.cached += 1,
            FileStatus::Parsed => self.parsed += 1,
            FileStatus::Failed => self.failed += 1,
        }
    }

    /// Files actually visited (a cancelled run visits fewer than
    /// `total`).
    pub fn visited(&self) -> usize {
        self.parsed + self.cached + self.failed
    }

    /// Whether every file was visited and none failed.
    pub fn is_clean(&self) -> bool {
        !self.cancelled && self.failed == 0
    }
}

/// What a run returns: the counters plus the aggregated model.
#[derive(Debug)]
pub struct RunOutcome {
    /// Per-run counters.
    pub summary: RunSummary,

    /// The reflection index over every file that produced a model.
    pub model: ModelIndex,
}

/// The parse pipeline for one data source shape.
///
/// Holds the provider, the external parser, the cache engine, and the
/// event dispatcher. Subscribers are registered up front; runs then
/// share the pipeline immutably, which is what lets
/// [`run_parallel`](Pipeline::run_parallel) fan out worker threads over
/// `&self`.
pub struct Pipeline {
    pub(crate) provider: Arc<dyn Provider>,
    pub(crate) parser: Arc<dyn SourceParser>,
    pub(crate) storage: CacheStorage,
    pub(crate) dispatcher: EventDispatcher,
    pub(crate) cancel: CancelToken,
}

impl Pipeline {
    /// Creates a pipeline with no subscribers.
    pub fn new(
        provider: Arc<dyn Provider>,
        parser: Arc<dyn SourceParser>,
        storage: CacheStorage,
    ) -> Self {
        Self {
            provider,
            parser,
            storage,
            dispatcher: EventDispatcher::new(),
            cancel: CancelToken::new(),
        }
    }

    /// Registers a subscriber for one event kind.
    pub fn subscribe(&mut self, kind: EventKind, subscriber: Box<dyn Subscriber>) {
        self.dispatcher.subscribe(kind, subscriber);
    }

    /// A token that cancels this pipeline's runs when triggered.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// The cache engine, for purge and inspection.
    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    /// Processes every file of the data source in enumeration order.
    ///
    /// Emits per-file events as it goes and the complete event once all
    /// files have been visited. Per-file failures are absorbed into the
    /// summary; only a provider that cannot enumerate at all aborts the
    /// run (before any event fires). A cancelled run stops between
    /// files and does not emit complete.
    pub fn run(&self, source_key: &str) -> Result<RunOutcome, PipelineError> {
        let files = self.provider.enumerate()?;
        let mut summary = RunSummary::new(files.len());
        let mut model = ModelIndex::new();

        for file in &files {
            if self.cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }
            let outcome = self.process_file(source_key, file);
            summary.record(outcome.status);
            if let Some(file_model) = outcome.model {
                model.insert(file.clone(), file_model);
            }
        }

        if !summary.cancelled {
            self.dispatcher
                .dispatch_event(&Event::complete(source_key));
        }
        Ok(RunOutcome { summary, model })
    }

    /// Runs the full per-file state machine for one file.
    ///
    /// Progress fires first. A fresh cache entry short-circuits to the
    /// cache event; otherwise the external parser runs and the result is
    /// written through the cache before the success event. Load and
    /// parse failures become error events. A cache write failure is
    /// logged and the run continues — the model was already computed.
    pub(crate) fn process_file(&self, source_key: &str, file: &Path) -> FileOutcome {
        self.dispatcher
            .dispatch_event(&Event::progress(source_key, file));

        let content = match self.provider.read(file) {
            Ok(content) => content,
            Err(err) => {
                self.dispatcher
                    .dispatch_event(&Event::error(source_key, file, &err.to_string()));
                return FileOutcome::failed();
            }
        };

        let request = CacheRequest {
            source_key,
            source_path: file,
            content: &content,
        };

        if let Some(bytes) = self.storage.fetch(&request) {
            match payload::decode_model(&bytes) {
                Some(model) => {
                    self.dispatcher
                        .dispatch_event(&Event::cache_hit(source_key, file));
                    return FileOutcome::cached(model);
                }
                // Undecodable payload: treat as a miss and reparse.
                None => log::warn!(
                    "cached payload for {} is undecodable; reparsing",
                    file.display()
                ),
            }
        }

        match self.parser.parse(&content) {
            Ok(nodes) => {
                let model = build_file_model(&nodes);
                self.write_through(&request, &model);
                let ast = serde_json::to_value(&model).unwrap_or(Value::Null);
                self.dispatcher
                    .dispatch_event(&Event::success(source_key, file, ast));
                FileOutcome::parsed(model)
            }
            Err(err) => {
                self.dispatcher
                    .dispatch_event(&Event::error(source_key, file, &err.to_string()));
                FileOutcome::failed()
            }
        }
    }

    fn write_through(&self, request: &CacheRequest<'_>, model: &FileModel) {
        let result = payload::encode_model(model)
            .and_then(|bytes| self.storage.cache(request, &bytes));
        if let Err(err) = result {
            log::warn!(
                "cache write for {} failed: {err}",
                request.source_path.display()
            );
        }
    }
}
