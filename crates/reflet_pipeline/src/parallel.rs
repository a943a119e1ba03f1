//! Parallel execution across files.
//!
//! Files of a data source are independent units of work, so they can be
//! fanned out over a thread pool. The manifest engine serializes its own
//! mutations, each file is claimed by exactly one worker (rayon
//! partitions the enumeration, so no two workers compute the same file),
//! and the complete event is dispatched only after the parallel join —
//! strictly after every per-file event.

use crate::pipeline::{Pipeline, RunOutcome, RunSummary};
use crate::PipelineError;
use rayon::prelude::*;
use reflet_events::Event;
use reflet_model::ModelIndex;

impl Pipeline {
    /// Processes the data source's files on rayon's thread pool.
    ///
    /// Event ordering across files is unspecified (events for one file
    /// still happen in order, and complete is dispatched last); use
    /// [`run`](Pipeline::run) when listeners depend on strict file
    /// order. Cancellation is checked as each file is picked up; files
    /// skipped by a cancellation leave the summary marked cancelled and
    /// suppress the complete event.
    pub fn run_parallel(&self, source_key: &str) -> Result<RunOutcome, PipelineError> {
        let files = self.provider.enumerate()?;
        let total = files.len();

        let outcomes: Vec<_> = files
            .into_par_iter()
            .map(|file| {
                if self.cancel.is_cancelled() {
                    return None;
                }
                let outcome = self.process_file(source_key, &file);
                Some((file, outcome))
            })
            .collect();

        let mut summary = RunSummary::new(total);
        let mut model = ModelIndex::new();
        for entry in outcomes {
            match entry {
                Some((file, outcome)) => {
                    summary.record(outcome.status);
                    if let Some(file_model) = outcome.model {
                        model.insert(file, file_model);
                    }
                }
                None => summary.cancelled = true,
            }
        }

        if !summary.cancelled {
            self.dispatcher
                .dispatch_event(&Event::complete(source_key));
        }
        Ok(RunOutcome { summary, model })
    }
}
