//! Parallel runs and cancellation: the complete-event barrier, totals,
//! and cooperative early exit.

mod common;

use common::{kinds_of, new_log, CancelOnFirstEvent, FixtureParser, Recorder, ALL_KINDS};
use reflet_cache::{CacheStorage, MemoryAdapter};
use reflet_events::EventKind;
use reflet_model::SourceParser;
use reflet_pipeline::Pipeline;
use reflet_source::MemoryProvider;
use std::sync::Arc;
use std::time::Duration;

const HOUR: Duration = Duration::from_secs(3600);

fn many_files(count: usize) -> MemoryProvider {
    let mut provider = MemoryProvider::new();
    for i in 0..count {
        provider.insert(format!("src/file_{i:02}.php"), format!("class Class{i}"));
    }
    provider
}

fn make_pipeline(provider: MemoryProvider, parser: Arc<FixtureParser>) -> Pipeline {
    let storage = CacheStorage::new(Arc::new(MemoryAdapter::new()), HOUR);
    Pipeline::new(Arc::new(provider), parser as Arc<dyn SourceParser>, storage)
}

#[test]
fn parallel_run_visits_every_file_and_completes_last() {
    let parser = Arc::new(FixtureParser::new());
    let mut pipeline = make_pipeline(many_files(8), Arc::clone(&parser));

    let log = new_log();
    for kind in ALL_KINDS {
        pipeline.subscribe(kind, Recorder::boxed("all", &log));
    }

    let outcome = pipeline.run_parallel("proj").unwrap();
    assert_eq!(outcome.summary.total, 8);
    assert_eq!(outcome.summary.parsed, 8);
    assert!(outcome.summary.is_clean());
    assert_eq!(parser.parse_count(), 8, "each file computed exactly once");

    let kinds = kinds_of(&log);
    assert_eq!(kinds.len(), 17, "8 progress + 8 success + 1 complete");
    assert_eq!(
        kinds.iter().filter(|k| **k == EventKind::Progress).count(),
        8
    );
    assert_eq!(
        kinds.iter().filter(|k| **k == EventKind::Success).count(),
        8
    );
    assert_eq!(
        *kinds.last().unwrap(),
        EventKind::Complete,
        "complete is a strict barrier"
    );
}

#[test]
fn parallel_second_run_hits_the_cache() {
    let parser = Arc::new(FixtureParser::new());
    let pipeline = make_pipeline(many_files(8), Arc::clone(&parser));

    pipeline.run_parallel("proj").unwrap();
    let second = pipeline.run_parallel("proj").unwrap();

    assert_eq!(second.summary.cached, 8);
    assert_eq!(second.summary.parsed, 0);
    assert_eq!(parser.parse_count(), 8);
    assert_eq!(second.model.classes().len(), 8);
}

#[test]
fn parallel_failures_stay_isolated() {
    let mut provider = many_files(4);
    provider.insert("src/broken.php", "!error no good");
    let parser = Arc::new(FixtureParser::new());
    let mut pipeline = make_pipeline(provider, parser);

    let log = new_log();
    for kind in ALL_KINDS {
        pipeline.subscribe(kind, Recorder::boxed("all", &log));
    }

    let outcome = pipeline.run_parallel("proj").unwrap();
    assert_eq!(outcome.summary.failed, 1);
    assert_eq!(outcome.summary.parsed, 4);
    assert_eq!(*kinds_of(&log).last().unwrap(), EventKind::Complete);
}

#[test]
fn sequential_and_parallel_agree_on_the_model() {
    let parser_a = Arc::new(FixtureParser::new());
    let sequential = make_pipeline(many_files(6), parser_a);
    let parser_b = Arc::new(FixtureParser::new());
    let parallel = make_pipeline(many_files(6), parser_b);

    let a = sequential.run("proj").unwrap();
    let b = parallel.run_parallel("proj").unwrap();

    assert_eq!(a.model.file_count(), b.model.file_count());
    let names_a: Vec<String> = a.model.classes().iter().map(|(_, s)| s.name().to_string()).collect();
    let names_b: Vec<String> = b.model.classes().iter().map(|(_, s)| s.name().to_string()).collect();
    assert_eq!(names_a, names_b, "path-ordered index is schedule-independent");
}

#[test]
fn precancelled_sequential_run_emits_no_events() {
    let mut pipeline = make_pipeline(many_files(3), Arc::new(FixtureParser::new()));
    let log = new_log();
    for kind in ALL_KINDS {
        pipeline.subscribe(kind, Recorder::boxed("all", &log));
    }

    pipeline.cancel_token().cancel();
    let outcome = pipeline.run("proj").unwrap();

    assert!(outcome.summary.cancelled);
    assert_eq!(outcome.summary.visited(), 0);
    assert!(log.lock().unwrap().is_empty(), "no events, no complete");
}

#[test]
fn cancelling_mid_run_stops_between_files() {
    let mut pipeline = make_pipeline(many_files(5), Arc::new(FixtureParser::new()));

    let log = new_log();
    for kind in ALL_KINDS {
        pipeline.subscribe(kind, Recorder::boxed("all", &log));
    }
    // The first progress event cancels the run; the in-flight file still
    // finishes.
    pipeline.subscribe(
        EventKind::Progress,
        Box::new(CancelOnFirstEvent {
            token: pipeline.cancel_token(),
        }),
    );

    let outcome = pipeline.run("proj").unwrap();

    assert!(outcome.summary.cancelled);
    assert_eq!(outcome.summary.visited(), 1);
    assert_eq!(
        kinds_of(&log),
        vec![EventKind::Progress, EventKind::Success],
        "first file completes, nothing after, no complete event"
    );

    // The cache keeps what was committed before the cancellation.
    assert!(pipeline.storage().exists("proj"));
}

#[test]
fn precancelled_parallel_run_suppresses_complete() {
    let mut pipeline = make_pipeline(many_files(4), Arc::new(FixtureParser::new()));
    let log = new_log();
    for kind in ALL_KINDS {
        pipeline.subscribe(kind, Recorder::boxed("all", &log));
    }

    pipeline.cancel_token().cancel();
    let outcome = pipeline.run_parallel("proj").unwrap();

    assert!(outcome.summary.cancelled);
    assert_eq!(outcome.summary.visited(), 0);
    assert!(!kinds_of(&log).contains(&EventKind::Complete));
}
