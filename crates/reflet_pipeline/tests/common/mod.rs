//! Shared fixtures for the pipeline integration suites.

#![allow(dead_code)]

use reflet_events::{Event, EventKind, HandlerError, Subscriber};
use reflet_model::{AstNode, NodeKind, ParseError, SourceParser};
use reflet_pipeline::CancelToken;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A line-oriented fixture parser.
///
/// Each line is one declaration: `class Name`, `interface Name`,
/// `trait Name`, `enum Name`, `function name`, `const NAME [value]`.
/// A line reading `!error message` fails the whole file. Anything else
/// (including the `<?php` opener) is an untracked node. Invocations are
/// counted so tests can assert how often live parsing actually ran.
#[derive(Default)]
pub struct FixtureParser {
    calls: AtomicUsize,
}

impl FixtureParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `parse` has run.
    pub fn parse_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl SourceParser for FixtureParser {
    fn parse(&self, source: &[u8]) -> Result<Vec<AstNode>, ParseError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let text = String::from_utf8_lossy(source);
        let mut nodes = Vec::new();

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx as u32 + 1;
            let mut words = line.split_whitespace();
            let Some(head) = words.next() else { continue };
            let name = words.next().unwrap_or("").to_string();

            let node = match head {
                "class" => AstNode::new(NodeKind::Class, name, line_no),
                "interface" => AstNode::new(NodeKind::Interface, name, line_no),
                "trait" => AstNode::new(NodeKind::Trait, name, line_no),
                "enum" => AstNode::new(NodeKind::Enum, name, line_no),
                "function" => AstNode::new(NodeKind::Function, name, line_no),
                "const" => {
                    let node = AstNode::new(NodeKind::Constant, name, line_no);
                    match words.next() {
                        Some(value) => node.with_value(value),
                        None => node,
                    }
                }
                "!error" => {
                    let message = line.trim_start_matches("!error").trim();
                    return Err(ParseError::new(message, line_no));
                }
                other => AstNode::new(NodeKind::Other, other, line_no),
            };
            nodes.push(node);
        }

        Ok(nodes)
    }
}

/// Shared, ordered log of `(subscriber name, event)` pairs.
pub type EventLog = Arc<Mutex<Vec<(&'static str, Event)>>>;

/// Creates an empty event log.
pub fn new_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Appends every received event to a shared log.
pub struct Recorder {
    pub name: &'static str,
    pub log: EventLog,
}

impl Recorder {
    pub fn boxed(name: &'static str, log: &EventLog) -> Box<Self> {
        Box::new(Self {
            name,
            log: Arc::clone(log),
        })
    }
}

impl Subscriber for Recorder {
    fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        self.log.lock().unwrap().push((self.name, event.clone()));
        Ok(())
    }
}

/// All five event kinds, for subscribing one recorder to everything.
pub const ALL_KINDS: [EventKind; 5] = [
    EventKind::Progress,
    EventKind::Success,
    EventKind::Cache,
    EventKind::Error,
    EventKind::Complete,
];

/// The kinds in the log, in dispatch order.
pub fn kinds_of(log: &EventLog) -> Vec<EventKind> {
    log.lock().unwrap().iter().map(|(_, e)| e.kind).collect()
}

/// The `(kind, file)` pairs in the log, in dispatch order.
pub fn kind_files_of(log: &EventLog) -> Vec<(EventKind, Option<String>)> {
    log.lock()
        .unwrap()
        .iter()
        .map(|(_, e)| (e.kind, e.file().map(str::to_string)))
        .collect()
}

/// Cancels a token when it sees its first event.
pub struct CancelOnFirstEvent {
    pub token: CancelToken,
}

impl Subscriber for CancelOnFirstEvent {
    fn handle(&self, _event: &Event) -> Result<(), HandlerError> {
        self.token.cancel();
        Ok(())
    }
}
