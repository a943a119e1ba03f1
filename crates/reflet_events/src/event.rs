//! Event kinds and the context bag they carry.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Context key for the data-source identifier. Present on every event.
pub const KEY_SOURCE_KEY: &str = "source_key";

/// Context key for the file path. Present on per-file events.
pub const KEY_FILE: &str = "file";

/// Context key for the parsed model. Present on success events.
pub const KEY_AST: &str = "ast";

/// Context key for the failure message. Present on error events.
pub const KEY_ERROR: &str = "error";

/// The closed set of lifecycle events the pipeline emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A file is about to be processed.
    Progress,
    /// A file was parsed live and its result cached.
    Success,
    /// A file was served from the cache.
    Cache,
    /// A file failed to parse (or to load).
    Error,
    /// Every file of the data source has been visited. Terminal.
    Complete,
}

impl EventKind {
    /// The wire/display name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Progress => "progress",
            EventKind::Success => "success",
            EventKind::Cache => "cache",
            EventKind::Error => "error",
            EventKind::Complete => "complete",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The value bag an event carries to its subscribers.
pub type EventContext = BTreeMap<String, Value>;

/// A dispatched lifecycle event.
///
/// Immutable once dispatch begins: the pipeline is the sole producer of
/// the context, subscribers only read it.
#[derive(Debug, Clone)]
pub struct Event {
    /// Which lifecycle event this is.
    pub kind: EventKind,

    /// The context bag. Fields per kind: every event carries
    /// [`KEY_SOURCE_KEY`]; per-file events add [`KEY_FILE`]; success adds
    /// [`KEY_AST`]; error adds [`KEY_ERROR`].
    pub context: EventContext,
}

impl Event {
    /// A file is about to be processed.
    pub fn progress(source_key: &str, file: &Path) -> Self {
        Self::per_file(EventKind::Progress, source_key, file)
    }

    /// A file was parsed live; `ast` is the JSON rendering of its model.
    pub fn success(source_key: &str, file: &Path, ast: Value) -> Self {
        let mut event = Self::per_file(EventKind::Success, source_key, file);
        event.context.insert(KEY_AST.to_string(), ast);
        event
    }

    /// A file was served from the cache.
    pub fn cache_hit(source_key: &str, file: &Path) -> Self {
        Self::per_file(EventKind::Cache, source_key, file)
    }

    /// A file failed to parse or to load.
    pub fn error(source_key: &str, file: &Path, message: &str) -> Self {
        let mut event = Self::per_file(EventKind::Error, source_key, file);
        event
            .context
            .insert(KEY_ERROR.to_string(), Value::String(message.to_string()));
        event
    }

    /// Every file of the data source has been visited.
    pub fn complete(source_key: &str) -> Self {
        let mut context = EventContext::new();
        context.insert(
            KEY_SOURCE_KEY.to_string(),
            Value::String(source_key.to_string()),
        );
        Self {
            kind: EventKind::Complete,
            context,
        }
    }

    /// The data-source identifier carried by every event.
    pub fn source_key(&self) -> Option<&str> {
        self.context.get(KEY_SOURCE_KEY).and_then(Value::as_str)
    }

    /// The file path, for per-file events.
    pub fn file(&self) -> Option<&str> {
        self.context.get(KEY_FILE).and_then(Value::as_str)
    }

    /// The failure message, for error events.
    pub fn error_message(&self) -> Option<&str> {
        self.context.get(KEY_ERROR).and_then(Value::as_str)
    }

    fn per_file(kind: EventKind, source_key: &str, file: &Path) -> Self {
        let mut context = EventContext::new();
        context.insert(
            KEY_SOURCE_KEY.to_string(),
            Value::String(source_key.to_string()),
        );
        context.insert(
            KEY_FILE.to_string(),
            Value::String(file.display().to_string()),
        );
        Self { kind, context }
    }
}
