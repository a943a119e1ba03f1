//! Subscriber registration and synchronous fan-out.

use crate::event::{Event, EventContext, EventKind};
use std::collections::HashMap;

/// A failure inside one subscriber.
///
/// Dispatch logs it and keeps going; it never reaches the pipeline and
/// never prevents later subscribers from running.
#[derive(Debug, Clone, thiserror::Error)]
#[error("event handler failed: {message}")]
pub struct HandlerError {
    /// What went wrong inside the handler.
    pub message: String,
}

impl HandlerError {
    /// Creates a handler error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The capability a listener must declare to receive events.
///
/// This is an explicit interface rather than a runtime probe for a
/// callable: implementers opt in by implementing the trait. Handlers run
/// inline on the dispatching thread, so `handle` must not re-enter the
/// pipeline, and implementations must be `Send + Sync` because the
/// parallel pipeline dispatches from worker threads.
pub trait Subscriber: Send + Sync {
    /// Receives one dispatched event.
    fn handle(&self, event: &Event) -> Result<(), HandlerError>;
}

/// The publish/subscribe bus.
///
/// Subscribers are registered per [`EventKind`] and invoked in
/// registration order. Registering the same subscriber twice means it
/// runs twice; the dispatcher does not deduplicate. Registration happens
/// before a run starts (`&mut self`), dispatch is read-only (`&self`) so
/// worker threads can share the dispatcher.
#[derive(Default)]
pub struct EventDispatcher {
    subscribers: HashMap<EventKind, Vec<Box<dyn Subscriber>>>,
}

impl EventDispatcher {
    /// Creates a dispatcher with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a subscriber to the given event kind's dispatch list.
    pub fn subscribe(&mut self, kind: EventKind, subscriber: Box<dyn Subscriber>) {
        self.subscribers.entry(kind).or_default().push(subscriber);
    }

    /// Number of subscribers registered for an event kind.
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscribers.get(&kind).map_or(0, Vec::len)
    }

    /// Builds the event and synchronously invokes every subscriber for
    /// its kind, in subscription order, with the same event.
    ///
    /// A subscriber returning an error is logged and skipped; the
    /// remaining subscribers still run. Returns the dispatched event.
    pub fn dispatch(&self, kind: EventKind, context: EventContext) -> Event {
        let event = Event { kind, context };
        self.dispatch_event(&event);
        event
    }

    /// Dispatches an already-built event (see [`dispatch`](Self::dispatch)).
    pub fn dispatch_event(&self, event: &Event) {
        if let Some(handlers) = self.subscribers.get(&event.kind) {
            for handler in handlers {
                if let Err(err) = handler.handle(event) {
                    log::warn!("{} subscriber failed: {err}", event.kind);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// Records the order in which it was invoked, tagged by name.
    struct Recorder {
        name: &'static str,
        calls: Arc<Mutex<Vec<(String, Event)>>>,
    }

    impl Subscriber for Recorder {
        fn handle(&self, event: &Event) -> Result<(), HandlerError> {
            self.calls
                .lock()
                .unwrap()
                .push((self.name.to_string(), event.clone()));
            Ok(())
        }
    }

    struct Failing;

    impl Subscriber for Failing {
        fn handle(&self, _event: &Event) -> Result<(), HandlerError> {
            Err(HandlerError::new("intentional"))
        }
    }

    #[test]
    fn dispatch_without_subscribers_returns_event() {
        let dispatcher = EventDispatcher::new();
        let event = Event::complete("proj");
        let out = dispatcher.dispatch(event.kind, event.context.clone());
        assert_eq!(out.kind, EventKind::Complete);
        assert_eq!(out.source_key(), Some("proj"));
    }

    #[test]
    fn fan_out_in_subscription_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(
            EventKind::Progress,
            Box::new(Recorder {
                name: "a",
                calls: Arc::clone(&calls),
            }),
        );
        dispatcher.subscribe(
            EventKind::Progress,
            Box::new(Recorder {
                name: "b",
                calls: Arc::clone(&calls),
            }),
        );

        let event = Event::progress("proj", &PathBuf::from("src/a.php"));
        dispatcher.dispatch_event(&event);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, "a");
        assert_eq!(calls[1].0, "b");
        // Both receive an identical context snapshot.
        assert_eq!(calls[0].1.context, calls[1].1.context);
    }

    #[test]
    fn subscribers_only_receive_their_kind() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(
            EventKind::Error,
            Box::new(Recorder {
                name: "errors-only",
                calls: Arc::clone(&calls),
            }),
        );

        dispatcher.dispatch_event(&Event::progress("proj", &PathBuf::from("a.php")));
        assert!(calls.lock().unwrap().is_empty());

        dispatcher.dispatch_event(&Event::error("proj", &PathBuf::from("a.php"), "bad"));
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn failing_subscriber_is_isolated() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(EventKind::Complete, Box::new(Failing));
        dispatcher.subscribe(
            EventKind::Complete,
            Box::new(Recorder {
                name: "after-failure",
                calls: Arc::clone(&calls),
            }),
        );

        dispatcher.dispatch_event(&Event::complete("proj"));
        assert_eq!(calls.lock().unwrap().len(), 1, "later handler still ran");
    }

    #[test]
    fn double_subscription_runs_twice() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();
        for _ in 0..2 {
            dispatcher.subscribe(
                EventKind::Cache,
                Box::new(Recorder {
                    name: "dup",
                    calls: Arc::clone(&calls),
                }),
            );
        }
        assert_eq!(dispatcher.subscriber_count(EventKind::Cache), 2);

        dispatcher.dispatch_event(&Event::cache_hit("proj", &PathBuf::from("a.php")));
        assert_eq!(calls.lock().unwrap().len(), 2);
    }
}
