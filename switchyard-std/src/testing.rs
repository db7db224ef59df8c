//! Testing utilities for Switchyard.
//!
//! This module provides doubles that make testing endpoints, middleware and
//! listeners easier.
//!
//! # Features
//!
//! - [`RecordingCallback`]: A listener callback that records the events it sees
//! - [`CountingHandler`], [`TextHandler`], [`EchoHandler`], [`FailingHandler`]:
//!   terminal handlers with fixed behavior
//! - [`TraceLog`]: A shared log that middleware, callbacks and handlers write
//!   their labels to, for asserting execution order
//! - [`request`] and [`body_text`]: message helpers

use bytes::Bytes;
use http::{Method, StatusCode};
use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use switchyard_core::{
    BoxError, Callback, Event, Handler, Middleware, Request, Response, callback_fn, handler_fn,
    middleware_fn,
};

// ============================================================================
// Message helpers
// ============================================================================

/// Build a request.
///
/// # Panics
///
/// Panics if `method` or `path` is not valid, which in a test is a bug in the
/// test itself.
pub fn request(method: &str, path: &str, body: impl Into<Bytes>) -> Request {
    let method = Method::from_bytes(method.as_bytes()).expect("test request method");
    http::Request::builder()
        .method(method)
        .uri(path)
        .body(body.into())
        .expect("test request")
}

/// A response body as text, lossily decoded.
pub fn body_text(response: &Response) -> String {
    String::from_utf8_lossy(response.body()).into_owned()
}

// ============================================================================
// Recording Callback
// ============================================================================

/// A listener callback that records the type of every event it receives.
///
/// Clones share the record.
///
/// # Example
///
/// ```rust
/// use switchyard_core::{Callback, Event};
/// use switchyard_std::testing::RecordingCallback;
///
/// let recorder = RecordingCallback::new();
/// recorder.clone().invoke(&mut Event::empty("tick")).unwrap();
/// assert_eq!(recorder.kinds(), ["tick"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingCallback {
    kinds: Arc<Mutex<Vec<String>>>,
    stop: bool,
}

impl RecordingCallback {
    /// Create a recording callback that lets events propagate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recording callback that stops propagation.
    pub fn stopping() -> Self {
        Self {
            stop: true,
            ..Self::default()
        }
    }

    /// The recorded event types, oldest first.
    pub fn kinds(&self) -> Vec<String> {
        self.kinds.lock().clone()
    }

    /// The number of recorded events.
    pub fn count(&self) -> usize {
        self.kinds.lock().len()
    }

    /// Clear the record.
    pub fn clear(&self) {
        self.kinds.lock().clear();
    }
}

impl Callback for RecordingCallback {
    fn invoke(&self, event: &mut Event) -> Result<(), BoxError> {
        self.kinds.lock().push(event.kind().to_owned());
        if self.stop {
            event.stop_propagation();
        }
        Ok(())
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// A handler that counts invocations and answers with an empty 200.
///
/// Clones share the counter.
#[derive(Debug, Clone, Default)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    /// Create a new counting handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the count.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl Handler for CountingHandler {
    fn handle(&self, _request: Request) -> Result<Response, BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(Response::new(Bytes::new()))
    }
}

/// A handler that answers every request with the same body.
#[derive(Debug, Clone)]
pub struct TextHandler {
    body: Bytes,
}

impl TextHandler {
    /// Create a handler answering with `body`.
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self { body: body.into() }
    }
}

impl Handler for TextHandler {
    fn handle(&self, _request: Request) -> Result<Response, BoxError> {
        Ok(Response::new(self.body.clone()))
    }
}

/// A handler that answers with the request body.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

impl Handler for EchoHandler {
    fn handle(&self, request: Request) -> Result<Response, BoxError> {
        Ok(Response::new(request.into_body()))
    }
}

/// A handler that always fails.
#[derive(Debug, Clone)]
pub struct FailingHandler {
    message: String,
}

impl FailingHandler {
    /// Create a handler failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Handler for FailingHandler {
    fn handle(&self, _request: Request) -> Result<Response, BoxError> {
        Err(self.message.clone().into())
    }
}

// ============================================================================
// Trace Log
// ============================================================================

/// A shared, ordered log of labels.
///
/// Middleware created by [`TraceLog::middleware`] write `label:in` before
/// calling `next` and `label:out` after; callbacks and handlers write their
/// bare label. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct TraceLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl TraceLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    /// The entries, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Clear the log.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// A middleware that logs around the rest of the chain.
    pub fn middleware(&self, label: &str) -> impl Middleware + use<> {
        let log = self.clone();
        let label = label.to_owned();
        middleware_fn(move |request, next| {
            log.push(format!("{label}:in"));
            let result = next.handle(request);
            log.push(format!("{label}:out"));
            result
        })
    }

    /// A callback that logs its label.
    pub fn callback(&self, label: &str) -> impl Callback + use<> {
        let log = self.clone();
        let label = label.to_owned();
        callback_fn(move |_| {
            log.push(label.clone());
            Ok(())
        })
    }

    /// A handler that logs its label and answers with it as body.
    pub fn handler(&self, label: &str) -> impl Handler + use<> {
        let log = self.clone();
        let label = label.to_owned();
        handler_fn(move |_| {
            log.push(label.clone());
            let mut response = Response::new(Bytes::from(label.clone()));
            *response.status_mut() = StatusCode::OK;
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchyard_core::{Error, Next};

    #[test]
    fn test_recording_callback() {
        let recorder = RecordingCallback::stopping();
        let mut event = Event::empty("tick");
        recorder.invoke(&mut event).unwrap();

        assert!(event.is_propagation_stopped());
        assert_eq!(recorder.kinds(), ["tick"]);
        recorder.clear();
        assert_eq!(recorder.count(), 0);
    }

    #[test]
    fn test_handlers() {
        let echo = EchoHandler.handle(request("POST", "/", "Greetings")).unwrap();
        assert_eq!(body_text(&echo), "Greetings");

        let text = TextHandler::new("Hello World").handle(request("GET", "/", "")).unwrap();
        assert_eq!(body_text(&text), "Hello World");

        let counting = CountingHandler::new();
        counting.clone().handle(request("GET", "/", "")).unwrap();
        assert_eq!(counting.count(), 1);
        counting.reset();
        assert_eq!(counting.count(), 0);
    }

    #[test]
    fn test_failing_handler_error_surfaces_through_next() {
        let handler = FailingHandler::new("boom");
        let err = Next::new(&[], &handler).handle(request("GET", "/", "")).unwrap_err();
        assert!(matches!(&err, Error::Handler(source) if source.to_string() == "boom"));
    }

    #[test]
    fn test_trace_log() {
        let log = TraceLog::new();
        let mut event = Event::empty("tick");
        log.callback("listener").invoke(&mut event).unwrap();
        log.handler("handler").handle(request("GET", "/", "")).unwrap();
        assert_eq!(log.entries(), ["listener", "handler"]);
    }
}
