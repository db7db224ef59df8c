//! The event bus.
//!
//! [`Dispatcher::dispatch`] hands one [`Event`] to every listener registered for
//! its type, by ascending priority, until a listener stops propagation. A
//! failing listener aborts the dispatch and its error reaches the caller.
//!
//! While a dispatch runs, its event type is marked as processing for the
//! calling thread. Listeners use [`Dispatcher::is_processing`] to avoid
//! re-triggering the event type they are handling.

use crate::{config::DEFAULT_MAX_DISPATCH_DEPTH, registry::Registry};
use parking_lot::Mutex;
use std::{
    num::NonZeroUsize,
    sync::Arc,
    thread::{self, ThreadId},
};
use switchyard_core::{Error, Event, Listener, Result};
use tracing::{debug, debug_span, trace};

/// Priority-ordered event dispatcher backed by a [`Registry`].
pub struct Dispatcher {
    registry: Arc<Registry>,
    /// Event types on the call stack, tagged with the dispatching thread.
    processing: Mutex<Vec<(ThreadId, String)>>,
    max_depth: NonZeroUsize,
}

impl Dispatcher {
    /// Create a dispatcher reading listeners from `registry`.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_max_depth(registry, DEFAULT_MAX_DISPATCH_DEPTH)
    }

    /// Create a dispatcher that allows at most `max_depth` nested dispatches
    /// on one thread.
    pub fn with_max_depth(registry: Arc<Registry>, max_depth: NonZeroUsize) -> Self {
        Self {
            registry,
            processing: Mutex::new(Vec::new()),
            max_depth,
        }
    }

    /// The registry listeners are read from.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// The nesting limit.
    pub fn max_depth(&self) -> usize {
        self.max_depth.get()
    }

    /// The listeners `event` would be handed to, in invocation order.
    pub fn listeners_for(&self, event: &Event) -> Vec<Listener> {
        self.registry.type_listeners(event.kind())
    }

    /// Whether a dispatch of `kind` is on the calling thread's stack.
    pub fn is_processing(&self, kind: &str) -> bool {
        let thread = thread::current().id();
        self.processing
            .lock()
            .iter()
            .any(|(t, k)| *t == thread && k == kind)
    }

    /// Dispatch an event to its listeners and return it.
    ///
    /// Listeners are snapshotted before the first one runs; registrations made
    /// by a listener take effect from the next dispatch on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Listener`] when a callback fails. The listeners after
    /// it do not run. Returns [`Error::Internal`] when the nesting limit would
    /// be exceeded.
    pub fn dispatch(&self, mut event: Event) -> Result<Event> {
        let span = debug_span!("dispatch", event = %event.kind());
        let _enter = span.enter();

        let _marker = self.mark(event.kind())?;

        for listener in self.listeners_for(&event) {
            if event.is_propagation_stopped() {
                trace!("Propagation stopped");
                break;
            }
            debug!(
                listener = %listener.id(),
                priority = listener.priority(),
                "Invoking listener"
            );
            listener
                .callback()
                .invoke(&mut event)
                .map_err(|source| Error::Listener {
                    id: listener.id().to_owned(),
                    event: event.kind().to_owned(),
                    source,
                })?;
        }

        Ok(event)
    }

    fn mark(&self, kind: &str) -> Result<ProcessingMarker<'_>> {
        let thread = thread::current().id();
        let mut processing = self.processing.lock();

        let depth = processing.iter().filter(|(t, _)| *t == thread).count();
        if depth >= self.max_depth.get() {
            return Err(Error::internal(format!(
                "dispatch of {kind:?} exceeds the nesting limit of {}",
                self.max_depth
            )));
        }

        processing.push((thread, kind.to_owned()));
        Ok(ProcessingMarker {
            processing: &self.processing,
            thread,
        })
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Arc::new(Registry::new()))
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

/// Pops the innermost marker of its thread when dropped.
struct ProcessingMarker<'a> {
    processing: &'a Mutex<Vec<(ThreadId, String)>>,
    thread: ThreadId,
}

impl Drop for ProcessingMarker<'_> {
    fn drop(&mut self) {
        let mut processing = self.processing.lock();
        if let Some(i) = processing.iter().rposition(|(t, _)| *t == self.thread) {
            processing.remove(i);
        }
    }
}
