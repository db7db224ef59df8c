//! The middleware onion.
//!
//! A [`Stack`] composes an ordered middleware list around one terminal handler.
//! The first entry is the outermost layer: it sees the request first and the
//! response last.
//!
//! A stack holds no cursor. Each [`Stack::handle`] call starts a fresh
//! positional [`Next`], so one stack may serve any number of requests, from any
//! number of threads, without one request advancing another.

use std::sync::Arc;
use switchyard_core::{
    BoxError, Error, Handler, Middleware, MiddlewareEntry, Next, Request, Response, Result,
};
use tracing::trace;

/// Middleware composed around a terminal handler.
#[derive(Clone)]
pub struct Stack {
    chain: Vec<Arc<dyn Middleware>>,
    endpoint: Arc<dyn Handler>,
}

impl Stack {
    /// Compose `entries`, outermost first, around `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] when `entries` are not in ascending priority
    /// order. The registry always hands them out sorted, so an unsorted list
    /// means the caller assembled it by hand.
    pub fn new(entries: &[MiddlewareEntry], endpoint: Arc<dyn Handler>) -> Result<Self> {
        if !entries.is_sorted_by_key(MiddlewareEntry::priority) {
            return Err(Error::internal(
                "middleware entries must be sorted by ascending priority",
            ));
        }
        Ok(Self {
            chain: entries.iter().map(|e| Arc::clone(e.instance())).collect(),
            endpoint,
        })
    }

    /// A stack with no middleware; requests go straight to `endpoint`.
    pub fn bare(endpoint: Arc<dyn Handler>) -> Self {
        Self {
            chain: Vec::new(),
            endpoint,
        }
    }

    /// Run a request through every layer and the terminal handler.
    pub fn handle(&self, request: Request) -> Result<Response> {
        trace!(stages = self.chain.len(), "Entering middleware stack");
        Next::new(&self.chain, self.endpoint.as_ref()).handle(request)
    }

    /// Number of middleware layers.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Whether the stack has no middleware.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

impl Handler for Stack {
    fn handle(&self, request: Request) -> Result<Response, BoxError> {
        Stack::handle(self, request).map_err(Into::into)
    }
}

impl std::fmt::Debug for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stack")
            .field("layers", &self.chain.len())
            .finish_non_exhaustive()
    }
}
