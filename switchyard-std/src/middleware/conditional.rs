//! Conditional middleware.

use switchyard_core::{Middleware, Next, Request, Response, Result};

/// Runs an inner middleware only for requests matching a predicate.
///
/// Other requests go straight to `next`, as if the inner middleware were not
/// registered.
pub struct Conditional<P, M> {
    predicate: P,
    inner: M,
}

impl<P, M> Conditional<P, M> {
    /// Create a conditional middleware.
    pub fn new(predicate: P, inner: M) -> Self {
        Self { predicate, inner }
    }
}

impl<P, M> Middleware for Conditional<P, M>
where
    P: Fn(&Request) -> bool + Send + Sync + 'static,
    M: Middleware,
{
    fn process(&self, request: Request, next: Next<'_>) -> Result<Response> {
        if (self.predicate)(&request) {
            self.inner.process(request, next)
        } else {
            next.handle(request)
        }
    }
}

impl<P, M: std::fmt::Debug> std::fmt::Debug for Conditional<P, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conditional")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}
