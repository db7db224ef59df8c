//! # Middleware Chain
//!
//! A [`Middleware`] wraps everything downstream of it. It receives the request
//! together with a [`Next`] handle and decides whether to:
//!
//! - short-circuit by returning its own response without calling `next`
//! - delegate by calling `next.handle(request)`
//! - transform the request before delegating, or the response after
//!
//! # Calling `next` more than once
//!
//! [`Next`] is `Copy` and holds its own position in the chain, so a middleware
//! may call it again (e.g. to retry). Every call re-runs the full remainder of
//! the chain from that position, including the endpoint handler. Whether
//! repeating downstream side effects is acceptable is the caller's concern.

use crate::{
    error::{Error, Result},
    handler::Handler,
    message::{Request, Response},
};
use std::sync::Arc;

/// A pipeline stage wrapping the terminal handler.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Middleware`",
    label = "missing `Middleware` implementation",
    note = "Implement `Middleware::process`, or wrap a closure with `middleware_fn`."
)]
pub trait Middleware: Send + Sync + 'static {
    /// Process a request, optionally delegating to the rest of the chain.
    fn process(&self, request: Request, next: Next<'_>) -> Result<Response>;
}

/// A handle on the remainder of a middleware chain.
///
/// Advancing is positional: a `Next` never mutates shared state, so two chains
/// built over the same middleware list cannot disturb one another.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    chain: &'a [Arc<dyn Middleware>],
    endpoint: &'a dyn Handler,
}

impl<'a> Next<'a> {
    /// Create a handle positioned at the start of `chain`.
    pub fn new(chain: &'a [Arc<dyn Middleware>], endpoint: &'a dyn Handler) -> Self {
        Self { chain, endpoint }
    }

    /// Number of middleware stages left before the endpoint handler.
    pub fn remaining(&self) -> usize {
        self.chain.len()
    }

    /// Run the rest of the chain.
    pub fn handle(self, request: Request) -> Result<Response> {
        match self.chain.split_first() {
            Some((current, rest)) => current.process(
                request,
                Next {
                    chain: rest,
                    endpoint: self.endpoint,
                },
            ),
            None => self.endpoint.handle(request).map_err(Error::from_boxed),
        }
    }
}

impl std::fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Next")
            .field("remaining", &self.chain.len())
            .finish_non_exhaustive()
    }
}

/// A [`Middleware`] built from a closure. See [`middleware_fn`].
#[derive(Clone, Copy)]
pub struct MiddlewareFn<F> {
    f: F,
}

/// Wrap a closure as a [`Middleware`].
///
/// # Example
///
/// ```rust
/// use switchyard_core::middleware_fn;
///
/// let passthrough = middleware_fn(|request, next| next.handle(request));
/// ```
pub fn middleware_fn<F>(f: F) -> MiddlewareFn<F>
where
    F: for<'a> Fn(Request, Next<'a>) -> Result<Response> + Send + Sync + 'static,
{
    MiddlewareFn { f }
}

impl<F> Middleware for MiddlewareFn<F>
where
    F: for<'a> Fn(Request, Next<'a>) -> Result<Response> + Send + Sync + 'static,
{
    fn process(&self, request: Request, next: Next<'_>) -> Result<Response> {
        (self.f)(request, next)
    }
}

impl<F> std::fmt::Debug for MiddlewareFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareFn").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::handler_fn;
    use bytes::Bytes;
    use http::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tagging(tag: &'static str) -> Arc<dyn Middleware> {
        Arc::new(middleware_fn(move |request, next| {
            let mut response = next.handle(request)?;
            let mut body = response.body().to_vec();
            body.extend_from_slice(tag.as_bytes());
            *response.body_mut() = Bytes::from(body);
            Ok(response)
        }))
    }

    #[test]
    fn test_onion_order() {
        let chain = vec![tagging("a"), tagging("b")];
        let endpoint = handler_fn(|_| Ok(Response::new(Bytes::from_static(b"x"))));

        let response = Next::new(&chain, &endpoint)
            .handle(Request::new(Bytes::new()))
            .unwrap();

        // The innermost stage post-processes first.
        assert_eq!(response.body().as_ref(), b"xba");
    }

    #[test]
    fn test_short_circuit_skips_endpoint() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let reject: Arc<dyn Middleware> = Arc::new(middleware_fn(|_request, _next| {
            let mut response = Response::new(Bytes::new());
            *response.status_mut() = StatusCode::FORBIDDEN;
            Ok(response)
        }));
        let endpoint = handler_fn(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Response::new(Bytes::new()))
        });

        let chain = vec![reject];
        let response = Next::new(&chain, &endpoint)
            .handle(Request::new(Bytes::new()))
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_next_called_twice_reruns_downstream() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let retry: Arc<dyn Middleware> = Arc::new(middleware_fn(|request, next| {
            let first = next.handle(Request::new(request.body().clone()));
            match first {
                Ok(response) => Ok(response),
                Err(_) => next.handle(request),
            }
        }));
        let endpoint = handler_fn(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err("first attempt fails".into())
            } else {
                Ok(Response::new(Bytes::new()))
            }
        });

        let chain = vec![retry];
        let result = Next::new(&chain, &endpoint).handle(Request::new(Bytes::new()));

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_handler_error_is_wrapped() {
        let endpoint = handler_fn(|_| Err("boom".into()));
        let result = Next::new(&[], &endpoint).handle(Request::new(Bytes::new()));
        assert!(matches!(result, Err(Error::Handler(_))));
    }
}
