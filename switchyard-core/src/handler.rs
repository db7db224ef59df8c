//! # Terminal Handlers
//!
//! A [`Handler`] turns a request into a response. Every endpoint carries its
//! own handler; it sits at the innermost point of the middleware chain.

use crate::{
    error::BoxError,
    message::{Request, Response},
};

/// The terminal request handler capability.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Handler`",
    label = "missing `Handler` implementation",
    note = "Implement `Handler::handle`, or wrap a closure with `handler_fn`."
)]
pub trait Handler: Send + Sync + 'static {
    /// Produce the response for a routed request.
    fn handle(&self, request: Request) -> Result<Response, BoxError>;
}

/// A [`Handler`] built from a closure. See [`handler_fn`].
#[derive(Clone, Copy)]
pub struct HandlerFn<F> {
    f: F,
}

/// Wrap a closure as a [`Handler`].
///
/// # Example
///
/// ```rust
/// use switchyard_core::{Response, handler_fn};
///
/// let hello = handler_fn(|_request| Ok(Response::new("Hello World".into())));
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(Request) -> Result<Response, BoxError> + Send + Sync + 'static,
{
    HandlerFn { f }
}

impl<F> Handler for HandlerFn<F>
where
    F: Fn(Request) -> Result<Response, BoxError> + Send + Sync + 'static,
{
    fn handle(&self, request: Request) -> Result<Response, BoxError> {
        (self.f)(request)
    }
}

impl<F> std::fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}
