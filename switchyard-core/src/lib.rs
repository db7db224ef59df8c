//! # switchyard-core
//!
//! Core capabilities and records for the Switchyard dispatch core.
//!
//! This crate has minimal dependencies and is meant to be imported by code that
//! provides endpoints, middleware or listeners without needing the registry,
//! router or event bus themselves.
//!
//! # Capabilities
//!
//! - [`Handler`] - the terminal step: `handle(request) -> response`
//! - [`Middleware`] - a pipeline stage: `process(request, next) -> response`
//! - [`Callback`] - a listener body: `invoke(&mut event)`
//!
//! Closures become capabilities through [`handler_fn`], [`middleware_fn`] and
//! [`callback_fn`].
//!
//! # Records
//!
//! - [`Endpoint`] - a (route, method) pair bound to a handler
//! - [`MiddlewareEntry`] - a prioritized middleware
//! - [`Listener`] - a prioritized callback for one event type
//!
//! Endpoints are grouped by route pattern into a compiled [`Route`].
//!
//! # Events
//!
//! [`Event`] is the mutable envelope passed through the bus; its [`Payload`] is
//! a tagged union with one variant per kind of data the core puts on the bus.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod callback;
mod error;
mod event;
mod handler;
mod message;
mod middleware;
mod record;
mod route;

// Re-exports
pub use callback::{Callback, CallbackFn, callback_fn};
pub use error::{BoxError, Error, Result};
pub use event::{Event, Exchange, Payload};
pub use handler::{Handler, HandlerFn, handler_fn};
pub use message::{
    Attributes, ID_ATTRIBUTE, ROUTE_ATTRIBUTE, Request, RequestExt, RequestHead, Response,
};
pub use middleware::{Middleware, MiddlewareFn, Next, middleware_fn};
pub use record::{
    DEFAULT_PRIORITY, Endpoint, Listener, MAX_PRIORITY, METHODS, MIN_PRIORITY, MiddlewareEntry,
};
pub use route::Route;

pub use bytes::Bytes;
pub use http;
