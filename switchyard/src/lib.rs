//! # switchyard - Embeddable Micro-Dispatch Core
//!
//! `switchyard` routes a request to one registered endpoint, runs it through an
//! ordered chain of middleware, and surrounds both with a priority-ordered
//! event bus that any collaborator can observe or rewrite. It performs no I/O:
//! requests and responses are `http` types handed in and out by the host.
//!
//! ## Quick Start
//!
//! ```rust
//! use switchyard::prelude::*;
//! use switchyard::http::{Method, StatusCode};
//!
//! let server = Server::new();
//! server.add_endpoint(Endpoint::new(
//!     "hello",
//!     "/hello/(?P<name>[a-z]+)",
//!     Method::GET,
//!     handler_fn(|request| {
//!         let name = request.attribute("name").unwrap_or("stranger");
//!         Ok(Response::new(format!("Hello {name}").into()))
//!     }),
//! ))?;
//!
//! let request = switchyard::http::Request::get("/hello/world").body(Bytes::new())?;
//! let response = server.handle(request)?;
//! assert_eq!(response.status(), StatusCode::OK);
//! assert_eq!(response.body().as_ref(), b"Hello world");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Layout
//!
//! - [`Registry`] stores endpoints, middleware and listeners
//! - [`Dispatcher`] delivers [`Event`]s to listeners by priority
//! - [`Router`] resolves a request and runs it through a [`Stack`]
//! - [`Server`] ties them together and fires the [`events`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub mod config;
pub mod dispatcher;
pub mod events;
pub mod registry;
pub mod router;
pub mod server;
pub mod stack;

pub use config::ServerConfig;
pub use dispatcher::Dispatcher;
pub use registry::Registry;
pub use router::Router;
pub use server::Server;
pub use stack::Stack;

pub use switchyard_core::{
    // Capabilities
    Attributes,
    BoxError,
    Bytes,
    Callback,
    CallbackFn,
    // Records
    DEFAULT_PRIORITY,
    Endpoint,
    // Errors
    Error,
    // Events
    Event,
    Exchange,
    Handler,
    HandlerFn,
    // Messages
    ID_ATTRIBUTE,
    Listener,
    MAX_PRIORITY,
    METHODS,
    MIN_PRIORITY,
    Middleware,
    MiddlewareEntry,
    MiddlewareFn,
    Next,
    Payload,
    ROUTE_ATTRIBUTE,
    Request,
    RequestExt,
    RequestHead,
    Response,
    Result,
    Route,
    callback_fn,
    handler_fn,
    http,
    middleware_fn,
};

/// Standard middleware.
pub mod middleware {
    #![allow(clippy::wildcard_imports)]
    pub use switchyard_std::middleware::*;
}

/// Standard listener callbacks.
pub mod callbacks {
    #![allow(clippy::wildcard_imports)]
    pub use switchyard_std::callbacks::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use switchyard_std::testing::*;
}

/// Prelude module - common imports for Switchyard.
///
/// # Usage
///
/// ```rust
/// use switchyard::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Bytes, Callback, Dispatcher, Endpoint, Error, Event, Handler, Listener, Middleware,
        MiddlewareEntry, Next, Payload, Registry, Request, RequestExt, Response, Result, Server,
        ServerConfig, callback_fn, handler_fn, middleware_fn,
    };
}
