//! # Events
//!
//! An [`Event`] is a mutable envelope passed through every listener of its
//! type, in priority order, until a listener stops propagation or the
//! listeners run out.
//!
//! The payload is a tagged union rather than an untyped bag. Each event type
//! fired by the core carries a documented variant:
//!
//! | Event type                      | Payload                       |
//! |---------------------------------|-------------------------------|
//! | `server/request`                | [`Payload::Request`]          |
//! | `server/response`               | [`Payload::Response`]         |
//! | `registry/add-endpoint`, `registry/remove-endpoint`     | [`Payload::Endpoint`]   |
//! | `registry/add-middleware`, `registry/remove-middleware` | [`Payload::Middleware`] |
//! | `registry/add-listener`, `registry/remove-listener`     | [`Payload::Listener`]   |
//! | `registry/get-endpoints`        | [`Payload::Routes`]           |
//! | `registry/get-middleware-entries` | [`Payload::MiddlewareEntries`] |
//!
//! Host-defined event types may use [`Payload::Custom`].

use crate::{
    message::{Request, RequestHead, Response},
    record::{Endpoint, Listener, MiddlewareEntry},
    route::Route,
};
use http::Method;
use std::{any::Any, sync::Arc};

/// A handled request and its response, as seen by `server/response` listeners.
///
/// The request is the routed one: its attributes hold the path captures and
/// the resolved endpoint. Only its body is gone, consumed by the handler.
#[derive(Debug)]
pub struct Exchange {
    /// The request that produced the response.
    pub request: RequestHead,
    /// The response, which listeners may rewrite.
    pub response: Response,
}

impl Exchange {
    /// Method of the request that produced the response.
    pub fn method(&self) -> &Method {
        self.request.method()
    }

    /// Path of the request that produced the response.
    pub fn path(&self) -> &str {
        self.request.uri().path()
    }
}

/// The data carried by an [`Event`].
#[derive(Default)]
pub enum Payload {
    /// No data.
    #[default]
    Empty,
    /// An in-flight request.
    Request(Request),
    /// A produced response.
    Response(Exchange),
    /// An endpoint being registered or removed.
    Endpoint(Endpoint),
    /// A middleware entry being registered or removed.
    Middleware(MiddlewareEntry),
    /// A listener being registered or removed.
    Listener(Listener),
    /// The routes a request is about to be resolved against.
    Routes(Vec<Arc<Route>>),
    /// The middleware a request is about to run through, outermost first.
    MiddlewareEntries(Vec<MiddlewareEntry>),
    /// Host-defined data.
    Custom(Box<dyn Any + Send + Sync>),
}

impl Payload {
    /// The variant name, for diagnostics.
    pub fn variant(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Request(_) => "Request",
            Self::Response(_) => "Response",
            Self::Endpoint(_) => "Endpoint",
            Self::Middleware(_) => "Middleware",
            Self::Listener(_) => "Listener",
            Self::Routes(_) => "Routes",
            Self::MiddlewareEntries(_) => "MiddlewareEntries",
            Self::Custom(_) => "Custom",
        }
    }

    /// Wrap an arbitrary value as a custom payload.
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Self::Custom(Box::new(value))
    }
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Request(r) => f.debug_tuple("Request").field(r).finish(),
            Self::Response(x) => f.debug_tuple("Response").field(x).finish(),
            Self::Endpoint(e) => f.debug_tuple("Endpoint").field(e).finish(),
            Self::Middleware(m) => f.debug_tuple("Middleware").field(m).finish(),
            Self::Listener(l) => f.debug_tuple("Listener").field(l).finish(),
            Self::Routes(r) => f.debug_tuple("Routes").field(r).finish(),
            Self::MiddlewareEntries(m) => f.debug_tuple("MiddlewareEntries").field(m).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A mutable message passed through the event bus.
#[derive(Debug)]
pub struct Event {
    kind: String,
    /// The payload. Listeners may mutate it in place or replace it.
    pub data: Payload,
    stopped: bool,
}

impl Event {
    /// Create an event of the given type.
    pub fn new(kind: impl Into<String>, data: Payload) -> Self {
        Self {
            kind: kind.into(),
            data,
            stopped: false,
        }
    }

    /// Create an event without data.
    pub fn empty(kind: impl Into<String>) -> Self {
        Self::new(kind, Payload::Empty)
    }

    /// The event type tag.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Prevent any further listener from seeing this event.
    pub fn stop_propagation(&mut self) {
        self.stopped = true;
    }

    /// Whether a listener has stopped propagation.
    pub fn is_propagation_stopped(&self) -> bool {
        self.stopped
    }

    /// The in-flight request, for `server/request` events.
    pub fn request(&self) -> Option<&Request> {
        match &self.data {
            Payload::Request(request) => Some(request),
            _ => None,
        }
    }

    /// Mutable access to the in-flight request.
    pub fn request_mut(&mut self) -> Option<&mut Request> {
        match &mut self.data {
            Payload::Request(request) => Some(request),
            _ => None,
        }
    }

    /// The produced response, for `server/response` events.
    pub fn response(&self) -> Option<&Response> {
        match &self.data {
            Payload::Response(exchange) => Some(&exchange.response),
            _ => None,
        }
    }

    /// Mutable access to the produced response.
    pub fn response_mut(&mut self) -> Option<&mut Response> {
        match &mut self.data {
            Payload::Response(exchange) => Some(&mut exchange.response),
            _ => None,
        }
    }

    /// Borrow a custom payload as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match &self.data {
            Payload::Custom(value) => value.downcast_ref(),
            _ => None,
        }
    }

    /// Mutably borrow a custom payload as `T`.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        match &mut self.data {
            Payload::Custom(value) => value.downcast_mut(),
            _ => None,
        }
    }

    /// Take the payload out, leaving [`Payload::Empty`].
    pub fn take(&mut self) -> Payload {
        std::mem::take(&mut self.data)
    }

    /// Consume the event, returning its payload.
    pub fn into_data(self) -> Payload {
        self.data
    }
}
