//! Registration records.
//!
//! [`Endpoint`], [`MiddlewareEntry`] and [`Listener`] describe what gets
//! registered. They are built with constructors plus builder-style setters and
//! checked with `validate` when handed to the registry; after that they are
//! only read.

use crate::{
    callback::Callback,
    error::{Error, Result},
    handler::Handler,
    middleware::Middleware,
};
use http::Method;
use std::sync::Arc;

/// Lowest (earliest-running) priority.
pub const MIN_PRIORITY: i32 = 1;

/// Priority given to middleware and listeners that do not set one.
pub const DEFAULT_PRIORITY: i32 = 50;

/// Highest (latest-running) priority.
pub const MAX_PRIORITY: i32 = 99;

/// HTTP methods an endpoint may be registered for.
pub const METHODS: [Method; 9] = [
    Method::GET,
    Method::HEAD,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::CONNECT,
    Method::OPTIONS,
    Method::TRACE,
];

fn check_priority(record: &'static str, priority: i32) -> Result<()> {
    if (MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
        Ok(())
    } else {
        Err(Error::validation(
            record,
            format!("priority {priority} is outside {MIN_PRIORITY}..={MAX_PRIORITY}"),
        ))
    }
}

fn check_present(record: &'static str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::validation(record, format!("`{field}` is required")))
    } else {
        Ok(())
    }
}

// ============================================================================
// Endpoint
// ============================================================================

/// A (route pattern, method) pair bound to a handler.
///
/// The route is a regular expression matched against the whole request path;
/// named capture groups become request attributes.
#[derive(Clone)]
pub struct Endpoint {
    id: String,
    route: String,
    method: Method,
    handler: Arc<dyn Handler>,
    name: Option<String>,
    desc: Option<String>,
}

impl Endpoint {
    /// Create an endpoint.
    pub fn new(
        id: impl Into<String>,
        route: impl Into<String>,
        method: Method,
        handler: impl Handler,
    ) -> Self {
        Self::from_shared(id, route, method, Arc::new(handler))
    }

    /// Create an endpoint around an already shared handler.
    pub fn from_shared(
        id: impl Into<String>,
        route: impl Into<String>,
        method: Method,
        handler: Arc<dyn Handler>,
    ) -> Self {
        Self {
            id: id.into(),
            route: route.into(),
            method,
            handler,
            name: None,
            desc: None,
        }
    }

    /// Set a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set a description.
    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    /// Replace the route pattern.
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = route.into();
        self
    }

    /// Replace the handler.
    pub fn with_handler(mut self, handler: impl Handler) -> Self {
        self.handler = Arc::new(handler);
        self
    }

    /// Check required fields and the method range.
    ///
    /// Whether the route compiles is checked by the registry, which owns the
    /// compiled pattern.
    pub fn validate(&self) -> Result<()> {
        check_present("endpoint", "id", &self.id)?;
        check_present("endpoint", "route", &self.route)?;
        if !METHODS.contains(&self.method) {
            return Err(Error::validation(
                "endpoint",
                format!("unsupported method {}", self.method),
            ));
        }
        Ok(())
    }

    /// The endpoint id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The route pattern.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The terminal handler.
    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    /// The display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The description, if any.
    pub fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("id", &self.id)
            .field("route", &self.route)
            .field("method", &self.method)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// MiddlewareEntry
// ============================================================================

/// A named, prioritized pipeline stage.
#[derive(Clone)]
pub struct MiddlewareEntry {
    id: String,
    priority: i32,
    instance: Arc<dyn Middleware>,
    name: Option<String>,
    desc: Option<String>,
}

impl MiddlewareEntry {
    /// Create an entry with the default priority.
    pub fn new(id: impl Into<String>, instance: impl Middleware) -> Self {
        Self::from_shared(id, Arc::new(instance))
    }

    /// Create an entry around an already shared middleware.
    pub fn from_shared(id: impl Into<String>, instance: Arc<dyn Middleware>) -> Self {
        Self {
            id: id.into(),
            priority: DEFAULT_PRIORITY,
            instance,
            name: None,
            desc: None,
        }
    }

    /// Set the priority (lower runs earlier, further out).
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set a description.
    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    /// Check required fields and the priority range.
    pub fn validate(&self) -> Result<()> {
        check_present("middleware", "id", &self.id)?;
        check_priority("middleware", self.priority)
    }

    /// The entry id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// The middleware instance.
    pub fn instance(&self) -> &Arc<dyn Middleware> {
        &self.instance
    }

    /// The display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The description, if any.
    pub fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }
}

impl std::fmt::Debug for MiddlewareEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareEntry")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Listener
// ============================================================================

/// An observer bound to one event type.
#[derive(Clone)]
pub struct Listener {
    id: String,
    kind: String,
    priority: i32,
    callback: Arc<dyn Callback>,
    name: Option<String>,
    desc: Option<String>,
}

impl Listener {
    /// Create a listener for events of type `kind`, with the default priority.
    pub fn new(id: impl Into<String>, kind: impl Into<String>, callback: impl Callback) -> Self {
        Self::from_shared(id, kind, Arc::new(callback))
    }

    /// Create a listener around an already shared callback.
    pub fn from_shared(
        id: impl Into<String>,
        kind: impl Into<String>,
        callback: Arc<dyn Callback>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            priority: DEFAULT_PRIORITY,
            callback,
            name: None,
            desc: None,
        }
    }

    /// Set the priority (lower runs earlier).
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set a description.
    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    /// Check required fields and the priority range.
    pub fn validate(&self) -> Result<()> {
        check_present("listener", "id", &self.id)?;
        check_present("listener", "type", &self.kind)?;
        check_priority("listener", self.priority)
    }

    /// The listener id, unique per event type.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The event type this listener observes.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// The callback.
    pub fn callback(&self) -> &Arc<dyn Callback> {
        &self.callback
    }

    /// The display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The description, if any.
    pub fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("priority", &self.priority)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
