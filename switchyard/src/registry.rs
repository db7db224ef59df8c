//! The registry of endpoints, middleware and listeners.
//!
//! [`Registry`] is the single source of truth for everything registered with a
//! server. It owns the uniqueness and ordering rules:
//!
//! - an endpoint is unique per (route, method), and its id is unique overall
//! - a middleware entry is unique per id
//! - a listener is unique per (id, event type)
//! - middleware and listeners are ordered by priority, ties broken by
//!   registration order
//!
//! Each collection sits behind its own `RwLock`. Every call takes the lock
//! once and returns owned snapshots, so no lock is held while user code runs.

use parking_lot::RwLock;
use std::sync::Arc;
use switchyard_core::{Endpoint, Error, Listener, MiddlewareEntry, Result, Route, http::Method};
use tracing::{debug, warn};

/// Storage for endpoints, middleware and listeners.
#[derive(Default)]
pub struct Registry {
    /// Routes in registration order.
    routes: RwLock<Vec<Arc<Route>>>,
    /// Middleware in priority order.
    middleware: RwLock<Vec<MiddlewareEntry>>,
    /// Listeners grouped by event type; each group in priority order.
    listeners: RwLock<Vec<(String, Vec<Listener>)>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Endpoints
    // ========================================================================

    /// Register an endpoint.
    ///
    /// Returns `Ok(false)` without touching the registry when an endpoint with
    /// the same route and method already exists.
    pub fn add_endpoint(&self, endpoint: Endpoint) -> Result<bool> {
        endpoint.validate()?;

        let mut routes = self.routes.write();
        let position = routes.iter().position(|r| r.route() == endpoint.route());

        if let Some(i) = position {
            if routes[i].get(endpoint.method()).is_some() {
                warn!(
                    route = %endpoint.route(),
                    method = %endpoint.method(),
                    "Endpoint already registered"
                );
                return Ok(false);
            }
        }

        if let Some(existing) = routes
            .iter()
            .flat_map(|r| r.endpoints())
            .find(|e| e.id() == endpoint.id())
        {
            return Err(Error::validation(
                "endpoint",
                format!(
                    "id {:?} is already used by {} {}",
                    endpoint.id(),
                    existing.method(),
                    existing.route()
                ),
            ));
        }

        let id = endpoint.id().to_owned();
        let method = endpoint.method().clone();
        let route = match position {
            Some(i) => Arc::make_mut(&mut routes[i]),
            None => {
                routes.push(Arc::new(Route::new(endpoint.route())?));
                let last = routes.len() - 1;
                Arc::make_mut(&mut routes[last])
            }
        };
        route.insert(endpoint);
        debug!(%id, route = %route.route(), %method, "Registered endpoint");
        Ok(true)
    }

    /// Remove the endpoint for `route` and `method`, returning it.
    pub fn remove_endpoint(&self, route: &str, method: &Method) -> Option<Endpoint> {
        let mut routes = self.routes.write();
        let i = routes.iter().position(|r| r.route() == route)?;
        let removed = Arc::make_mut(&mut routes[i]).remove(method)?;
        if routes[i].is_empty() {
            routes.remove(i);
        }
        debug!(id = %removed.id(), %route, %method, "Removed endpoint");
        Some(removed)
    }

    /// Check whether an endpoint exists for `route` and `method`.
    pub fn has_endpoint(&self, route: &str, method: &Method) -> bool {
        self.routes
            .read()
            .iter()
            .any(|r| r.route() == route && r.get(method).is_some())
    }

    /// Get the endpoint for `route` and `method`.
    pub fn get_endpoint(&self, route: &str, method: &Method) -> Result<Endpoint> {
        self.routes
            .read()
            .iter()
            .find(|r| r.route() == route)
            .and_then(|r| r.get(method).cloned())
            .ok_or_else(|| Error::not_registered("endpoint", format!("{method} {route}")))
    }

    /// All routes in registration order.
    ///
    /// Look endpoints up by method with [`Route::get`]; the order of methods
    /// within a route carries no meaning.
    pub fn endpoints(&self) -> Vec<Arc<Route>> {
        self.routes.read().clone()
    }

    /// Total number of endpoints.
    pub fn endpoint_count(&self) -> usize {
        self.routes.read().iter().map(|r| r.len()).sum()
    }

    // ========================================================================
    // Middleware
    // ========================================================================

    /// Register a middleware entry.
    ///
    /// Returns `Ok(false)` without touching the registry when the id is taken.
    pub fn add_middleware(&self, entry: MiddlewareEntry) -> Result<bool> {
        entry.validate()?;

        let mut middleware = self.middleware.write();
        if middleware.iter().any(|m| m.id() == entry.id()) {
            warn!(id = %entry.id(), "Middleware already registered");
            return Ok(false);
        }

        // Insert after every entry of equal priority to keep the sort stable.
        let at = middleware.partition_point(|m| m.priority() <= entry.priority());
        debug!(id = %entry.id(), priority = entry.priority(), "Registered middleware");
        middleware.insert(at, entry);
        Ok(true)
    }

    /// Remove a middleware entry, returning it.
    pub fn remove_middleware(&self, id: &str) -> Option<MiddlewareEntry> {
        let mut middleware = self.middleware.write();
        let i = middleware.iter().position(|m| m.id() == id)?;
        debug!(%id, "Removed middleware");
        Some(middleware.remove(i))
    }

    /// Check whether a middleware entry exists.
    pub fn has_middleware(&self, id: &str) -> bool {
        self.middleware.read().iter().any(|m| m.id() == id)
    }

    /// Get a middleware entry.
    pub fn get_middleware(&self, id: &str) -> Result<MiddlewareEntry> {
        self.middleware
            .read()
            .iter()
            .find(|m| m.id() == id)
            .cloned()
            .ok_or_else(|| Error::not_registered("middleware", id))
    }

    /// All middleware entries by ascending priority, ties in registration order.
    ///
    /// This is the order the stack runs them in, outermost first.
    pub fn middleware_entries(&self) -> Vec<MiddlewareEntry> {
        self.middleware.read().clone()
    }

    /// Number of middleware entries.
    pub fn middleware_count(&self) -> usize {
        self.middleware.read().len()
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    /// Register a listener.
    ///
    /// Returns `Ok(false)` without touching the registry when a listener with
    /// the same id already observes the same event type.
    pub fn add_listener(&self, listener: Listener) -> Result<bool> {
        listener.validate()?;

        let mut groups = self.listeners.write();
        match groups.iter_mut().find(|(kind, _)| kind == listener.kind()) {
            Some((_, group)) => {
                if group.iter().any(|l| l.id() == listener.id()) {
                    warn!(id = %listener.id(), kind = %listener.kind(), "Listener already registered");
                    return Ok(false);
                }
                let at = group.partition_point(|l| l.priority() <= listener.priority());
                debug!(
                    id = %listener.id(),
                    kind = %listener.kind(),
                    priority = listener.priority(),
                    "Registered listener"
                );
                group.insert(at, listener);
            }
            None => {
                debug!(
                    id = %listener.id(),
                    kind = %listener.kind(),
                    priority = listener.priority(),
                    "Registered listener"
                );
                groups.push((listener.kind().to_owned(), vec![listener]));
            }
        }
        Ok(true)
    }

    /// Remove the listener `id` for event type `kind`, returning it.
    pub fn remove_listener(&self, id: &str, kind: &str) -> Option<Listener> {
        let mut groups = self.listeners.write();
        let g = groups.iter().position(|(k, _)| k == kind)?;
        let i = groups[g].1.iter().position(|l| l.id() == id)?;
        let removed = groups[g].1.remove(i);
        if groups[g].1.is_empty() {
            groups.remove(g);
        }
        debug!(%id, %kind, "Removed listener");
        Some(removed)
    }

    /// Check whether listener `id` observes event type `kind`.
    pub fn has_listener(&self, id: &str, kind: &str) -> bool {
        self.listeners
            .read()
            .iter()
            .any(|(k, group)| k == kind && group.iter().any(|l| l.id() == id))
    }

    /// Get the listener `id` for event type `kind`.
    pub fn get_listener(&self, id: &str, kind: &str) -> Result<Listener> {
        self.listeners
            .read()
            .iter()
            .find(|(k, _)| k == kind)
            .and_then(|(_, group)| group.iter().find(|l| l.id() == id).cloned())
            .ok_or_else(|| Error::not_registered("listener", format!("{id} ({kind})")))
    }

    /// Listeners for one event type by ascending priority, ties in
    /// registration order.
    pub fn type_listeners(&self, kind: &str) -> Vec<Listener> {
        self.listeners
            .read()
            .iter()
            .find(|(k, _)| k == kind)
            .map(|(_, group)| group.clone())
            .unwrap_or_default()
    }

    /// All listeners, grouped by event type.
    ///
    /// Types appear in the order their first listener was registered.
    pub fn listeners(&self) -> Vec<(String, Vec<Listener>)> {
        self.listeners.read().clone()
    }

    /// Number of listeners across all event types.
    pub fn listener_count(&self) -> usize {
        self.listeners.read().iter().map(|(_, group)| group.len()).sum()
    }

    /// Whether nothing at all is registered.
    pub fn is_empty(&self) -> bool {
        self.endpoint_count() == 0 && self.middleware_count() == 0 && self.listener_count() == 0
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("endpoints", &self.endpoint_count())
            .field("middleware", &self.middleware_count())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
