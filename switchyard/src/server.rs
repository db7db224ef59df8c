//! The composition root.
//!
//! A [`Server`] owns one [`Registry`], one [`Dispatcher`] and one [`Router`],
//! all built eagerly at construction. [`Server::handle`] is the single entry
//! point for requests:
//!
//! 1. `server/request` is dispatched with the request as payload
//! 2. the (possibly rewritten) request is routed and run through the stack
//! 3. `server/response` is dispatched with the routed request head and the
//!    response as payload
//! 4. the (possibly rewritten) response is returned
//!
//! With registry events enabled, step 2 also fires `registry/get-endpoints`
//! before resolving and `registry/get-middleware-entries` before building the
//! stack. Listeners may narrow or extend either snapshot for that one request;
//! the registry itself is untouched.
//!
//! Routing failures and handler errors are returned as-is; `server/response`
//! only fires for requests that produced a response. Turning an [`Error`] into
//! a response is the caller's job (see [`Error::status`]).
//!
//! The `add_*` and `remove_*` methods wrap the registry with the `registry/*`
//! events. Registering directly on [`Server::registry`] skips them.

use crate::{
    config::ServerConfig,
    dispatcher::Dispatcher,
    events::{
        REGISTRY_ADD_ENDPOINT, REGISTRY_ADD_LISTENER, REGISTRY_ADD_MIDDLEWARE,
        REGISTRY_GET_ENDPOINTS, REGISTRY_GET_MIDDLEWARE_ENTRIES, REGISTRY_REMOVE_ENDPOINT,
        REGISTRY_REMOVE_LISTENER, REGISTRY_REMOVE_MIDDLEWARE, SERVER_REQUEST, SERVER_RESPONSE,
    },
    registry::Registry,
    router::Router,
    stack::Stack,
};
use std::sync::Arc;
use switchyard_core::{
    BoxError, Endpoint, Error, Event, Exchange, Handler, Listener, MiddlewareEntry, Payload,
    Request, RequestExt, RequestHead, Response, Result, http::Method,
};
use tracing::{debug, info_span, warn};

/// Registry, event bus and router wired together.
#[derive(Debug)]
pub struct Server {
    registry: Arc<Registry>,
    dispatcher: Dispatcher,
    router: Router,
    config: ServerConfig,
}

impl Server {
    /// Create a server with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    /// Create a server with an empty registry and the given configuration.
    pub fn with_config(config: ServerConfig) -> Self {
        let registry = Arc::new(Registry::new());
        let dispatcher = Dispatcher::with_max_depth(Arc::clone(&registry), config.max_dispatch_depth);
        Self {
            router: Router::new(Arc::clone(&registry)),
            registry,
            dispatcher,
            config,
        }
    }

    /// Assemble a server from existing parts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] when `dispatcher` reads listeners from a
    /// different registry than `registry`.
    pub fn from_parts(
        registry: Arc<Registry>,
        dispatcher: Dispatcher,
        config: ServerConfig,
    ) -> Result<Self> {
        if !Arc::ptr_eq(&registry, dispatcher.registry()) {
            return Err(Error::internal(
                "the dispatcher must share the server's registry",
            ));
        }
        Ok(Self {
            router: Router::new(Arc::clone(&registry)),
            registry,
            dispatcher,
            config,
        })
    }

    /// The registry.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// The event bus.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// The router.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// The configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Dispatch an event on the server's bus.
    pub fn dispatch(&self, event: Event) -> Result<Event> {
        self.dispatcher.dispatch(event)
    }

    /// Whether a dispatch of `kind` is on the calling thread's stack.
    pub fn is_processing(&self, kind: &str) -> bool {
        self.dispatcher.is_processing(kind)
    }

    /// Handle one request.
    pub fn handle(&self, request: Request) -> Result<Response> {
        let span = info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path()
        );
        let _enter = span.enter();

        if !self.config.request_events {
            return self.route(request).map(|(_, response)| response);
        }

        let request = self.announce(SERVER_REQUEST, Payload::Request(request), |data| match data {
            Payload::Request(request) => Ok(request),
            other => Err(other),
        })?;

        let (request, response) = self.route(request)?;

        let exchange = self.announce(
            SERVER_RESPONSE,
            Payload::Response(Exchange { request, response }),
            |data| match data {
                Payload::Response(exchange) => Ok(exchange),
                other => Err(other),
            },
        )?;

        debug!(status = %exchange.response.status(), "Request handled");
        Ok(exchange.response)
    }

    /// Resolve a request and run it through a fresh stack.
    ///
    /// Returns the head of the request as the stack received it, attributes
    /// attached, next to the response.
    fn route(&self, request: Request) -> Result<(RequestHead, Response)> {
        let mut routes = self.registry.endpoints();
        if self.config.registry_events {
            routes = self.announce(REGISTRY_GET_ENDPOINTS, Payload::Routes(routes), |data| {
                match data {
                    Payload::Routes(routes) => Ok(routes),
                    other => Err(other),
                }
            })?;
        }

        let (endpoint, attributes) = Router::resolve_in(&routes, &request)?;
        debug!(endpoint = %endpoint.id(), "Resolved endpoint");
        let request = request.with_attributes(attributes);

        let mut entries = self.registry.middleware_entries();
        if self.config.registry_events {
            entries = self.announce(
                REGISTRY_GET_MIDDLEWARE_ENTRIES,
                Payload::MiddlewareEntries(entries),
                |data| match data {
                    Payload::MiddlewareEntries(entries) => Ok(entries),
                    other => Err(other),
                },
            )?;
        }

        let stack = Stack::new(&entries, Arc::clone(endpoint.handler()))?;
        let head = request.head();
        let response = stack.handle(request)?;
        Ok((head, response))
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register an endpoint, firing `registry/add-endpoint` before storing it.
    ///
    /// Listeners see the endpoint after validation and the duplicate check
    /// and may rewrite it; the rewritten endpoint is the one stored. The
    /// registry checks the rewritten endpoint again under its write lock, so a
    /// rewrite onto a (route, method) pair that is already taken returns
    /// `Ok(false)` and stores nothing, and a rewrite that breaks validation or
    /// reuses an id is an error.
    pub fn add_endpoint(&self, endpoint: Endpoint) -> Result<bool> {
        endpoint.validate()?;
        if self.registry.has_endpoint(endpoint.route(), endpoint.method()) {
            warn!(
                route = %endpoint.route(),
                method = %endpoint.method(),
                "Endpoint already registered"
            );
            return Ok(false);
        }

        let endpoint = if self.config.registry_events {
            self.announce(REGISTRY_ADD_ENDPOINT, Payload::Endpoint(endpoint), |data| match data {
                Payload::Endpoint(endpoint) => Ok(endpoint),
                other => Err(other),
            })?
        } else {
            endpoint
        };
        self.registry.add_endpoint(endpoint)
    }

    /// Remove an endpoint, firing `registry/remove-endpoint` after removal.
    pub fn remove_endpoint(&self, route: &str, method: &Method) -> Result<Option<Endpoint>> {
        let Some(removed) = self.registry.remove_endpoint(route, method) else {
            return Ok(None);
        };
        if !self.config.registry_events {
            return Ok(Some(removed));
        }
        self.announce(REGISTRY_REMOVE_ENDPOINT, Payload::Endpoint(removed), |data| match data {
            Payload::Endpoint(endpoint) => Ok(endpoint),
            other => Err(other),
        })
        .map(Some)
    }

    /// Register a middleware entry, firing `registry/add-middleware` before
    /// storing it.
    ///
    /// As with [`Server::add_endpoint`], a listener rewrite onto an id that is
    /// already taken returns `Ok(false)` and stores nothing.
    pub fn add_middleware(&self, entry: MiddlewareEntry) -> Result<bool> {
        entry.validate()?;
        if self.registry.has_middleware(entry.id()) {
            warn!(id = %entry.id(), "Middleware already registered");
            return Ok(false);
        }

        let entry = if self.config.registry_events {
            self.announce(REGISTRY_ADD_MIDDLEWARE, Payload::Middleware(entry), |data| match data {
                Payload::Middleware(entry) => Ok(entry),
                other => Err(other),
            })?
        } else {
            entry
        };
        self.registry.add_middleware(entry)
    }

    /// Remove a middleware entry, firing `registry/remove-middleware` after
    /// removal.
    pub fn remove_middleware(&self, id: &str) -> Result<Option<MiddlewareEntry>> {
        let Some(removed) = self.registry.remove_middleware(id) else {
            return Ok(None);
        };
        if !self.config.registry_events {
            return Ok(Some(removed));
        }
        self.announce(REGISTRY_REMOVE_MIDDLEWARE, Payload::Middleware(removed), |data| match data {
            Payload::Middleware(entry) => Ok(entry),
            other => Err(other),
        })
        .map(Some)
    }

    /// Register a listener, firing `registry/add-listener` before storing it.
    ///
    /// As with [`Server::add_endpoint`], a listener rewrite onto an (id, event
    /// type) pair that is already taken returns `Ok(false)` and stores nothing.
    pub fn add_listener(&self, listener: Listener) -> Result<bool> {
        listener.validate()?;
        if self.registry.has_listener(listener.id(), listener.kind()) {
            warn!(id = %listener.id(), kind = %listener.kind(), "Listener already registered");
            return Ok(false);
        }

        let listener = if self.config.registry_events {
            self.announce(REGISTRY_ADD_LISTENER, Payload::Listener(listener), |data| match data {
                Payload::Listener(listener) => Ok(listener),
                other => Err(other),
            })?
        } else {
            listener
        };
        self.registry.add_listener(listener)
    }

    /// Remove a listener, firing `registry/remove-listener` after removal.
    pub fn remove_listener(&self, id: &str, kind: &str) -> Result<Option<Listener>> {
        let Some(removed) = self.registry.remove_listener(id, kind) else {
            return Ok(None);
        };
        if !self.config.registry_events {
            return Ok(Some(removed));
        }
        self.announce(REGISTRY_REMOVE_LISTENER, Payload::Listener(removed), |data| match data {
            Payload::Listener(listener) => Ok(listener),
            other => Err(other),
        })
        .map(Some)
    }

    /// Dispatch `data` as a `kind` event and take the payload back out.
    ///
    /// `extract` hands back the payload unchanged when listeners left the
    /// wrong variant behind.
    fn announce<T>(
        &self,
        kind: &str,
        data: Payload,
        extract: impl FnOnce(Payload) -> std::result::Result<T, Payload>,
    ) -> Result<T> {
        let event = self.dispatcher.dispatch(Event::new(kind, data))?;
        extract(event.into_data()).map_err(|other| {
            Error::internal(format!(
                "a {kind:?} listener replaced the payload with {}",
                other.variant()
            ))
        })
    }
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for Server {
    fn handle(&self, request: Request) -> Result<Response, BoxError> {
        Server::handle(self, request).map_err(Into::into)
    }
}
