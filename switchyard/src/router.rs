//! Route resolution.
//!
//! [`Router`] maps a request to exactly one endpoint:
//!
//! 1. Routes are tried in registration order; the first whose pattern matches
//!    the whole path wins, even if a later route would also match.
//! 2. A matching route without an endpoint for the request method is
//!    [`Error::MethodNotAllowed`]. Later routes are not consulted.
//! 3. No matching route at all is [`Error::NotFound`].
//!
//! Named captures become request attributes, alongside the endpoint's id under
//! [`ID_ATTRIBUTE`] and its route under [`ROUTE_ATTRIBUTE`]. The reserved keys
//! win over a capture of the same name.

use crate::{registry::Registry, stack::Stack};
use std::sync::Arc;
use switchyard_core::{
    Attributes, BoxError, Endpoint, Error, Handler, ID_ATTRIBUTE, ROUTE_ATTRIBUTE, Request,
    RequestExt, Response, Result, Route,
};
use tracing::{debug, warn};

/// Resolves requests against a [`Registry`] and runs them through a [`Stack`].
#[derive(Debug, Clone)]
pub struct Router {
    registry: Arc<Registry>,
}

impl Router {
    /// Create a router over `registry`.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// The registry routes are read from.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Find the endpoint for a request, with the attributes it should carry.
    pub fn resolve(&self, request: &Request) -> Result<(Endpoint, Attributes)> {
        Self::resolve_in(&self.registry.endpoints(), request)
    }

    /// Find the endpoint for a request among `routes`, tried in order.
    pub fn resolve_in(routes: &[Arc<Route>], request: &Request) -> Result<(Endpoint, Attributes)> {
        let path = request.uri().path();
        let method = request.method();

        for route in routes {
            let Some(mut attributes) = route.captures(path) else {
                continue;
            };
            let Some(endpoint) = route.get(method) else {
                warn!(%method, %path, route = %route.route(), "Method not allowed");
                return Err(Error::MethodNotAllowed {
                    method: method.clone(),
                    path: path.to_owned(),
                });
            };
            attributes.insert(ID_ATTRIBUTE, endpoint.id());
            attributes.insert(ROUTE_ATTRIBUTE, endpoint.route());
            return Ok((endpoint.clone(), attributes));
        }

        warn!(%method, %path, "No route matches");
        Err(Error::NotFound {
            path: path.to_owned(),
        })
    }

    /// Compose the registered middleware around `endpoint`'s handler.
    pub fn build_stack(&self, endpoint: &Endpoint) -> Result<Stack> {
        Stack::new(
            &self.registry.middleware_entries(),
            Arc::clone(endpoint.handler()),
        )
    }

    /// Route a request and run it through a fresh stack.
    pub fn handle(&self, request: Request) -> Result<Response> {
        let (endpoint, attributes) = self.resolve(&request)?;
        debug!(endpoint = %endpoint.id(), "Resolved endpoint");

        let stack = self.build_stack(&endpoint)?;
        stack.handle(request.with_attributes(attributes))
    }
}

impl Handler for Router {
    fn handle(&self, request: Request) -> Result<Response, BoxError> {
        Router::handle(self, request).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchyard_core::{
        MiddlewareEntry, handler_fn,
        http::{Method, StatusCode},
    };
    use switchyard_std::testing::{TextHandler, body_text, request};

    fn router() -> Router {
        Router::new(Arc::new(Registry::new()))
    }

    fn add(router: &Router, id: &str, route: &str, method: Method) {
        router
            .registry()
            .add_endpoint(Endpoint::new(id, route, method, TextHandler::new(id.to_owned())))
            .unwrap();
    }

    #[test]
    fn test_first_registered_route_wins() {
        let router = router();
        add(&router, "specific", "/x", Method::GET);
        add(&router, "catch-all", "/.*", Method::GET);

        let response = router.handle(request("GET", "/x", "")).unwrap();
        assert_eq!(body_text(&response), "specific");

        let response = router.handle(request("GET", "/y", "")).unwrap();
        assert_eq!(body_text(&response), "catch-all");
    }

    #[test]
    fn test_not_found_and_method_not_allowed() {
        let router = router();
        add(&router, "hello", "/test", Method::GET);

        let err = router.handle(request("GET", "/missing", "")).unwrap_err();
        assert!(matches!(&err, Error::NotFound { path } if path == "/missing"));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = router.handle(request("DELETE", "/test", "")).unwrap_err();
        assert!(matches!(&err, Error::MethodNotAllowed { method, .. } if *method == Method::DELETE));
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_method_not_allowed_does_not_fall_through() {
        let router = router();
        add(&router, "get-only", "/x", Method::GET);
        add(&router, "post-anything", "/.*", Method::POST);

        let err = router.handle(request("POST", "/x", "")).unwrap_err();
        assert!(matches!(err, Error::MethodNotAllowed { .. }));
    }

    #[test]
    fn test_resolve_attributes() {
        let router = router();
        add(&router, "profile", r"/users/(?P<user>\d+)", Method::GET);

        let (endpoint, attributes) = router.resolve(&request("GET", "/users/7", "")).unwrap();
        assert_eq!(endpoint.id(), "profile");
        assert_eq!(attributes.get("user"), Some("7"));
        assert_eq!(attributes.get(ID_ATTRIBUTE), Some("profile"));
        assert_eq!(attributes.get(ROUTE_ATTRIBUTE), Some(r"/users/(?P<user>\d+)"));
        assert_eq!(attributes.len(), 3);
    }

    #[test]
    fn test_resolve_in_a_filtered_snapshot() {
        let router = router();
        add(&router, "specific", "/x", Method::GET);
        add(&router, "catch-all", "/.*", Method::GET);

        let routes: Vec<_> = router
            .registry()
            .endpoints()
            .into_iter()
            .filter(|route| route.route() != "/x")
            .collect();
        let (endpoint, _) = Router::resolve_in(&routes, &request("GET", "/x", "")).unwrap();
        assert_eq!(endpoint.id(), "catch-all");

        let err = Router::resolve_in(&[], &request("GET", "/x", "")).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_handler_sees_attributes() {
        let router = router();
        router
            .registry()
            .add_endpoint(Endpoint::new(
                "profile",
                r"/users/(?P<user>\d+)",
                Method::GET,
                handler_fn(|request| {
                    let body = format!(
                        "{}:{}",
                        request.route_id().unwrap_or_default(),
                        request.attribute("user").unwrap_or_default()
                    );
                    Ok(Response::new(body.into()))
                }),
            ))
            .unwrap();

        let response = router.handle(request("GET", "/users/42", "")).unwrap();
        assert_eq!(body_text(&response), "profile:42");
    }

    #[test]
    fn test_middleware_wraps_every_endpoint() {
        let router = router();
        add(&router, "a", "/a", Method::GET);
        add(&router, "b", "/b", Method::GET);
        router
            .registry()
            .add_middleware(MiddlewareEntry::new(
                "deny-b",
                switchyard_core::middleware_fn(|request, next| {
                    if request.route_id() == Some("b") {
                        let mut response = Response::new(Default::default());
                        *response.status_mut() = StatusCode::FORBIDDEN;
                        return Ok(response);
                    }
                    next.handle(request)
                }),
            ))
            .unwrap();

        assert_eq!(router.handle(request("GET", "/a", "")).unwrap().status(), StatusCode::OK);
        assert_eq!(
            router.handle(request("GET", "/b", "")).unwrap().status(),
            StatusCode::FORBIDDEN
        );
    }
}
