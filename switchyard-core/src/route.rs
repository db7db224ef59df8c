//! Compiled route patterns.
//!
//! A [`Route`] groups every endpoint registered under one route pattern,
//! keyed by method. The pattern is compiled once, anchored at both ends.

use crate::{
    error::{Error, Result},
    message::Attributes,
    record::Endpoint,
};
use http::Method;
use regex::Regex;
use std::collections::HashMap;

/// All endpoints registered under one route pattern.
#[derive(Clone)]
pub struct Route {
    route: String,
    pattern: Regex,
    endpoints: HashMap<Method, Endpoint>,
}

impl Route {
    /// Compile a route pattern into an empty route.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the pattern is not a valid regular
    /// expression.
    pub fn new(route: &str) -> Result<Self> {
        let pattern = Regex::new(&format!("^(?:{route})$")).map_err(|e| {
            Error::validation("endpoint", format!("route {route:?} does not compile: {e}"))
        })?;
        Ok(Self {
            route: route.to_owned(),
            pattern,
            endpoints: HashMap::new(),
        })
    }

    /// The route pattern as registered.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// The compiled, anchored pattern.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// The endpoint registered for `method`.
    pub fn get(&self, method: &Method) -> Option<&Endpoint> {
        self.endpoints.get(method)
    }

    /// Store `endpoint` under its method, returning the one it replaced.
    pub fn insert(&mut self, endpoint: Endpoint) -> Option<Endpoint> {
        self.endpoints.insert(endpoint.method().clone(), endpoint)
    }

    /// Remove the endpoint for `method`.
    pub fn remove(&mut self, method: &Method) -> Option<Endpoint> {
        self.endpoints.remove(method)
    }

    /// The methods with an endpoint on this route. Order is unspecified.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.endpoints.keys()
    }

    /// The endpoints on this route. Order is unspecified.
    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.values()
    }

    /// Number of endpoints on this route.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Whether this route has no endpoints left.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Match a whole path, returning its named captures.
    ///
    /// Groups that did not participate in the match are left out.
    pub fn captures(&self, path: &str) -> Option<Attributes> {
        let captures = self.pattern.captures(path)?;
        Some(
            self.pattern
                .capture_names()
                .flatten()
                .filter_map(|name| captures.name(name).map(|m| (name, m.as_str())))
                .collect(),
        )
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("route", &self.route)
            .field("methods", &self.endpoints.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{handler::handler_fn, message::Response};

    #[test]
    fn test_captures() {
        let route = Route::new(r"/users/(?P<user>\d+)(/(?P<tab>\w+))?").unwrap();

        let attrs = route.captures("/users/42").unwrap();
        assert_eq!(attrs.get("user"), Some("42"));
        assert!(!attrs.contains("tab"));

        let attrs = route.captures("/users/42/posts").unwrap();
        assert_eq!(attrs.get("tab"), Some("posts"));

        // Anchored at both ends.
        assert!(route.captures("/users/42x").is_none());
        assert!(route.captures("/api/users/42").is_none());
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        let route = Route::new("/a|/b").unwrap();
        assert!(route.captures("/a").is_some());
        assert!(route.captures("/b").is_some());
        assert!(route.captures("/a/extra").is_none());
        assert!(route.captures("/x/b").is_none());
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Route::new("/users/(").unwrap_err();
        assert!(matches!(err, Error::Validation { record: "endpoint", .. }));
    }

    #[test]
    fn test_insert_and_remove() {
        let mut route = Route::new("/test").unwrap();
        let handler = handler_fn(|_| Ok(Response::new(Default::default())));
        assert!(route.insert(Endpoint::new("hello", "/test", Method::GET, handler)).is_none());
        assert_eq!(route.get(&Method::GET).map(Endpoint::id), Some("hello"));
        assert_eq!(route.len(), 1);

        assert!(route.remove(&Method::POST).is_none());
        assert_eq!(route.remove(&Method::GET).map(|e| e.id().to_owned()), Some("hello".into()));
        assert!(route.is_empty());
    }
}
