//! HTTP message types and request attributes.
//!
//! Requests and responses are plain [`http`] messages with [`Bytes`] bodies.
//! Routing metadata travels with the request as [`Attributes`], stored in the
//! request extensions and reached through [`RequestExt`].

use bytes::Bytes;
use std::collections::HashMap;

/// An inbound request.
pub type Request = http::Request<Bytes>;

/// An outbound response.
pub type Response = http::Response<Bytes>;

/// A request without its body: method, URI, version, headers and extensions.
pub type RequestHead = http::Request<()>;

/// Attribute key holding the resolved endpoint's id.
pub const ID_ATTRIBUTE: &str = "_id";

/// Attribute key holding the resolved endpoint's route pattern.
pub const ROUTE_ATTRIBUTE: &str = "_route";

/// A flat, string-keyed attribute set attached to a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(HashMap<String, String>);

impl Attributes {
    /// Create an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an attribute value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Set an attribute, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Check whether an attribute is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all key/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Attribute access for requests.
///
/// `with_attribute` consumes the request and hands back the augmented one, so
/// the caller never keeps a handle to a request that changed underneath it.
pub trait RequestExt: Sized {
    /// Return the request carrying one more attribute.
    fn with_attribute(self, key: impl Into<String>, value: impl Into<String>) -> Self;

    /// Return the request carrying every attribute of `attributes`.
    fn with_attributes(self, attributes: Attributes) -> Self {
        attributes
            .0
            .into_iter()
            .fold(self, |request, (key, value)| request.with_attribute(key, value))
    }

    /// All attributes attached so far.
    fn attributes(&self) -> Option<&Attributes>;

    /// A single attribute.
    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes().and_then(|attrs| attrs.get(key))
    }

    /// The id of the endpoint this request was routed to.
    fn route_id(&self) -> Option<&str> {
        self.attribute(ID_ATTRIBUTE)
    }

    /// The route pattern this request was matched against.
    fn route(&self) -> Option<&str> {
        self.attribute(ROUTE_ATTRIBUTE)
    }

    /// Copy everything but the body, attributes included.
    fn head(&self) -> RequestHead;
}

impl<B> RequestExt for http::Request<B> {
    fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match self.extensions_mut().get_mut::<Attributes>() {
            Some(attrs) => {
                attrs.insert(key, value);
            }
            None => {
                let mut attrs = Attributes::new();
                attrs.insert(key, value);
                self.extensions_mut().insert(attrs);
            }
        }
        self
    }

    fn attributes(&self) -> Option<&Attributes> {
        self.extensions().get::<Attributes>()
    }

    fn head(&self) -> RequestHead {
        let mut head = http::Request::new(());
        *head.method_mut() = self.method().clone();
        *head.uri_mut() = self.uri().clone();
        *head.version_mut() = self.version();
        *head.headers_mut() = self.headers().clone();
        *head.extensions_mut() = self.extensions().clone();
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_attribute() {
        let request = Request::new(Bytes::new())
            .with_attribute("user", "42")
            .with_attribute(ID_ATTRIBUTE, "profile");

        assert_eq!(request.attribute("user"), Some("42"));
        assert_eq!(request.route_id(), Some("profile"));
        assert_eq!(request.route(), None);
        assert_eq!(request.attributes().map(Attributes::len), Some(2));
    }

    #[test]
    fn test_no_attributes() {
        let request = Request::new(Bytes::new());
        assert!(request.attributes().is_none());
        assert_eq!(request.attribute("user"), None);
    }

    #[test]
    fn test_with_attributes_overwrites() {
        let attrs: Attributes = [("a", "1"), ("b", "2")].into_iter().collect();
        let request = Request::new(Bytes::new())
            .with_attribute("a", "0")
            .with_attributes(attrs);

        assert_eq!(request.attribute("a"), Some("1"));
        assert_eq!(request.attribute("b"), Some("2"));
    }

    #[test]
    fn test_head_keeps_headers_and_attributes() {
        let request = http::Request::post("/users/42?tab=posts")
            .header("x-user", "ada")
            .body(Bytes::from_static(b"payload"))
            .unwrap()
            .with_attribute(ID_ATTRIBUTE, "profile");

        let head = request.head();
        assert_eq!(head.method(), http::Method::POST);
        assert_eq!(head.uri().path(), "/users/42");
        assert_eq!(head.uri().query(), Some("tab=posts"));
        assert_eq!(head.headers()["x-user"], "ada");
        assert_eq!(head.route_id(), Some("profile"));

        // The original is untouched.
        assert_eq!(request.body().as_ref(), b"payload");
        assert_eq!(request.route_id(), Some("profile"));
    }
}
