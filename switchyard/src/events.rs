//! Event types fired by the dispatch core.
//!
//! Each constant documents the [`Payload`](switchyard_core::Payload) variant
//! its events carry.

/// Fired before routing. Carries `Payload::Request`; the request left in the
/// payload is the one that gets routed.
pub const SERVER_REQUEST: &str = "server/request";

/// Fired after the stack produced a response. Carries `Payload::Response`; the
/// response left in the payload is the one returned.
pub const SERVER_RESPONSE: &str = "server/response";

/// Fired before an endpoint is stored. Carries `Payload::Endpoint`.
pub const REGISTRY_ADD_ENDPOINT: &str = "registry/add-endpoint";

/// Fired after an endpoint was removed. Carries `Payload::Endpoint`.
pub const REGISTRY_REMOVE_ENDPOINT: &str = "registry/remove-endpoint";

/// Fired before a middleware entry is stored. Carries `Payload::Middleware`.
pub const REGISTRY_ADD_MIDDLEWARE: &str = "registry/add-middleware";

/// Fired after a middleware entry was removed. Carries `Payload::Middleware`.
pub const REGISTRY_REMOVE_MIDDLEWARE: &str = "registry/remove-middleware";

/// Fired before a listener is stored. Carries `Payload::Listener`.
pub const REGISTRY_ADD_LISTENER: &str = "registry/add-listener";

/// Fired after a listener was removed. Carries `Payload::Listener`.
pub const REGISTRY_REMOVE_LISTENER: &str = "registry/remove-listener";

/// Fired before a request is resolved, when registry events are enabled.
/// Carries `Payload::Routes`; the routes left in the payload are the ones that
/// request is resolved against.
pub const REGISTRY_GET_ENDPOINTS: &str = "registry/get-endpoints";

/// Fired before the stack for a resolved request is built, when registry
/// events are enabled. Carries `Payload::MiddlewareEntries`; the entries left
/// in the payload wrap that request and must stay in ascending priority.
pub const REGISTRY_GET_MIDDLEWARE_ENTRIES: &str = "registry/get-middleware-entries";
