#![allow(dead_code)]

use switchyard::{
    Endpoint, Request, RequestExt, Response, Server, handler_fn,
    http::{HeaderValue, Method, header::AUTHORIZATION},
};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Logging
// ============================================================================

/// Install a test-writer subscriber, filtered by `RUST_LOG`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Fixtures
// ============================================================================

/// A server with `hello` (GET /test) and `echo` (POST /test) endpoints served
/// by one handler that dispatches on the resolved endpoint id.
pub fn hello_server() -> Server {
    init_logging();
    let server = Server::new();
    let handler = std::sync::Arc::new(handler_fn(|request: Request| {
        let id = request.route_id().map(str::to_owned);
        match id.as_deref() {
            Some("hello") => Ok(Response::new("Hello World".into())),
            Some("echo") => Ok(Response::new(request.into_body())),
            other => Err(format!("unexpected endpoint {other:?}").into()),
        }
    }));

    server
        .add_endpoint(Endpoint::from_shared("hello", "/test", Method::GET, handler.clone()))
        .unwrap();
    server
        .add_endpoint(Endpoint::from_shared("echo", "/test", Method::POST, handler))
        .unwrap();
    server
}

/// Attach an authorization header.
pub fn authorize(mut request: Request) -> Request {
    request
        .headers_mut()
        .insert(AUTHORIZATION, HeaderValue::from_static("Bearer test"));
    request
}
