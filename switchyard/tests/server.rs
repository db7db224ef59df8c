use std::sync::Arc;
use switchyard::{
    Endpoint, Error, Listener, MiddlewareEntry, Server, callback_fn,
    events::SERVER_REQUEST,
    http::{HeaderValue, Method, StatusCode, header::AUTHORIZATION},
    middleware::{LoggingMiddleware, RequireHeader},
    testing::{EchoHandler, TextHandler, TraceLog, body_text, request},
};

mod common;
use common::{authorize, hello_server, init_logging};

#[test]
fn test_hello_world_routing() {
    let server = hello_server();

    let response = server.handle(request("GET", "/test", "")).unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(&response), "Hello World");

    let response = server.handle(request("POST", "/test", "Greetings")).unwrap();
    assert_eq!(body_text(&response), "Greetings");

    let err = server.handle(request("GET", "/missing", "")).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert_eq!(err.status(), StatusCode::NOT_FOUND);

    let err = server.handle(request("DELETE", "/test", "")).unwrap_err();
    assert!(matches!(err, Error::MethodNotAllowed { .. }));
    assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[test]
fn test_middleware_guards_endpoint() {
    let server = hello_server();
    server
        .add_middleware(
            MiddlewareEntry::new("auth", RequireHeader::new(AUTHORIZATION)).with_priority(20),
        )
        .unwrap();

    let response = server.handle(request("POST", "/test", "Hello World")).unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = server
        .handle(authorize(request("POST", "/test", "Hello World")))
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(&response), "Hello World");
}

#[test]
fn test_request_listener_authorizes_request() {
    let server = hello_server();
    server
        .add_middleware(
            MiddlewareEntry::new("auth", RequireHeader::new(AUTHORIZATION)).with_priority(20),
        )
        .unwrap();
    server
        .add_listener(Listener::new(
            "authorize",
            SERVER_REQUEST,
            callback_fn(|event| {
                if let Some(request) = event.request_mut() {
                    request
                        .headers_mut()
                        .insert(AUTHORIZATION, HeaderValue::from_static("Bearer listener"));
                }
                Ok(())
            }),
        ))
        .unwrap();

    let response = server.handle(request("POST", "/test", "Hello World")).unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(&response), "Hello World");
}

#[test]
fn test_request_listener_can_reroute() {
    let server = hello_server();
    server
        .add_endpoint(Endpoint::new("v2", "/v2/test", Method::GET, TextHandler::new("v2")))
        .unwrap();
    server
        .add_listener(Listener::new(
            "rewrite",
            SERVER_REQUEST,
            callback_fn(|event| {
                if let Some(request) = event.request_mut() {
                    if request.uri().path() == "/test" {
                        *request.uri_mut() = "/v2/test".parse()?;
                    }
                }
                Ok(())
            }),
        ))
        .unwrap();

    let response = server.handle(request("GET", "/test", "")).unwrap();
    assert_eq!(body_text(&response), "v2");
}

#[test]
fn test_removed_endpoint_is_not_found() {
    let server = hello_server();

    let removed = server.remove_endpoint("/test", &Method::GET).unwrap().unwrap();
    assert_eq!(removed.id(), "hello");
    assert!(!server.registry().has_endpoint("/test", &Method::GET));

    // The route survives while it still has a POST endpoint.
    let err = server.handle(request("GET", "/test", "")).unwrap_err();
    assert!(matches!(err, Error::MethodNotAllowed { .. }));

    server.remove_endpoint("/test", &Method::POST).unwrap().unwrap();
    let err = server.handle(request("GET", "/test", "")).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert!(server.remove_endpoint("/test", &Method::GET).unwrap().is_none());
}

#[test]
fn test_middleware_runs_in_stable_priority_order() {
    init_logging();
    let server = Server::new();
    let log = TraceLog::new();
    server
        .add_endpoint(Endpoint::new("end", "/", Method::GET, log.handler("end")))
        .unwrap();
    for (id, priority) in [("A", 20), ("B", 20), ("C", 10)] {
        server
            .add_middleware(MiddlewareEntry::new(id, log.middleware(id)).with_priority(priority))
            .unwrap();
    }

    server.handle(request("GET", "/", "")).unwrap();
    assert_eq!(
        log.entries(),
        ["C:in", "A:in", "B:in", "end", "B:out", "A:out", "C:out"]
    );
}

#[test]
fn test_logging_middleware_is_transparent() {
    init_logging();
    let server = Server::new();
    server
        .add_endpoint(Endpoint::new("echo", "/echo", Method::PUT, EchoHandler))
        .unwrap();
    server
        .add_middleware(
            MiddlewareEntry::new("access", LoggingMiddleware::new())
                .with_priority(switchyard::MIN_PRIORITY),
        )
        .unwrap();

    let response = server.handle(request("PUT", "/echo", "payload")).unwrap();
    assert_eq!(body_text(&response), "payload");

    let err = server.handle(request("GET", "/echo", "")).unwrap_err();
    assert!(matches!(err, Error::MethodNotAllowed { .. }));
}

#[test]
fn test_listener_may_register_during_dispatch() {
    init_logging();
    let server = Arc::new(Server::new());
    let inner = Arc::downgrade(&server);

    server
        .add_listener(Listener::new(
            "lazy-routes",
            SERVER_REQUEST,
            callback_fn(move |_| {
                if let Some(server) = inner.upgrade() {
                    server.add_endpoint(Endpoint::new(
                        "late",
                        "/late",
                        Method::GET,
                        TextHandler::new("registered late"),
                    ))?;
                }
                Ok(())
            }),
        ))
        .unwrap();

    let response = server.handle(request("GET", "/late", "")).unwrap();
    assert_eq!(body_text(&response), "registered late");
}

#[test]
fn test_handler_can_return_routing_errors() {
    init_logging();
    let server = Server::new();
    server
        .add_endpoint(Endpoint::new(
            "lookup",
            r"/items/(?P<item>\d+)",
            Method::GET,
            switchyard::handler_fn(|request| {
                use switchyard::RequestExt;
                match request.attribute("item") {
                    Some("1") => Ok(switchyard::Response::new("one".into())),
                    _ => Err(Error::NotFound {
                        path: request.uri().path().to_owned(),
                    }
                    .into()),
                }
            }),
        ))
        .unwrap();

    assert_eq!(
        body_text(&server.handle(request("GET", "/items/1", "")).unwrap()),
        "one"
    );
    let err = server.handle(request("GET", "/items/2", "")).unwrap_err();
    assert!(matches!(&err, Error::NotFound { path } if path == "/items/2"));
}
