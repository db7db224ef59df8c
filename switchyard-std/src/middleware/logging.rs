//! Request logging middleware.

use std::{borrow::Cow, time::Instant};
use switchyard_core::{Middleware, Next, Request, Response, Result};
use tracing::{info, warn};

/// Logs method, path, status and elapsed time of every request it wraps.
///
/// Register it with a low priority to time the whole chain, or a high one to
/// time only the endpoint.
#[derive(Debug, Clone)]
pub struct LoggingMiddleware {
    name: Cow<'static, str>,
}

impl LoggingMiddleware {
    /// Create a logging middleware named `access`.
    pub fn new() -> Self {
        Self::named("access")
    }

    /// Create a logging middleware with its own name, recorded on every line.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }

    /// The name recorded on every line.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for LoggingMiddleware {
    fn process(&self, request: Request, next: Next<'_>) -> Result<Response> {
        let method = request.method().clone();
        let path = request.uri().path().to_owned();
        let started = Instant::now();

        let result = next.handle(request);
        let elapsed = started.elapsed();

        match &result {
            Ok(response) => info!(
                name = %self.name,
                %method,
                %path,
                status = %response.status(),
                ?elapsed,
                "Request completed"
            ),
            Err(err) => warn!(
                name = %self.name,
                %method,
                %path,
                status = %err.status(),
                error = %err,
                ?elapsed,
                "Request failed"
            ),
        }
        result
    }
}
