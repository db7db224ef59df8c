//! Header guard middleware.

use http::{HeaderName, StatusCode};
use switchyard_core::{Bytes, Middleware, Next, Request, Response, Result};
use tracing::debug;

/// Rejects requests that lack a header.
///
/// A rejected request never reaches `next`; the guard answers with an empty
/// body and its configured status, 403 unless changed.
#[derive(Debug, Clone)]
pub struct RequireHeader {
    header: HeaderName,
    status: StatusCode,
}

impl RequireHeader {
    /// Require `header` to be present.
    pub fn new(header: HeaderName) -> Self {
        Self {
            header,
            status: StatusCode::FORBIDDEN,
        }
    }

    /// Answer rejected requests with `status`.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// The required header.
    pub fn header(&self) -> &HeaderName {
        &self.header
    }

    /// The status rejected requests get.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl Middleware for RequireHeader {
    fn process(&self, request: Request, next: Next<'_>) -> Result<Response> {
        if request.headers().contains_key(&self.header) {
            return next.handle(request);
        }

        debug!(header = %self.header, status = %self.status, "Rejecting request");
        let mut response = Response::new(Bytes::new());
        *response.status_mut() = self.status;
        Ok(response)
    }
}
