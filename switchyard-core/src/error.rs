//! Error types for Switchyard.
//!
//! A single [`Error`] enum carries every failure the dispatch core can signal:
//!
//! - registration-time validation failures
//! - routing misses (`NotFound`, `MethodNotAllowed`)
//! - exact-key registry lookups that find nothing
//! - internal consistency failures
//! - failures raised by user handlers, middleware and listeners

use http::{Method, StatusCode};
use thiserror::Error;

/// A boxed error type for failures raised by user capabilities.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type used throughout Switchyard.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error type for all Switchyard operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A record failed its required-field or range checks at registration.
    #[error("invalid {record}: {reason}")]
    Validation {
        /// The kind of record (`endpoint`, `middleware`, `listener`).
        record: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// No route pattern matches the request path.
    #[error("no route matches path {path}")]
    NotFound {
        /// The request path.
        path: String,
    },

    /// A route pattern matches, but no endpoint exists for the request method.
    #[error("method {method} is not allowed for path {path}")]
    MethodNotAllowed {
        /// The request method.
        method: Method,
        /// The request path.
        path: String,
    },

    /// An exact-key registry lookup found nothing.
    #[error("no {kind} registered for {key}")]
    NotRegistered {
        /// The kind of record looked up.
        kind: &'static str,
        /// The key that was looked up.
        key: String,
    },

    /// The core found itself in a state that indicates a bug in registration code.
    #[error("internal consistency error: {0}")]
    Internal(String),

    /// A terminal handler or a middleware failed.
    #[error("handler failed: {0}")]
    Handler(#[source] BoxError),

    /// A listener callback failed; the remaining listeners were skipped.
    #[error("listener {id} failed while processing {event}")]
    Listener {
        /// The failing listener's id.
        id: String,
        /// The event type being dispatched.
        event: String,
        /// The underlying failure.
        #[source]
        source: BoxError,
    },
}

impl Error {
    /// Creates a validation error for the given record kind.
    pub fn validation(record: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            record,
            reason: reason.into(),
        }
    }

    /// Creates a lookup miss for the given record kind and key.
    pub fn not_registered(kind: &'static str, key: impl Into<String>) -> Self {
        Self::NotRegistered {
            kind,
            key: key.into(),
        }
    }

    /// Creates an internal consistency error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Wraps a foreign error raised by a handler or middleware.
    pub fn custom(err: impl Into<BoxError>) -> Self {
        Self::from_boxed(err.into())
    }

    /// Converts a boxed error back into an [`Error`].
    ///
    /// Handlers may return a boxed [`Error`] (e.g. a `NotFound` for a missing
    /// resource); it is unwrapped rather than nested inside `Handler`.
    pub fn from_boxed(err: BoxError) -> Self {
        match err.downcast::<Error>() {
            Ok(inner) => *inner,
            Err(other) => Self::Handler(other),
        }
    }

    /// The status code an outer caller should answer with for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Validation { .. }
            | Self::NotRegistered { .. }
            | Self::Internal(_)
            | Self::Handler(_)
            | Self::Listener { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns `true` for errors produced by route resolution.
    pub fn is_routing(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::MethodNotAllowed { .. })
    }
}
