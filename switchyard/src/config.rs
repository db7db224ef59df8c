//! Server configuration.
//!
//! [`ServerConfig`] is plain data: hosts embed it in whatever configuration
//! source they already load (it derives `Deserialize`, and every field has a
//! default), or build it in code with the `with_*` setters.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Default bound on nested dispatches along one call chain: 32.
pub const DEFAULT_MAX_DISPATCH_DEPTH: NonZeroUsize = NonZeroUsize::MIN.saturating_add(31);

/// Settings for a [`Server`](crate::Server).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Fire `server/request` and `server/response` around each request.
    pub request_events: bool,
    /// Fire `registry/*` events around registrations and removals made
    /// through the server.
    pub registry_events: bool,
    /// Maximum number of dispatches that may be nested on one call chain.
    /// Zero is rejected when deserializing.
    pub max_dispatch_depth: NonZeroUsize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            request_events: true,
            registry_events: true,
            max_dispatch_depth: DEFAULT_MAX_DISPATCH_DEPTH,
        }
    }
}

impl ServerConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the `server/*` events.
    pub fn with_request_events(mut self, enabled: bool) -> Self {
        self.request_events = enabled;
        self
    }

    /// Enable or disable the `registry/*` events.
    pub fn with_registry_events(mut self, enabled: bool) -> Self {
        self.registry_events = enabled;
        self
    }

    /// Set the nested dispatch bound.
    pub fn with_max_dispatch_depth(mut self, depth: NonZeroUsize) -> Self {
        self.max_dispatch_depth = depth;
        self
    }
}
