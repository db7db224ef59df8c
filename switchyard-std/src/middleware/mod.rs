//! Standard middleware implementations.

pub mod conditional;
pub mod guard;
pub mod logging;

pub use conditional::Conditional;
pub use guard::RequireHeader;
pub use logging::LoggingMiddleware;
