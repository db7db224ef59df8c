//! # switchyard-std
//!
//! Standard implementations for the Switchyard dispatch core.
//!
//! This crate provides:
//! - **Middleware**: [`LoggingMiddleware`](middleware::LoggingMiddleware),
//!   [`Conditional`](middleware::Conditional),
//!   [`RequireHeader`](middleware::RequireHeader)
//! - **Callbacks**: [`Filtered`](callbacks::Filtered),
//!   [`Observe`](callbacks::Observe)
//! - **Testing**: recording and counting doubles in [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use switchyard_core;

// Modules
pub mod callbacks;
pub mod middleware;
pub mod testing;
