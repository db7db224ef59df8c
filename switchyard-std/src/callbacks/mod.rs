//! Standard listener callback implementations.

pub mod filter;
pub mod observe;

pub use filter::Filtered;
pub use observe::Observe;
