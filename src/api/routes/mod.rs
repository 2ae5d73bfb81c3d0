//! Route handlers for the HTTP API
//!
//! Handlers are organized by domain:
//! - [`index`] - Index page, unknown routes, panics
//! - [`downloads`] - Submitting URLs and reading records
//! - [`videos`] - Serving downloaded files
//! - [`system`] - Health, OpenAPI

mod downloads;
mod index;
mod system;
mod videos;

// Re-export all handlers so `routes::function_name` works
pub use downloads::*;
pub use index::*;
pub use system::*;
pub use videos::*;
