//! IO modules - external system interfaces
//!
//! This module contains all external IO operations:
//! - `store` - CSV review dataset loaded once at startup
//! - `http` - HTTP endpoint for listing and submitting reviews

pub mod http;
pub mod store;

// Re-export commonly used types
pub use http::{serve, start_server};
pub use store::ReviewStore;
