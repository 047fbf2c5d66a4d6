//! # Condense Core
//!
//! Core types, traits, and error handling shared by the Condense crates:
//! - Error types
//! - Middleware chain
//! - The [`ResponseTransform`] capability
//! - Response helpers

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod error;
pub mod middleware;
pub mod response;
pub mod transform;

pub use error::{Error, Result};
pub use middleware::{Body, Middleware, Next};
pub use response::ResponseBuilder;
pub use transform::{ResponseTransform, TransformMiddleware};

// Re-export commonly used HTTP types
pub use bytes::Bytes;
pub use http::{Request, Response, StatusCode};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::middleware::{Body, Middleware, Next};
    pub use crate::response::ResponseBuilder;
    pub use crate::transform::{ResponseTransform, TransformMiddleware};
}
