//! Markup compression filter for Condense
//!
//! Rewrites XML or HTML response bodies with a smaller equivalent before they
//! are sent:
//! - Content-type aware (patterns are regular expressions over the media type)
//! - Comments kept by default
//! - Compression runs on the blocking thread pool, with an optional timeout
//! - Failures fall back to the original response
//! - `Content-Length` recomputed for every rewritten body

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod config;
pub mod filter;
pub mod matcher;
pub mod middleware;
pub mod stats;

pub use config::{FilterConfig, DEFAULT_REMOVE_COMMENTS};
pub use filter::{CompressionFilter, FilterOutcome, PassReason};
pub use matcher::ContentTypeMatcher;
pub use middleware::CompressionMiddleware;
pub use stats::{FilterStats, StatsSnapshot};

pub use condense_markup::{Compressor, CompressorOptions, HtmlCompressor, XmlCompressor};
