//! # Condense Markup
//!
//! Whitespace and comment compressors for XML and HTML documents.
//!
//! Both compressors:
//! - Remove whitespace-only text between tags
//! - Collapse whitespace inside tags, outside quoted attribute values
//! - Optionally remove comments
//! - Keep CDATA sections, processing instructions and declarations intact
//!
//! ```
//! use condense_markup::{Compressor, CompressorOptions, XmlCompressor};
//!
//! let options = CompressorOptions::default().with_remove_comments(false);
//! let out = XmlCompressor.compress("<a>   <!-- c --> <b/> </a>", &options).unwrap();
//! assert_eq!(out, "<a><!-- c --><b/></a>");
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod compressor;
pub mod error;
mod lexer;
pub mod options;

pub use compressor::{Compressor, HtmlCompressor, XmlCompressor};
pub use error::MarkupError;
pub use options::CompressorOptions;
