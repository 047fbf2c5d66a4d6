//! Configuration for the compression filter

use condense_markup::CompressorOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Comments are kept unless configured otherwise
///
/// The compressors remove comments by default; this filter does not.
pub const DEFAULT_REMOVE_COMMENTS: bool = false;

/// Compression filter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Enable the filter
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Remove `<!-- -->` comments
    #[serde(default = "default_remove_comments")]
    pub remove_comments: bool,

    /// Remove whitespace-only text between tags
    #[serde(default = "default_remove_intertag_spaces")]
    pub remove_intertag_spaces: bool,

    /// Media types to compress, as case-insensitive regular expressions
    /// matched against the whole media type (`text/xml`, not
    /// `text/xml; charset=utf-8`)
    #[serde(default = "default_content_types")]
    pub content_types: Vec<String>,

    /// Bodies shorter than this many bytes are left alone
    #[serde(default)]
    pub min_size: usize,

    /// Give up on a single body after this long
    #[serde(default, with = "humantime_serde")]
    pub compress_timeout: Option<Duration>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            remove_comments: DEFAULT_REMOVE_COMMENTS,
            remove_intertag_spaces: true,
            content_types: default_content_types(),
            min_size: 0,
            compress_timeout: None,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_remove_comments() -> bool {
    DEFAULT_REMOVE_COMMENTS
}

fn default_remove_intertag_spaces() -> bool {
    true
}

fn default_content_types() -> Vec<String> {
    vec![
        "text/xml".to_string(),
        "application/xml".to_string(),
        r"application/[a-z0-9.+-]+\+xml".to_string(),
    ]
}

fn html_content_types() -> Vec<String> {
    vec![
        "text/html".to_string(),
        r"application/xhtml\+xml".to_string(),
    ]
}

impl FilterConfig {
    /// Defaults for XML responses
    pub fn xml() -> Self {
        Self::default()
    }

    /// Defaults for HTML responses
    ///
    /// Whitespace between tags is kept: between inline elements it renders.
    pub fn html() -> Self {
        Self {
            remove_intertag_spaces: false,
            content_types: html_content_types(),
            ..Self::default()
        }
    }

    /// Whether the content types are the XML defaults
    pub fn has_default_content_types(&self) -> bool {
        self.content_types == default_content_types()
    }

    /// Set the content type patterns
    pub fn with_content_types<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content_types = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Options handed to the compressor on every call
    pub fn compressor_options(&self) -> CompressorOptions {
        CompressorOptions {
            remove_comments: self.remove_comments,
            remove_intertag_spaces: self.remove_intertag_spaces,
        }
    }
}
