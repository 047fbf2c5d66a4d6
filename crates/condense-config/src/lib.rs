//! # Condense Configuration
//!
//! Configuration management with support for:
//! - Multiple formats (YAML, TOML, JSON)
//! - Environment variable expansion
//! - Validation
//! - Default values

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod loader;
pub mod types;
pub mod validator;

pub use loader::{load_config, load_from_file, load_from_str};
pub use types::{Config, LogFormat, LoggingConfig, MarkupKind};
pub use validator::validate_config;

use condense_core::{Error, Result};
use condense_filter::{CompressionFilter, FilterConfig};
use std::path::Path;

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format
    Yaml,
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::Config("Unable to detect config format".to_string()))?;

        match ext {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "toml" => Ok(ConfigFormat::Toml),
            "json" => Ok(ConfigFormat::Json),
            _ => Err(Error::Config(format!("Unsupported config format: {}", ext))),
        }
    }
}

impl Config {
    /// Filter settings with the content type defaults of `markup`
    ///
    /// A file that leaves `filter.content_types` unset gets the XML patterns
    /// from serde; for HTML those are swapped for the HTML ones.
    pub fn filter_config(&self) -> FilterConfig {
        let mut filter = self.filter.clone();
        if self.markup == MarkupKind::Html && filter.has_default_content_types() {
            filter.content_types = FilterConfig::html().content_types;
        }
        filter
    }

    /// Build the filter this configuration describes
    pub fn build_filter(&self) -> Result<CompressionFilter> {
        let filter = self.filter_config();
        match self.markup {
            MarkupKind::Xml => CompressionFilter::xml(filter),
            MarkupKind::Html => CompressionFilter::html(filter),
        }
    }
}
