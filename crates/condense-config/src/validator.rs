//! Configuration validation

use crate::Config;
use condense_core::{Error, Result};
use condense_filter::ContentTypeMatcher;
use tracing_subscriber::EnvFilter;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_filter(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_filter(config: &Config) -> Result<()> {
    let filter = &config.filter_config();

    // Patterns are compiled again when the filter is built; this reports
    // them before anything else starts
    let matcher = ContentTypeMatcher::new(&filter.content_types)?;

    if filter.enabled && matcher.is_empty() {
        return Err(Error::Config(
            "filter.content_types must not be empty when the filter is enabled".to_string(),
        ));
    }

    if let Some(timeout) = filter.compress_timeout {
        if timeout.is_zero() {
            return Err(Error::Config("filter.compress_timeout must be > 0".to_string()));
        }
        if timeout.as_secs() > 10 {
            tracing::warn!(?timeout, "filter.compress_timeout is very high (>10s)");
        }
    }

    if !filter.enabled {
        tracing::warn!("Compression filter is disabled; all responses pass through");
    }

    Ok(())
}

/// The level is handed to `EnvFilter` as is, so it is checked the same way
fn validate_logging(config: &Config) -> Result<()> {
    let level = &config.logging.level;
    if level.trim().is_empty() {
        return Err(Error::Config("logging.level must not be empty".to_string()));
    }
    EnvFilter::try_new(level)
        .map(|_| ())
        .map_err(|e| Error::Config(format!("Invalid log level: {level} ({e})")))
}
