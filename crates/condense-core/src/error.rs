//! Error types for Condense

/// Result type alias using [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Main error type for Condense
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration error, raised before any response is filtered
    #[error("Configuration error: {0}")]
    Config(String),

    /// The compressor could not process a response body
    #[error("Compression failed: {0}")]
    Compression(String),

    /// The response body could not be read or decoded
    #[error("Invalid response body: {0}")]
    Body(String),

    /// Compression did not finish within the configured bound
    #[error("Compression timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] http::Error),

    /// Internal error (should not happen in production)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether a filter may absorb this error and fall back to the
    /// uncompressed response
    ///
    /// `Internal` covers a compressor that panicked on the worker pool.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Compression(_) | Error::Body(_) | Error::Timeout(_) | Error::Internal(_)
        )
    }

    /// Create a compression error
    pub fn compression(message: impl Into<String>) -> Self {
        Error::Compression(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_recoverable_errors() {
        assert!(Error::compression("unterminated comment").is_recoverable());
        assert!(Error::Body("invalid utf-8".to_string()).is_recoverable());
        assert!(Error::Timeout(Duration::from_millis(5)).is_recoverable());
        assert!(Error::Internal("compressor panicked".to_string()).is_recoverable());
        assert!(!Error::Middleware("downstream failed".to_string()).is_recoverable());
        assert!(!Error::Config("bad pattern".to_string()).is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = Error::Config("invalid content type pattern".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert_eq!(
            Error::Timeout(Duration::from_secs(1)).to_string(),
            "Compression timed out after 1s"
        );
    }
}
