//! The compression filter

use crate::config::FilterConfig;
use crate::matcher::ContentTypeMatcher;
use crate::stats::FilterStats;
use async_trait::async_trait;
use bytes::Bytes;
use condense_core::response::{body_bytes, exact_len, media_type, set_content_length};
use condense_core::{Body, Error, ResponseTransform, Result};
use condense_markup::{Compressor, CompressorOptions, HtmlCompressor, XmlCompressor};
use http::{header, HeaderMap, Response};
use http_body_util::Full;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Why a response was returned without compression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassReason {
    /// The filter is disabled
    Disabled,
    /// No usable `Content-Type` header
    MissingContentType,
    /// The media type matches no configured pattern
    UnmatchedContentType,
    /// The body already has a `Content-Encoding`
    AlreadyEncoded,
    /// The body is shorter than `min_size`
    BelowMinSize,
    /// The compressor produced nothing smaller
    NoGain,
}

/// What the filter did with a response
#[derive(Debug)]
pub enum FilterOutcome {
    /// Returned unchanged
    PassThrough(PassReason),
    /// Body replaced
    Compressed {
        /// Body length before
        original_len: usize,
        /// Body length after
        compressed_len: usize,
    },
    /// Compression failed; returned unchanged
    Recovered(Error),
}

impl FilterOutcome {
    /// Whether the body was replaced
    pub fn is_compressed(&self) -> bool {
        matches!(self, Self::Compressed { .. })
    }

    /// Whether a compression failure was absorbed
    pub fn is_recovered(&self) -> bool {
        matches!(self, Self::Recovered(_))
    }
}

/// Response filter that compresses markup bodies
///
/// The filter owns an immutable configuration and a compressor; the only
/// state it mutates is its [`FilterStats`]. One instance serves any number of
/// concurrent responses.
pub struct CompressionFilter {
    config: Arc<FilterConfig>,
    matcher: ContentTypeMatcher,
    compressor: Arc<dyn Compressor>,
    options: CompressorOptions,
    stats: Arc<FilterStats>,
}

impl CompressionFilter {
    /// Create a filter around `compressor`
    ///
    /// Fails with [`Error::Config`] if a content type pattern does not compile.
    pub fn new(config: FilterConfig, compressor: Arc<dyn Compressor>) -> Result<Self> {
        let matcher = ContentTypeMatcher::new(&config.content_types)?;
        let options = config.compressor_options();

        Ok(Self {
            config: Arc::new(config),
            matcher,
            compressor,
            options,
            stats: Arc::new(FilterStats::new()),
        })
    }

    /// Create a filter using [`XmlCompressor`]
    pub fn xml(config: FilterConfig) -> Result<Self> {
        Self::new(config, Arc::new(XmlCompressor::new()))
    }

    /// Create a filter using [`HtmlCompressor`]
    pub fn html(config: FilterConfig) -> Result<Self> {
        Self::new(config, Arc::new(HtmlCompressor::new()))
    }

    /// The filter's configuration
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Counters shared by every invocation
    pub fn stats(&self) -> Arc<FilterStats> {
        Arc::clone(&self.stats)
    }

    /// Reason to leave `response` alone, if there is one
    pub fn pass_reason(&self, response: &Response<Body>) -> Option<PassReason> {
        if !self.config.enabled {
            return Some(PassReason::Disabled);
        }

        let Some(media_type) = media_type(response.headers()) else {
            return Some(PassReason::MissingContentType);
        };
        if !self.matcher.matches(&media_type) {
            return Some(PassReason::UnmatchedContentType);
        }

        if is_encoded(response.headers()) {
            return Some(PassReason::AlreadyEncoded);
        }

        let len = exact_len(response.body()).unwrap_or(u64::MAX);
        if len < self.config.min_size as u64 {
            return Some(PassReason::BelowMinSize);
        }

        None
    }

    /// Filter `response` and report what happened
    pub async fn apply_with_outcome(
        &self,
        response: Response<Body>,
    ) -> (Response<Body>, FilterOutcome) {
        if let Some(reason) = self.pass_reason(&response) {
            trace!(?reason, "Response passed through");
            self.stats.record_pass_through();
            return (response, FilterOutcome::PassThrough(reason));
        }

        let (mut parts, body) = response.into_parts();
        let original = body_bytes(body).await;
        let original_len = original.len();

        let compressed = match self.compress_body(original.clone()).await {
            Ok(compressed) => compressed,
            Err(e) => {
                warn!(
                    error = %e,
                    original_len,
                    "Failed to compress response body, returning it unchanged"
                );
                self.stats.record_recovered();
                let response = Response::from_parts(parts, Full::new(original));
                return (response, FilterOutcome::Recovered(e));
            }
        };

        let compressed_len = compressed.len();
        if compressed_len >= original_len {
            debug!(original_len, "Compressed body not smaller, using original");
            self.stats.record_pass_through();
            let response = Response::from_parts(parts, Full::new(original));
            return (response, FilterOutcome::PassThrough(PassReason::NoGain));
        }

        set_content_length(&mut parts.headers, compressed_len);
        // Content-Length now describes the body
        parts.headers.remove(header::TRANSFER_ENCODING);

        debug!(original_len, compressed_len, "Response body compressed");
        self.stats.record_compressed(original_len, compressed_len);

        let response = Response::from_parts(parts, Full::new(compressed));
        (
            response,
            FilterOutcome::Compressed {
                original_len,
                compressed_len,
            },
        )
    }

    /// Run the compressor on the blocking pool
    async fn compress_body(&self, body: Bytes) -> Result<Bytes> {
        let compressor = Arc::clone(&self.compressor);
        let options = self.options;

        let task = tokio::task::spawn_blocking(move || -> Result<String> {
            let markup = std::str::from_utf8(&body)
                .map_err(|e| Error::Body(format!("body is not valid UTF-8: {e}")))?;
            compressor
                .compress(markup, &options)
                .map_err(|e| Error::compression(e.to_string()))
        });

        let joined = match self.config.compress_timeout {
            // The blocking task cannot be cancelled; it finishes in the background
            Some(limit) => tokio::time::timeout(limit, task)
                .await
                .map_err(|_| Error::Timeout(limit))?,
            None => task.await,
        };

        // A compressor panic arrives here as a JoinError
        let compressed =
            joined.map_err(|e| Error::Internal(format!("compression task failed: {e}")))??;
        Ok(Bytes::from(compressed))
    }
}

impl fmt::Debug for CompressionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompressionFilter")
            .field("enabled", &self.config.enabled)
            .field("content_types", &self.config.content_types)
            .field("options", &self.options)
            .field("compressor", &self.compressor)
            .finish()
    }
}

#[async_trait]
impl ResponseTransform for CompressionFilter {
    fn name(&self) -> &'static str {
        "markup-compression"
    }

    async fn apply(&self, response: Response<Body>) -> Response<Body> {
        self.apply_with_outcome(response).await.0
    }
}

/// Anything but `identity` counts as an encoding
fn is_encoded(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::CONTENT_ENCODING)
        .iter()
        .any(|value| !value.as_bytes().eq_ignore_ascii_case(b"identity"))
}
