//! Compression middleware implementation

use crate::filter::{CompressionFilter, FilterOutcome};
use async_trait::async_trait;
use condense_core::middleware::{Body, Middleware, Next};
use condense_core::Result;
use http::{Request, Response};
use std::sync::Arc;
use tracing::debug;

/// Runs a [`CompressionFilter`] over every response of the chain
#[derive(Debug, Clone)]
pub struct CompressionMiddleware {
    filter: Arc<CompressionFilter>,
}

impl CompressionMiddleware {
    /// Create a new compression middleware
    pub fn new(filter: CompressionFilter) -> Self {
        Self {
            filter: Arc::new(filter),
        }
    }

    /// Share an existing filter
    pub fn shared(filter: Arc<CompressionFilter>) -> Self {
        Self { filter }
    }

    /// The wrapped filter
    pub fn filter(&self) -> &Arc<CompressionFilter> {
        &self.filter
    }
}

#[async_trait]
impl Middleware for CompressionMiddleware {
    async fn call(&self, req: Request<Body>, next: Next) -> Result<Response<Body>> {
        let path = req.uri().path().to_string();

        let response = next.run(req).await?;
        let (response, outcome) = self.filter.apply_with_outcome(response).await;

        match &outcome {
            FilterOutcome::Compressed {
                original_len,
                compressed_len,
            } => debug!(%path, original_len, compressed_len, "Compressed response"),
            FilterOutcome::PassThrough(reason) => debug!(%path, ?reason, "Response not compressed"),
            FilterOutcome::Recovered(e) => {
                debug!(%path, error = %e, "Served uncompressed response")
            }
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfig;
    use condense_core::response::body_bytes;
    use condense_core::{Error, ResponseBuilder, StatusCode};
    use http::header::CONTENT_LENGTH;

    fn chain(
        middleware: CompressionMiddleware,
        body: &'static str,
        content_type: &'static str,
    ) -> Next {
        let stack: Arc<[Arc<dyn Middleware>]> =
            Arc::new([Arc::new(middleware) as Arc<dyn Middleware>]);
        Next::with_fn(stack, move |_req| async move {
            ResponseBuilder::new(StatusCode::OK).with_type(content_type, body.to_string())
        })
    }

    #[tokio::test]
    async fn test_middleware_compresses_handler_output() {
        let filter = CompressionFilter::xml(FilterConfig::default()).unwrap();
        let next = chain(
            CompressionMiddleware::new(filter),
            "<feed>\n  <entry/>\n</feed>\n",
            "application/atom+xml",
        );

        let req = Request::builder().uri("/feed.atom").body(Body::from("")).unwrap();
        let response = next.run(req).await.unwrap();

        assert_eq!(response.headers()[CONTENT_LENGTH], "21");
        assert_eq!(
            &body_bytes(response.into_body()).await[..],
            b"<feed><entry/></feed>"
        );
    }

    #[tokio::test]
    async fn test_middleware_shares_stats() {
        let filter = Arc::new(CompressionFilter::xml(FilterConfig::default()).unwrap());
        let middleware = CompressionMiddleware::shared(Arc::clone(&filter));
        let next = chain(middleware, "{\"a\": 1}", "application/json");

        let req = Request::builder().uri("/api").body(Body::from("")).unwrap();
        next.run(req).await.unwrap();

        assert_eq!(filter.stats().snapshot().passed_through, 1);
    }

    #[tokio::test]
    async fn test_handler_error_propagates() {
        let filter = CompressionFilter::xml(FilterConfig::default()).unwrap();
        let stack: Arc<[Arc<dyn Middleware>]> =
            Arc::new([Arc::new(CompressionMiddleware::new(filter)) as Arc<dyn Middleware>]);
        let next = Next::with_fn(stack, |_req| async { Err(Error::Internal("boom".to_string())) });

        let req = Request::builder().body(Body::from("")).unwrap();
        assert!(matches!(next.run(req).await, Err(Error::Internal(_))));
    }
}
