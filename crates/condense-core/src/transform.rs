//! Response transformation capability
//!
//! A [`ResponseTransform`] rewrites an outgoing response after the handler
//! has produced it. Transforms are infallible: a transform that cannot do its
//! work hands the response back untouched.

use crate::middleware::{Body, Middleware, Next};
use crate::Result;
use async_trait::async_trait;
use http::{Request, Response};
use std::fmt;
use std::sync::Arc;

/// Post-processing stage applied to every outgoing response
#[async_trait]
pub trait ResponseTransform: Send + Sync + fmt::Debug {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Rewrite `response`, or return it unchanged
    async fn apply(&self, response: Response<Body>) -> Response<Body>;
}

#[async_trait]
impl<T: ResponseTransform + ?Sized> ResponseTransform for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn apply(&self, response: Response<Body>) -> Response<Body> {
        (**self).apply(response).await
    }
}

/// Runs a [`ResponseTransform`] over the response of the rest of the chain
pub struct TransformMiddleware<T> {
    transform: T,
}

impl<T: ResponseTransform> TransformMiddleware<T> {
    /// Wrap a transform
    pub fn new(transform: T) -> Self {
        Self { transform }
    }

    /// The wrapped transform
    pub fn transform(&self) -> &T {
        &self.transform
    }
}

impl<T: ResponseTransform> fmt::Debug for TransformMiddleware<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformMiddleware")
            .field("transform", &self.transform.name())
            .finish()
    }
}

#[async_trait]
impl<T: ResponseTransform> Middleware for TransformMiddleware<T> {
    async fn call(&self, req: Request<Body>, next: Next) -> Result<Response<Body>> {
        let response = next.run(req).await?;
        Ok(self.transform.apply(response).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::body_bytes;
    use crate::Error;
    use http::HeaderValue;

    #[derive(Debug)]
    struct Stamp;

    #[async_trait]
    impl ResponseTransform for Stamp {
        fn name(&self) -> &'static str {
            "stamp"
        }

        async fn apply(&self, mut response: Response<Body>) -> Response<Body> {
            response
                .headers_mut()
                .insert("x-stamped", HeaderValue::from_static("1"));
            response
        }
    }

    #[tokio::test]
    async fn test_transform_runs_after_handler() {
        let stack: Arc<[Arc<dyn Middleware>]> =
            Arc::new([Arc::new(TransformMiddleware::new(Stamp)) as Arc<dyn Middleware>]);
        let next = Next::with_fn(stack, |_req| async { Ok(Response::new(Body::from("<x/>"))) });

        let req = Request::builder().body(Body::from("")).unwrap();
        let response = next.run(req).await.unwrap();

        assert_eq!(response.headers()["x-stamped"], "1");
        assert_eq!(&body_bytes(response.into_body()).await[..], b"<x/>");
    }

    #[tokio::test]
    async fn test_handler_error_skips_transform() {
        let stack: Arc<[Arc<dyn Middleware>]> =
            Arc::new([Arc::new(TransformMiddleware::new(Arc::new(Stamp))) as Arc<dyn Middleware>]);
        let next = Next::with_fn(stack, |_req| async {
            Err(Error::Internal("handler failed".to_string()))
        });

        let req = Request::builder().body(Body::from("")).unwrap();
        assert!(next.run(req).await.is_err());
    }
}
