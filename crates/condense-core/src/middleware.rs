//! Middleware chain used to host response filters

use crate::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Body type alias
pub type Body = Full<Bytes>;

/// A stage in the request/response pipeline
#[async_trait]
pub trait Middleware: Send + Sync + fmt::Debug {
    /// Process a request
    ///
    /// # Arguments
    ///
    /// * `req` - The incoming HTTP request
    /// * `next` - The rest of the chain, ending in the handler
    async fn call(&self, req: Request<Body>, next: Next) -> Result<Response<Body>>;
}

/// Future returned by a [`HandlerFn`]
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Response<Body>>> + Send>>;

/// Type alias for the handler that terminates a chain
pub type HandlerFn = Box<dyn Fn(Request<Body>) -> HandlerFuture + Send + Sync>;

/// The remainder of a middleware chain
pub struct Next {
    stack: Arc<[Arc<dyn Middleware>]>,
    index: usize,
    handler: Option<Arc<HandlerFn>>,
}

impl Next {
    /// Create a chain with no terminating handler
    pub fn new(stack: Arc<[Arc<dyn Middleware>]>) -> Self {
        Self {
            stack,
            index: 0,
            handler: None,
        }
    }

    /// Create a chain that ends in `handler`
    pub fn with_handler(stack: Arc<[Arc<dyn Middleware>]>, handler: HandlerFn) -> Self {
        Self {
            stack,
            index: 0,
            handler: Some(Arc::new(handler)),
        }
    }

    /// Create a chain that ends in an async function
    pub fn with_fn<F, Fut>(stack: Arc<[Arc<dyn Middleware>]>, handler: F) -> Self
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<Body>>> + Send + 'static,
    {
        Self::with_handler(
            stack,
            Box::new(move |req| -> HandlerFuture { Box::pin(handler(req)) }),
        )
    }

    /// Run the next middleware, or the handler once the stack is exhausted
    pub async fn run(self, req: Request<Body>) -> Result<Response<Body>> {
        if let Some(middleware) = self.stack.get(self.index) {
            let next = Self {
                stack: Arc::clone(&self.stack),
                index: self.index + 1,
                handler: self.handler.clone(),
            };
            middleware.call(req, next).await
        } else if let Some(handler) = self.handler {
            handler(req).await
        } else {
            Err(Error::Middleware(
                "chain completed without a handler".to_string(),
            ))
        }
    }
}

impl Clone for Next {
    fn clone(&self) -> Self {
        Self {
            stack: Arc::clone(&self.stack),
            index: self.index,
            handler: self.handler.clone(),
        }
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("index", &self.index)
            .field("remaining", &self.stack.len().saturating_sub(self.index))
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}
