//! Response builder and body/header helpers

use crate::middleware::Body;
use crate::Result;
use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, Response, StatusCode};
use http_body::Body as _;
use http_body_util::{BodyExt, Full};

/// Read a full body into memory
pub async fn body_bytes(body: Body) -> Bytes {
    match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(never) => match never {},
    }
}

/// Exact body length, when the body knows it without being read
pub fn exact_len(body: &Body) -> Option<u64> {
    body.size_hint().exact()
}

/// Media type of a response, lowercased and without parameters
///
/// `text/XML; charset=utf-8` yields `text/xml`.
pub fn media_type(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    let essence = value.split(';').next()?.trim();
    if essence.is_empty() {
        None
    } else {
        Some(essence.to_ascii_lowercase())
    }
}

/// Overwrite `Content-Length` with `len`
pub fn set_content_length(headers: &mut HeaderMap, len: usize) {
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
}

/// Response builder for markup responses
#[derive(Debug)]
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(header::HeaderName, String)>,
}

impl ResponseBuilder {
    /// Create a new response builder
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
        }
    }

    /// Set a header
    pub fn header(mut self, name: header::HeaderName, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Build with an XML body
    pub fn xml(self, body: impl Into<String>) -> Result<Response<Body>> {
        self.with_type("application/xml; charset=utf-8", body.into())
    }

    /// Build with an HTML body
    pub fn html(self, body: impl Into<String>) -> Result<Response<Body>> {
        self.with_type("text/html; charset=utf-8", body.into())
    }

    /// Build with an explicit content type
    pub fn with_type(self, content_type: &str, body: String) -> Result<Response<Body>> {
        let mut response = Response::builder()
            .status(self.status)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_LENGTH, body.len());

        for (name, value) in self.headers {
            response = response.header(name, value);
        }

        Ok(response.body(Full::new(Bytes::from(body)))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_strips_parameters() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("Text/XML ; charset=UTF-8"),
        );
        assert_eq!(media_type(&headers).as_deref(), Some("text/xml"));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(""));
        assert_eq!(media_type(&headers), None);
        assert_eq!(media_type(&HeaderMap::new()), None);
    }

    #[test]
    fn test_builder_sets_length() {
        let response = ResponseBuilder::new(StatusCode::OK)
            .header(header::HeaderName::from_static("x-feed"), "rss")
            .xml("<rss/>")
            .unwrap();

        assert_eq!(response.headers()[header::CONTENT_LENGTH], "6");
        assert_eq!(response.headers()["x-feed"], "rss");
        assert_eq!(exact_len(response.body()), Some(6));
    }

    #[tokio::test]
    async fn test_body_bytes() {
        let bytes = body_bytes(Body::from("<a/>")).await;
        assert_eq!(&bytes[..], b"<a/>");
    }

    #[test]
    fn test_set_content_length_overwrites() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("100"));
        set_content_length(&mut headers, 42);
        assert_eq!(headers[header::CONTENT_LENGTH], "42");
        assert_eq!(headers.get_all(header::CONTENT_LENGTH).iter().count(), 1);
    }
}
