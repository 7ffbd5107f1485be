//! Transport layer: the blocking send seam and the buffered response type.
//!
//! The batch engine only talks to [`Transport`]. [`HttpTransport`] is the
//! default implementation over `reqwest::blocking`. Tests and callers may plug
//! in their own.

mod error;
mod http;

pub use error::{class_for_status, TransportError};
pub use http::{HttpTransport, TransportConfig};

use crate::request::PreparedRequest;
use bytes::Bytes;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

/// Blocking request sender.
///
/// Implementations must be shareable across worker threads: the bounded
/// concurrent strategy calls `send` from up to `C` threads at once.
pub trait Transport: Send + Sync {
    /// Send one prepared request and return the buffered response, whatever its status.
    fn send(&self, request: &PreparedRequest) -> std::result::Result<Response, TransportError>;

    fn name(&self) -> &'static str {
        "custom"
    }
}

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    url: Url,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    pub fn new(status: StatusCode, url: Url, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            url,
            headers,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Final URL, after any redirects the transport followed.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    pub fn into_bytes(self) -> Bytes {
        self.body
    }

    /// Body decoded as UTF-8; invalid sequences are replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> crate::Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Turn a non-2xx response into a status failure.
    pub fn error_for_status(self) -> std::result::Result<Self, TransportError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(TransportError::status(self))
        }
    }
}
