//! Request specs and their prepared form.
//!
//! A [`Request`] is an owned description of one HTTP call. It is resolved
//! exactly once into a [`PreparedRequest`] before a batch is dispatched. Bad
//! URLs and header values are therefore rejected before any network activity.

mod prepared;
mod spec;

pub use prepared::PreparedRequest;
pub use spec::RequestSpec;

use crate::{Error, ErrorContext, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, PartialEq)]
enum RequestBody {
    Bytes(Bytes),
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

/// Description of a single HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    body: Option<RequestBody>,
    timeout: Option<Duration>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Append a header. Repeated names are sent as repeated headers.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Append a query parameter to the URL.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Raw body bytes, sent as-is.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(RequestBody::Bytes(body.into()));
        self
    }

    /// JSON body; sets `content-type: application/json` unless a content type was given.
    pub fn with_json(mut self, value: serde_json::Value) -> Self {
        self.body = Some(RequestBody::Json(value));
        self
    }

    /// URL-encoded form body.
    pub fn with_form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = Some(RequestBody::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ));
        self
    }

    pub fn bearer_auth(self, token: impl std::fmt::Display) -> Self {
        self.with_header(AUTHORIZATION.as_str(), format!("Bearer {}", token))
    }

    pub fn basic_auth(self, username: impl std::fmt::Display, password: Option<&str>) -> Self {
        let credentials = match password {
            Some(password) => format!("{}:{}", username, password),
            None => format!("{}:", username),
        };
        let encoded = STANDARD.encode(credentials);
        self.with_header(AUTHORIZATION.as_str(), format!("Basic {}", encoded))
    }

    /// Transport-enforced timeout for this request only.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Resolve into a request that is ready to send.
    pub fn prepare(&self) -> Result<PreparedRequest> {
        let mut url = Url::parse(&self.url).map_err(|e| {
            invalid(
                format!("invalid url '{}'", self.url),
                "request.url",
                e.to_string(),
            )
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(
                format!("unsupported url scheme '{}'", url.scheme()),
                "request.url",
                "expected http or https",
            ));
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let field = format!("request.headers.{}", name);
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                invalid(format!("invalid header name '{}'", name), &field, e.to_string())
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                invalid(format!("invalid value for header '{}'", name), &field, e.to_string())
            })?;
            headers.append(header_name, header_value);
        }

        let body = match &self.body {
            None => None,
            Some(RequestBody::Bytes(bytes)) => Some(bytes.clone()),
            Some(RequestBody::Json(value)) => {
                if !headers.contains_key(CONTENT_TYPE) {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                }
                Some(Bytes::from(serde_json::to_vec(value)?))
            }
            Some(RequestBody::Form(fields)) => {
                if !headers.contains_key(CONTENT_TYPE) {
                    headers.insert(
                        CONTENT_TYPE,
                        HeaderValue::from_static("application/x-www-form-urlencoded"),
                    );
                }
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(fields.iter())
                    .finish();
                Some(Bytes::from(encoded))
            }
        };

        Ok(PreparedRequest::new(
            self.method.clone(),
            url,
            headers,
            body,
            self.timeout,
        ))
    }
}

fn invalid(message: String, field: &str, details: impl Into<String>) -> Error {
    Error::validation_with_context(
        message,
        ErrorContext::new()
            .with_field_path(field)
            .with_details(details)
            .with_source("request_preparer"),
    )
}

/// `GET` request spec.
pub fn get(url: impl Into<String>) -> Request {
    Request::new(Method::GET, url)
}

/// `PUT` request spec.
pub fn put(url: impl Into<String>) -> Request {
    Request::new(Method::PUT, url)
}

/// `POST` request spec.
pub fn post(url: impl Into<String>) -> Request {
    Request::new(Method::POST, url)
}

/// `PATCH` request spec.
pub fn patch(url: impl Into<String>) -> Request {
    Request::new(Method::PATCH, url)
}

/// `DELETE` request spec.
pub fn delete(url: impl Into<String>) -> Request {
    Request::new(Method::DELETE, url)
}

/// `HEAD` request spec.
pub fn head(url: impl Into<String>) -> Request {
    Request::new(Method::HEAD, url)
}

/// `OPTIONS` request spec.
pub fn options(url: impl Into<String>) -> Request {
    Request::new(Method::OPTIONS, url)
}
