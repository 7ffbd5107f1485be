//! Transport failure type and its classification.
//!
//! A failure is either a network-level problem raised by the HTTP client, or a
//! response whose status is not 2xx. Both become `Failure` outcomes. They are
//! classified into stable class names so callers can decide what to re-submit.
//!
//! | Class               | Trigger                                  |
//! |---------------------|------------------------------------------|
//! | `invalid_request`   | HTTP 400, 422                            |
//! | `authentication`    | HTTP 401                                 |
//! | `permission_denied` | HTTP 403                                 |
//! | `not_found`         | HTTP 404, 410                            |
//! | `timeout`           | HTTP 408, 504, client-side timeout       |
//! | `conflict`          | HTTP 409                                 |
//! | `request_too_large` | HTTP 413                                 |
//! | `rate_limited`      | HTTP 429                                 |
//! | `overloaded`        | HTTP 503, 529                            |
//! | `server_error`      | other 5xx                                |
//! | `connection`        | connect/DNS failure                      |
//! | `http_error`        | any other non-2xx status                 |
//! | `transport`         | anything else                            |

use super::Response;
use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {} from {}", .0.status(), .0.url())]
    Status(Box<Response>),

    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Wrap a non-success response.
    pub fn status(response: Response) -> Self {
        TransportError::Status(Box::new(response))
    }

    /// The HTTP status involved in this failure, if one was received.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            TransportError::Http(e) => e.status(),
            TransportError::Status(resp) => Some(resp.status()),
            TransportError::Other(_) => None,
        }
    }

    /// The rejected response, for status-derived failures.
    pub fn response(&self) -> Option<&Response> {
        match self {
            TransportError::Status(resp) => Some(resp),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.class() == "timeout"
    }

    /// Stable class name for this failure (see module docs).
    pub fn class(&self) -> &'static str {
        match self {
            TransportError::Http(e) if e.is_timeout() => "timeout",
            TransportError::Http(e) if e.is_connect() => "connection",
            TransportError::Http(e) => e.status().map(class_for_status).unwrap_or("transport"),
            TransportError::Status(resp) => class_for_status(resp.status()),
            TransportError::Other(_) => "transport",
        }
    }
}

/// Map a non-success HTTP status to its failure class.
pub fn class_for_status(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 | 422 => "invalid_request",
        401 => "authentication",
        403 => "permission_denied",
        404 | 410 => "not_found",
        408 | 504 => "timeout",
        409 => "conflict",
        413 => "request_too_large",
        429 => "rate_limited",
        503 | 529 => "overloaded",
        500..=599 => "server_error",
        _ => "http_error",
    }
}
