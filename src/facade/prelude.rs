//! Minimal prelude for application code.
//!
//! Goal: reduce import noise without hiding important concepts.

pub use crate::batch::{BatchError, Outcome, Strategy};
pub use crate::config::BatchConfig;
pub use crate::deserializer::{Deserialized, Deserializer, Json, JsonOptions, Raw, Text};
pub use crate::facade::{batch_request, submit, submit_with_transport, BatchRequest};
pub use crate::request::{delete, get, head, options, patch, post, put, Request, RequestSpec};
pub use crate::transport::{HttpTransport, Response, Transport, TransportConfig, TransportError};
pub use crate::{requests, Error, Result};
