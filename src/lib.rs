//! # requests-batch
//!
//! Send a batch of independent HTTP requests and get back either every response, in
//! submission order, or a single aggregate error describing what went wrong.
//!
//! ## Overview
//!
//! A batch is N prepared requests plus N outcome slots. A [`Strategy`] dispatches
//! the requests through a [`Transport`] and records one [`Outcome`] per request.
//! When every request has finished, the batch is validated:
//!
//! - all succeeded: each response goes through the [`Deserializer`] and the values
//!   are returned in submission order
//! - anything failed or is missing: an [`Error::Batch`] carrying a [`BatchError`] that
//!   partitions the indices into accepted, failed and missing sets
//!
//! ## Key Features
//!
//! - **Two strategies**: sequential, or bounded concurrency (default degree 3)
//! - **Pluggable deserializers**: pass-through, JSON, text and (with the `markup`
//!   feature) parsed HTML
//! - **Nested request specs**: groups are flattened depth-first with the [`requests!`] macro
//! - **Configuration-driven selection**: string selectors from YAML or the environment
//!   via [`BatchConfig`]; unknown names fail before any network call
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use requests_batch::{batch_request, get, requests, Json, Strategy};
//!
//! fn main() -> requests_batch::Result<()> {
//!     requests_batch::telemetry::init_tracing();
//!
//!     let users: Vec<serde_json::Value> = batch_request(
//!         requests![
//!             get("https://api.example.com/users/1"),
//!             [get("https://api.example.com/users/2"), get("https://api.example.com/users/3")],
//!         ],
//!         Json::<serde_json::Value>::new(),
//!         Strategy::bounded_concurrent(3)?,
//!     )?;
//!     assert_eq!(users.len(), 3);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`batch`] | Outcomes, sessions, strategies and the aggregate error |
//! | [`request`] | Request builders, prepared requests and nested specs |
//! | [`transport`] | Transport trait, buffered responses and the HTTP transport |
//! | [`deserializer`] | Response deserializers and the selector set |
//! | [`config`] | YAML/env batch configuration |
//! | [`facade`] | Entry points: [`batch_request`], [`submit`], [`BatchRequest`] |
//! | [`telemetry`] | Tracing subscriber bootstrap |

pub mod batch;
pub mod config;
pub mod deserializer;
pub mod facade;
pub mod request;
pub mod telemetry;
pub mod transport;

pub use facade::prelude;

// Re-export main types for convenience
pub use batch::{BatchError, BatchSession, Outcome, Strategy, DEFAULT_MAX_DEGREE};
pub use config::BatchConfig;
pub use deserializer::{
    AnyDeserializer, Deserialized, Deserializer, DeserializerKind, Json, JsonOptions,
    MarkupOptions, Raw, Text,
};
pub use facade::{batch_request, submit, submit_with_transport, BatchRequest};
pub use request::{
    delete, get, head, options, patch, post, put, PreparedRequest, Request, RequestSpec,
};
pub use transport::{HttpTransport, Response, Transport, TransportConfig, TransportError};

#[cfg(feature = "markup")]
pub use deserializer::Markup;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
