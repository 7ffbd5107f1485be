//! Batch facade: the entry points applications call.
//!
//! - [`batch_request`]: typed deserializer, default HTTP transport.
//! - [`submit`] / [`submit_with_transport`]: configuration-driven, with string selectors.
//! - [`BatchRequest`]: accumulate requests, then send them together.
//!
//! Selectors are resolved first. Nested request specs are then flattened depth-first
//! and every request is prepared. Dispatch starts only after both steps succeed, so
//! a bad selector or a bad URL never costs a network round-trip.

pub mod prelude;

use crate::batch::Strategy;
use crate::config::BatchConfig;
use crate::deserializer::{Deserialized, Deserializer, Raw};
use crate::request::{PreparedRequest, Request, RequestSpec};
use crate::transport::{HttpTransport, Transport};
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;

/// Builder that collects requests and sends them as one batch.
pub struct BatchRequest<D = Raw> {
    requests: Vec<PreparedRequest>,
    deserializer: D,
    strategy: Strategy,
    transport: Arc<dyn Transport>,
}

impl BatchRequest<Raw> {
    /// Empty batch: sequential strategy, pass-through deserializer, default HTTP transport.
    pub fn new() -> Self {
        Self {
            requests: Vec::new(),
            deserializer: Raw,
            strategy: Strategy::default(),
            transport: Arc::new(HttpTransport::default()),
        }
    }
}

impl Default for BatchRequest<Raw> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Deserializer> BatchRequest<D> {
    pub fn with_deserializer<E: Deserializer>(self, deserializer: E) -> BatchRequest<E> {
        BatchRequest {
            requests: self.requests,
            deserializer,
            strategy: self.strategy,
            transport: self.transport,
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Prepare and append one request.
    pub fn add(&mut self, request: Request) -> Result<&PreparedRequest> {
        let prepared = request.prepare()?;
        let index = self.requests.len();
        self.requests.push(prepared);
        Ok(&self.requests[index])
    }

    /// Prepare and append several requests. If any of them fails to prepare,
    /// none is added.
    pub fn add_range(&mut self, requests: impl IntoIterator<Item = Request>) -> Result<usize> {
        let prepared = requests
            .into_iter()
            .map(|request| request.prepare())
            .collect::<Result<Vec<_>>>()?;
        let added = prepared.len();
        self.requests.extend(prepared);
        Ok(added)
    }

    /// Flatten a (possibly nested) spec and append it.
    pub fn add_spec(&mut self, spec: impl Into<RequestSpec>) -> Result<usize> {
        self.add_range(spec.into().flatten())
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn requests(&self) -> &[PreparedRequest] {
        &self.requests
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Dispatch the batch and block until every request has an outcome.
    pub fn send(self) -> Result<Vec<D::Output>> {
        self.strategy
            .execute(self.requests, self.transport.as_ref(), &self.deserializer)
    }

    /// [`send`](Self::send) on tokio's blocking pool.
    pub async fn send_async(self) -> Result<Vec<D::Output>>
    where
        D: 'static,
        D::Output: Send + 'static,
    {
        tokio::task::spawn_blocking(move || self.send())
            .await
            .map_err(|e| {
                Error::runtime_with_context(
                    "batch task did not complete",
                    ErrorContext::new()
                        .with_details(e.to_string())
                        .with_source("send_async"),
                )
            })?
    }
}

/// Send a batch with a typed deserializer over the default HTTP transport.
///
/// ```rust,no_run
/// use requests_batch::{batch_request, get, requests, Json, Strategy};
///
/// let bodies: Vec<serde_json::Value> = batch_request(
///     requests![get("https://example.com/a"), [get("https://example.com/b")]],
///     Json::<serde_json::Value>::new(),
///     Strategy::bounded_concurrent(2)?,
/// )?;
/// # Ok::<(), requests_batch::Error>(())
/// ```
pub fn batch_request<D: Deserializer>(
    spec: impl Into<RequestSpec>,
    deserializer: D,
    strategy: Strategy,
) -> Result<Vec<D::Output>> {
    let mut batch = BatchRequest::new()
        .with_deserializer(deserializer)
        .with_strategy(strategy);
    batch.add_spec(spec)?;
    batch.send()
}

/// Send a batch selected by configuration over the HTTP transport it describes.
pub fn submit(spec: impl Into<RequestSpec>, config: &BatchConfig) -> Result<Vec<Deserialized>> {
    let (strategy, deserializer) = config.resolve()?;
    let transport = Arc::new(config.http_transport()?);
    dispatch(spec.into(), strategy, deserializer, transport)
}

/// [`submit`] with a caller-supplied transport. `config.transport` is ignored.
pub fn submit_with_transport(
    spec: impl Into<RequestSpec>,
    config: &BatchConfig,
    transport: Arc<dyn Transport>,
) -> Result<Vec<Deserialized>> {
    let (strategy, deserializer) = config.resolve()?;
    dispatch(spec.into(), strategy, deserializer, transport)
}

fn dispatch<D: Deserializer>(
    spec: RequestSpec,
    strategy: Strategy,
    deserializer: D,
    transport: Arc<dyn Transport>,
) -> Result<Vec<D::Output>> {
    let mut batch = BatchRequest::new()
        .with_deserializer(deserializer)
        .with_strategy(strategy)
        .with_transport(transport);
    batch.add_spec(spec)?;
    batch.send()
}
