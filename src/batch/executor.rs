//! Batch executor: drives a session to completion under a strategy.

use super::{BatchSession, Outcome};
use crate::deserializer::Deserializer;
use crate::request::PreparedRequest;
use crate::transport::{Response, Transport};
use crate::{Error, ErrorContext, Result};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use tracing::{debug, info, info_span, warn, Span};
use uuid::Uuid;

/// Default in-flight limit for [`Strategy::BoundedConcurrent`].
pub const DEFAULT_MAX_DEGREE: usize = 3;

/// How a batch is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// One request at a time, in index order, on the calling thread.
    #[default]
    Sequential,
    /// Up to `max_degree` requests in flight at once on scoped worker threads.
    BoundedConcurrent { max_degree: NonZeroUsize },
}

impl Strategy {
    pub fn sequential() -> Self {
        Strategy::Sequential
    }

    /// Bounded concurrency with `max_degree` workers. Zero is rejected.
    pub fn bounded_concurrent(max_degree: usize) -> Result<Self> {
        let max_degree = NonZeroUsize::new(max_degree).ok_or_else(|| {
            Error::configuration_with_context(
                "max_degree must be at least 1",
                ErrorContext::new()
                    .with_field_path("strategy.max_degree")
                    .with_details("got 0")
                    .with_source("strategy_selector"),
            )
        })?;
        Ok(Strategy::BoundedConcurrent { max_degree })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::BoundedConcurrent { .. } => "bounded-concurrent",
        }
    }

    /// Maximum number of requests in flight at once.
    pub fn max_degree(&self) -> usize {
        match self {
            Strategy::Sequential => 1,
            Strategy::BoundedConcurrent { max_degree } => max_degree.get(),
        }
    }

    /// Dispatch every request, validate the batch, then deserialize each response in
    /// submission order.
    ///
    /// Returns [`Error::Batch`] if any request failed. In that case nothing is
    /// deserialized.
    pub fn execute<D: Deserializer>(
        &self,
        requests: Vec<PreparedRequest>,
        transport: &dyn Transport,
        deserializer: &D,
    ) -> Result<Vec<D::Output>> {
        let batch_id = Uuid::new_v4();
        let span = info_span!(
            "batch",
            %batch_id,
            strategy = self.name(),
            transport = transport.name(),
            requests = requests.len()
        );
        let _guard = span.enter();

        let session = BatchSession::new(requests);
        match self {
            Strategy::Sequential => run_sequential(&session, transport),
            Strategy::BoundedConcurrent { max_degree } => {
                run_bounded(&session, transport, *max_degree)
            }
        }

        let responses = match session.validate() {
            Ok(responses) => responses,
            Err(err) => {
                warn!(
                    failed = err.failed().len(),
                    missing = err.missing().len(),
                    elapsed_ms = u64::try_from(err.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "batch did not fully succeed"
                );
                return Err(err.into());
            }
        };
        info!(responses = responses.len(), "batch completed");

        debug!(deserializer = deserializer.name(), "deserializing responses");
        responses
            .into_iter()
            .map(|response| deserializer.deserialize(response))
            .collect()
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "sequence" => Ok(Strategy::Sequential),
            "bounded-concurrent" | "bounded_concurrent" | "concurrent" | "threaded" => {
                Strategy::bounded_concurrent(DEFAULT_MAX_DEGREE)
            }
            other => Err(Error::configuration_with_context(
                format!("unknown strategy '{}'", other),
                ErrorContext::new()
                    .with_field_path("strategy.kind")
                    .with_details("expected one of: sequential, bounded-concurrent")
                    .with_source("strategy_selector"),
            )),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Sequential => f.write_str("sequential"),
            Strategy::BoundedConcurrent { max_degree } => {
                write!(f, "bounded-concurrent({})", max_degree)
            }
        }
    }
}

/// Send one request and classify the result. Never fails: every error becomes an outcome.
pub(crate) fn send_one(
    transport: &dyn Transport,
    index: usize,
    request: &PreparedRequest,
) -> Outcome {
    debug!(index, %request, "dispatching request");
    match transport.send(request).and_then(Response::error_for_status) {
        Ok(response) => {
            debug!(index, status = %response.status(), "request succeeded");
            Outcome::Success(response)
        }
        Err(err) => {
            warn!(index, %request, class = err.class(), error = %err, "request failed");
            Outcome::Failure(err)
        }
    }
}

fn run_sequential(session: &BatchSession, transport: &dyn Transport) {
    for (index, request) in session.requests().iter().enumerate() {
        session.record(index, send_one(transport, index, request));
    }
}

fn run_bounded(session: &BatchSession, transport: &dyn Transport, max_degree: NonZeroUsize) {
    let total = session.len();
    let workers = max_degree.get().min(total);
    if workers == 0 {
        return;
    }

    let next = AtomicUsize::new(0);
    let span = Span::current();
    let worker = || {
        let _guard = span.enter();
        loop {
            let index = next.fetch_add(1, Ordering::Relaxed);
            if index >= total {
                break;
            }
            let outcome = send_one(transport, index, &session.requests()[index]);
            session.record(index, outcome);
        }
    };

    // The scope joins every worker before returning.
    thread::scope(|scope| {
        let mut spawned = 0;
        for id in 0..workers {
            match thread::Builder::new()
                .name(format!("batch-worker-{}", id))
                .spawn_scoped(scope, &worker)
            {
                Ok(_) => spawned += 1,
                Err(err) => warn!(worker = id, error = %err, "failed to spawn batch worker"),
            }
        }
        debug!(workers = spawned, "batch workers started");
        if spawned == 0 {
            worker();
        }
    });
}
