//! Per-batch state: prepared requests and their index-aligned outcomes.

use super::{BatchError, Outcome};
use crate::request::PreparedRequest;
use crate::transport::Response;
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use tracing::debug;

/// Requests and outcomes of one batch, index-aligned.
///
/// Outcome slots are write-once cells, so workers may record through a shared
/// reference. No slot is read before [`BatchSession::validate`] consumes the
/// session.
pub struct BatchSession {
    requests: Vec<PreparedRequest>,
    outcomes: Vec<OnceLock<Outcome>>,
    started: Instant,
}

impl BatchSession {
    pub fn new(requests: Vec<PreparedRequest>) -> Self {
        let outcomes = requests.iter().map(|_| OnceLock::new()).collect();
        Self {
            requests,
            outcomes,
            started: Instant::now(),
        }
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

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Number of slots that have been written.
    pub fn recorded(&self) -> usize {
        self.outcomes.iter().filter(|slot| slot.get().is_some()).count()
    }

    /// Record the outcome for `index`.
    ///
    /// # Panics
    ///
    /// If `index` is out of range or its outcome was already recorded. Each index
    /// has exactly one producer.
    pub fn record(&self, index: usize, outcome: Outcome) {
        let label = outcome.label();
        if self.outcomes[index].set(outcome).is_err() {
            panic!("outcome for request {} recorded twice", index);
        }
        debug!(index, outcome = label, "outcome recorded");
    }

    /// Partition outcomes and return the successful responses in index order.
    ///
    /// Any failed or still-pending index turns the whole batch into a
    /// [`BatchError`] holding every request and outcome.
    pub fn validate(self) -> Result<Vec<Response>, BatchError> {
        let elapsed = self.started.elapsed();
        let outcomes: Vec<Outcome> = self
            .outcomes
            .into_iter()
            .map(|slot| slot.into_inner().unwrap_or_default())
            .collect();

        let mut accepted = Vec::new();
        let mut missing = Vec::new();
        let mut failed = Vec::new();
        for (index, outcome) in outcomes.iter().enumerate() {
            match outcome {
                Outcome::Success(_) => accepted.push(index),
                Outcome::Pending => missing.push(index),
                Outcome::Failure(_) => failed.push(index),
            }
        }
        debug!(
            accepted = accepted.len(),
            missing = missing.len(),
            failed = failed.len(),
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "batch validated"
        );

        if missing.is_empty() && failed.is_empty() {
            return Ok(outcomes
                .into_iter()
                .filter_map(Outcome::into_response)
                .collect());
        }

        Err(BatchError::new(
            self.requests,
            outcomes,
            accepted,
            missing,
            failed,
            elapsed,
        ))
    }
}
