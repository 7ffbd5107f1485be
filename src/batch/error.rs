//! Aggregate batch failure.

use super::Outcome;
use crate::request::PreparedRequest;
use crate::transport::{Response, TransportError};
use std::fmt;
use std::time::Duration;

/// Snapshot of a batch that did not fully succeed.
///
/// `accepted`, `missing` and `failed` partition `0..requests().len()`. Each
/// index appears in exactly one of them.
#[derive(Debug)]
pub struct BatchError {
    requests: Vec<PreparedRequest>,
    outcomes: Vec<Outcome>,
    accepted: Vec<usize>,
    missing: Vec<usize>,
    failed: Vec<usize>,
    elapsed: Duration,
}

impl BatchError {
    pub(crate) fn new(
        requests: Vec<PreparedRequest>,
        outcomes: Vec<Outcome>,
        accepted: Vec<usize>,
        missing: Vec<usize>,
        failed: Vec<usize>,
        elapsed: Duration,
    ) -> Self {
        Self {
            requests,
            outcomes,
            accepted,
            missing,
            failed,
            elapsed,
        }
    }

    pub fn requests(&self) -> &[PreparedRequest] {
        &self.requests
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Indices that succeeded.
    pub fn accepted(&self) -> &[usize] {
        &self.accepted
    }

    /// Indices never attempted.
    pub fn missing(&self) -> &[usize] {
        &self.missing
    }

    /// Indices that failed.
    pub fn failed(&self) -> &[usize] {
        &self.failed
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn outcome(&self, index: usize) -> Option<&Outcome> {
        self.outcomes.get(index)
    }

    /// Failed requests with their errors, in index order.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &PreparedRequest, &TransportError)> {
        self.failed.iter().filter_map(move |&i| {
            self.outcomes[i]
                .error()
                .map(|err| (i, &self.requests[i], err))
        })
    }

    /// Successful responses with their index, in index order.
    pub fn successes(&self) -> impl Iterator<Item = (usize, &Response)> {
        self.accepted
            .iter()
            .filter_map(move |&i| self.outcomes[i].response().map(|resp| (i, resp)))
    }

    /// Requests that failed or were never attempted, in index order, ready to re-submit.
    pub fn unresolved_requests(&self) -> Vec<PreparedRequest> {
        let mut indices: Vec<usize> = self.failed.iter().chain(&self.missing).copied().collect();
        indices.sort_unstable();
        indices
            .into_iter()
            .map(|i| self.requests[i].clone())
            .collect()
    }

    /// Take the requests and outcomes apart.
    pub fn into_parts(self) -> (Vec<PreparedRequest>, Vec<Outcome>) {
        (self.requests, self.outcomes)
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} requests did not succeed (failed: {:?}, missing: {:?})",
            self.failed.len() + self.missing.len(),
            self.requests.len(),
            self.failed,
            self.missing
        )?;
        if let Some((index, request, err)) = self.failures().next() {
            write!(f, "; first failure at {} [{}]: {}", index, request, err)?;
        }
        Ok(())
    }
}

impl std::error::Error for BatchError {}
