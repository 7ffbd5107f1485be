//! # Batch Dispatch Module
//!
//! This module is the dispatch and aggregation engine. It sends N independent
//! requests, records one outcome per request, and turns the result into either
//! N ordered values or one aggregate error.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Outcome`] | Per-request slot: `Pending`, `Success(Response)` or `Failure(TransportError)` |
//! | [`BatchSession`] | Index-aligned requests and write-once outcome slots |
//! | [`BatchError`] | Snapshot of a batch with any failed or missing request |
//! | [`Strategy`] | Execution strategy (Sequential, BoundedConcurrent) |
//!
//! ## Strategies
//!
//! - **Sequential**: one request at a time on the calling thread, in index order
//! - **BoundedConcurrent**: up to `max_degree` scoped workers pull the next
//!   undispatched index; the call returns once every worker has joined
//!
//! Results are in submission order under both strategies, whatever the
//! completion order.
//!
//! ## Example
//!
//! ```rust
//! use requests_batch::batch::Strategy;
//!
//! let strategy: Strategy = "bounded-concurrent".parse().unwrap();
//! assert_eq!(strategy.max_degree(), 3);
//! assert!(Strategy::bounded_concurrent(0).is_err());
//! ```

mod error;
mod executor;
mod outcome;
mod session;

pub use error::BatchError;
pub use executor::{Strategy, DEFAULT_MAX_DEGREE};
pub use outcome::Outcome;
pub use session::BatchSession;
