//! Tracing bootstrap for binaries, demos and tests.
//!
//! The library itself only emits `tracing` events (a `batch` span per dispatch with
//! `batch_id`, `strategy`, `transport` and `requests` fields). Installing a subscriber
//! is left to the application; [`init_tracing`] is a convenience for the common case.

use std::env;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "REQUESTS_BATCH_LOG";

/// Install a formatting subscriber filtered by `REQUESTS_BATCH_LOG`, then `RUST_LOG`,
/// then `info`.
///
/// Calling this more than once, or after another subscriber was installed, is a no-op.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .try_init();
}

fn env_filter() -> EnvFilter {
    [LOG_ENV, "RUST_LOG"]
        .iter()
        .filter_map(|key| env::var(key).ok())
        .find_map(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
