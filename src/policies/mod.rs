//! Retry and tick policies.
//!
//! This module groups the knobs that control **how long** to wait between retry
//! attempts and **what happens** to a tick once one of its jobs fails.
//!
//! ## Contents
//! - [`BackoffPolicy`] how retry delays evolve (none / fixed / linear / exponential / custom)
//! - [`JitterPolicy`]  randomization strategy to avoid thundering herd
//! - [`FailurePolicy`] run-all vs fail-fast within a scheduler tick
//!
//! ## Quick wiring
//! ```text
//! RetryConfig { backoff: BackoffPolicy, .. }
//!      └─► retry::executor uses backoff.delay(attempt) between attempts
//!
//! SchedulerConfig { failure: FailurePolicy, .. }
//!      └─► core::tick::run_tick decides whether a failure cancels siblings
//! ```
//!
//! ## Defaults
//! - `BackoffPolicy::default()` → exponential, first=100ms, factor=1.5, max=30s, jitter=Equal.
//! - `JitterPolicy::Equal`.
//! - `FailurePolicy::RunAll`.

mod backoff;
mod failure;
mod jitter;

pub use backoff::{BackoffFn, BackoffPolicy};
pub use failure::FailurePolicy;
pub use jitter::JitterPolicy;
