//! Retry executor.
//!
//! A reusable primitive that makes a fallible async operation resilient. It holds no
//! state across calls; jitter draws from a thread-local generator.
//!
//! ## Contents
//! - [`execute_sync`] / [`execute_sync_with_predicate`] await the retry loop in place
//! - [`execute_async`] runs it on a spawned task with single-fire [`Callbacks`]
//! - [`RetryConfig`] attempts, backoff, timeout, hook and predicate
//! - [`is_transient`] default retryability predicate
//!
//! ## Two call modes
//! ```text
//! retry_if = None     → every error is retried until attempts run out
//! retry_if = Some(p)  → an error p rejects is returned immediately
//! ```

mod config;
mod executor;
mod predicate;

pub use config::{OnRetry, RetryConfig, RetryPredicate};
pub use executor::{Callbacks, execute_async, execute_sync, execute_sync_with_predicate};
pub use predicate::is_transient;
