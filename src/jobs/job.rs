//! # Job abstraction.
//!
//! This module defines the [`Job`] trait: a named unit of work run once per scheduler tick.
//! The common handle type is [`JobRef`](crate::JobRef), an `Arc<dyn Job>`.
//!
//! A job receives a [`CancellationToken`] and should check it to stop cooperatively
//! when the scheduler stops, when its timeout fires, or when a sibling fails under
//! [`FailurePolicy::FailFast`](crate::FailurePolicy::FailFast).

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::JobError;

/// # Asynchronous, cancelable unit of scheduled work.
///
/// Jobs carry no scheduling state: timing lives in the scheduler.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use tickvisor::{Job, JobError};
///
/// struct Heartbeat;
///
/// #[async_trait]
/// impl Job for Heartbeat {
///     fn name(&self) -> &str { "heartbeat" }
///
///     async fn run(&self, ctx: CancellationToken) -> Result<(), JobError> {
///         if ctx.is_cancelled() {
///             return Err(JobError::Canceled);
///         }
///         // do work...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Job: Send + Sync + 'static {
    /// Returns a stable, human-readable job name.
    fn name(&self) -> &str;

    /// Runs the job once for the current tick.
    ///
    /// Implementations should check `ctx.is_cancelled()` and exit quickly.
    async fn run(&self, ctx: CancellationToken) -> Result<(), JobError>;
}
