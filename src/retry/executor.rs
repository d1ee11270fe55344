//! # Retry loop and its sync/async entry points.
//!
//! ## Flow
//! ```text
//! scope = caller token (+ deadline if cfg.timeout)
//!
//! for attempt in 1..=max_attempts {
//!   ├─► scope cancelled?        → Err(Canceled)
//!   ├─► deadline passed?        → Err(DeadlineExceeded)
//!   ├─► task().await
//!   │     ├─ Ok(v)              → Ok(v)
//!   │     └─ Err(e)
//!   │          ├─ predicate rejects e → Err(Task { attempt, e })
//!   │          ├─ last attempt        → Err(Task { attempt, e })
//!   │          ├─ wait = backoff.delay(attempt)
//!   │          ├─ on_retry(attempt + 1, &e, wait)
//!   │          └─ sleep(wait) ⟷ cancel ⟷ deadline (first wins)
//! }
//! ```
//!
//! ## Rules
//! - Attempts are numbered from 1; no wait follows the final attempt.
//! - The task itself is never interrupted: cancellation and the deadline are
//!   observed before each attempt and during waits.
//! - The *last* task error is returned, never an aggregate.

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::core::panic_message;
use crate::error::RetryError;
use crate::retry::config::RetryConfig;

type Predicate<'a, E> = Option<&'a (dyn Fn(&E) -> bool + Send + Sync)>;

/// Runs `task` with retries, returning its value or the reason the loop stopped.
///
/// Uses `cfg.retry_if` as the retryability predicate (`None` retries everything).
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use tickvisor::{execute_sync, BackoffPolicy, RetryConfig};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let ctx = CancellationToken::new();
/// let cfg = RetryConfig::from_backoff(BackoffPolicy::Fixed(Duration::from_millis(1)));
///
/// let mut calls = 0;
/// let res = execute_sync(&ctx, || {
///     calls += 1;
///     let n = calls;
///     async move { if n < 2 { Err("flaky") } else { Ok(n) } }
/// }, &cfg).await;
///
/// assert_eq!(res.unwrap(), 2);
/// # }
/// ```
pub async fn execute_sync<T, E, F, Fut>(
    ctx: &CancellationToken,
    task: F,
    cfg: &RetryConfig<E>,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    retry_loop(ctx, task, cfg, cfg.retry_if.as_deref()).await
}

/// Like [`execute_sync`], but only errors approved by `predicate` are retried.
///
/// `predicate` overrides `cfg.retry_if`. Pass [`is_transient`](crate::is_transient)
/// for the default "temporary or timeout" classification.
pub async fn execute_sync_with_predicate<T, E, F, Fut, P>(
    ctx: &CancellationToken,
    task: F,
    predicate: P,
    cfg: &RetryConfig<E>,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool + Send + Sync,
{
    let predicate: &(dyn Fn(&E) -> bool + Send + Sync) = &predicate;
    retry_loop(ctx, task, cfg, Some(predicate)).await
}

/// Runs the retry loop on a spawned task and reports the outcome through `callbacks`.
///
/// Exactly one of [`Callbacks::on_success`] / [`Callbacks::on_failure`] is invoked,
/// exactly once. A panicking task is reported as [`RetryError::Panicked`].
/// The returned handle resolves after the callback has run.
pub fn execute_async<T, E, F, Fut>(
    ctx: CancellationToken,
    task: F,
    callbacks: Callbacks<T, E>,
    cfg: RetryConfig<E>,
) -> JoinHandle<()>
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    tokio::spawn(async move {
        let run = retry_loop(&ctx, task, &cfg, cfg.retry_if.as_deref());
        let res = match AssertUnwindSafe(run).catch_unwind().await {
            Ok(res) => res,
            Err(panic_err) => Err(RetryError::Panicked {
                reason: panic_message(panic_err.as_ref()),
            }),
        };
        callbacks.complete(res);
    })
}

/// Completion callbacks for [`execute_async`].
///
/// Both are optional; a missing callback is skipped. [`Callbacks::complete`] consumes
/// the value, so at most one callback can ever fire.
pub struct Callbacks<T, E> {
    on_success: Option<Box<dyn FnOnce(T) + Send>>,
    on_failure: Option<Box<dyn FnOnce(RetryError<E>) + Send>>,
}

impl<T, E> Callbacks<T, E> {
    /// No callbacks.
    pub fn new() -> Self {
        Self {
            on_success: None,
            on_failure: None,
        }
    }

    /// Called with the task's value when the loop succeeds.
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: FnOnce(T) + Send + 'static,
    {
        self.on_success = Some(Box::new(f));
        self
    }

    /// Called with the terminal error when the loop fails.
    pub fn on_failure<F>(mut self, f: F) -> Self
    where
        F: FnOnce(RetryError<E>) + Send + 'static,
    {
        self.on_failure = Some(Box::new(f));
        self
    }

    /// Fires the callback matching `res`.
    pub fn complete(self, res: Result<T, RetryError<E>>) {
        match res {
            Ok(v) => {
                if let Some(f) = self.on_success {
                    f(v);
                }
            }
            Err(e) => {
                if let Some(f) = self.on_failure {
                    f(e);
                }
            }
        }
    }
}

impl<T, E> Default for Callbacks<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for Callbacks<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_success", &self.on_success.is_some())
            .field("on_failure", &self.on_failure.is_some())
            .finish()
    }
}

/// Cancellation scope of one retry loop: a child of the caller's token plus an
/// optional deadline derived from the total timeout.
struct Scope {
    token: CancellationToken,
    deadline: Option<(Instant, Duration)>,
}

impl Scope {
    /// A timeout too large to be represented as an `Instant` means no deadline.
    fn new(parent: &CancellationToken, timeout: Option<Duration>) -> Self {
        Self {
            token: parent.child_token(),
            deadline: timeout
                .filter(|d| *d > Duration::ZERO)
                .and_then(|d| Instant::now().checked_add(d).map(|at| (at, d))),
        }
    }

    /// Non-blocking check performed before each attempt.
    fn check<E>(&self) -> Result<(), RetryError<E>> {
        if self.token.is_cancelled() {
            return Err(RetryError::Canceled);
        }
        match self.deadline {
            Some((at, timeout)) if Instant::now() >= at => {
                Err(RetryError::DeadlineExceeded { timeout })
            }
            _ => Ok(()),
        }
    }

    /// Sleeps for `wait` unless cancellation or the deadline comes first.
    async fn wait<E>(&self, wait: Duration) -> Result<(), RetryError<E>> {
        let expired = async {
            match self.deadline {
                Some((at, timeout)) => {
                    time::sleep_until(at).await;
                    timeout
                }
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(RetryError::Canceled),
            timeout = expired => Err(RetryError::DeadlineExceeded { timeout }),
            _ = time::sleep(wait) => Ok(()),
        }
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn retry_loop<T, E, F, Fut>(
    ctx: &CancellationToken,
    mut task: F,
    cfg: &RetryConfig<E>,
    should_retry: Predicate<'_, E>,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let scope = Scope::new(ctx, cfg.timeout);
    let max_attempts = cfg.attempts();
    let mut attempt: u32 = 0;

    loop {
        scope.check::<E>()?;

        attempt += 1;
        let error = match task().await {
            Ok(v) => return Ok(v),
            Err(e) => e,
        };

        if should_retry.is_some_and(|retry| !retry(&error)) {
            tracing::debug!(attempt, "error rejected by retry predicate");
            return Err(RetryError::Task { attempt, error });
        }
        if attempt >= max_attempts {
            return Err(RetryError::Task { attempt, error });
        }

        let wait = cfg.backoff.delay(attempt);
        if let Some(on_retry) = &cfg.on_retry {
            on_retry(attempt + 1, &error, wait);
        }
        drop(error);

        tracing::trace!(attempt, ?wait, "retry scheduled");
        scope.wait::<E>(wait).await?;
    }
}
