//! # Retry configuration.
//!
//! Provides [`RetryConfig`]: explicit settings for one retry loop.
//!
//! ## Sentinel values
//! - `with_max_attempts(0)` is ignored (keeps the previous value)
//! - `with_timeout(Duration::ZERO)` is ignored (no total timeout)
//! - `max_attempts = 0` set directly on the field is treated as `1`

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::Transient;
use crate::policies::BackoffPolicy;
use crate::retry::predicate::is_transient;

/// Observability hook: `(next attempt, last error, wait before it)`.
pub type OnRetry<E> = Arc<dyn Fn(u32, &E, Duration) + Send + Sync>;

/// Retryability predicate: `true` means "retry this error".
pub type RetryPredicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Configuration of a retry loop.
///
/// ## Field semantics
/// - `max_attempts`: total attempts including the first one (`>= 1`)
/// - `backoff`: wait after a failed attempt, indexed by the 1-based attempt number
/// - `on_retry`: called before each wait with the upcoming attempt number
/// - `timeout`: total budget for the whole loop (`None` = unbounded)
/// - `retry_if`: `None` retries every error; `Some(p)` retries only errors `p` approves
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use tickvisor::{BackoffPolicy, RetryConfig};
///
/// let cfg: RetryConfig<std::io::Error> = RetryConfig::default()
///     .with_max_attempts(5)
///     .with_backoff(BackoffPolicy::Fixed(Duration::from_millis(10)))
///     .with_timeout(Duration::from_secs(2))
///     .retry_transient();
///
/// assert_eq!(cfg.max_attempts, 5);
/// assert!(cfg.retry_if.is_some());
/// ```
pub struct RetryConfig<E> {
    /// Maximum number of attempts, including the initial one.
    pub max_attempts: u32,
    /// Wait strategy between attempts.
    pub backoff: BackoffPolicy,
    /// Optional hook invoked before each retry.
    pub on_retry: Option<OnRetry<E>>,
    /// Optional total timeout for all attempts and waits.
    pub timeout: Option<Duration>,
    /// Optional retryability predicate.
    pub retry_if: Option<RetryPredicate<E>>,
}

impl<E> RetryConfig<E> {
    /// Default config with the given backoff.
    pub fn from_backoff(backoff: BackoffPolicy) -> Self {
        Self {
            backoff,
            ..Self::default()
        }
    }

    /// Effective attempt count (`max_attempts` clamped to at least 1).
    #[inline]
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Sets the maximum number of attempts; `0` is ignored.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        if attempts > 0 {
            self.max_attempts = attempts;
        }
        self
    }

    /// Sets the backoff strategy.
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Sets the retry callback.
    pub fn with_on_retry<F>(mut self, f: F) -> Self
    where
        F: Fn(u32, &E, Duration) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(f));
        self
    }

    /// Sets the total timeout; `Duration::ZERO` is ignored.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if timeout > Duration::ZERO {
            self.timeout = Some(timeout);
        }
        self
    }

    /// Retries only the errors approved by `predicate`.
    pub fn with_retry_if<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.retry_if = Some(Arc::new(predicate));
        self
    }

    /// Retries only temporary or timeout errors (see [`is_transient`]).
    pub fn retry_transient(self) -> Self
    where
        E: Transient + 'static,
    {
        self.with_retry_if(is_transient::<E>)
    }
}

impl<E> Default for RetryConfig<E> {
    /// Default configuration:
    ///
    /// - `max_attempts = 3`
    /// - `backoff = BackoffPolicy::default()` (exponential 100ms × 1.5, capped at 30s, equal jitter)
    /// - no `on_retry`, no `timeout`, no `retry_if` (every error is retried)
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: BackoffPolicy::default(),
            on_retry: None,
            timeout: None,
            retry_if: None,
        }
    }
}

impl<E> Clone for RetryConfig<E> {
    fn clone(&self) -> Self {
        Self {
            max_attempts: self.max_attempts,
            backoff: self.backoff.clone(),
            on_retry: self.on_retry.clone(),
            timeout: self.timeout,
            retry_if: self.retry_if.clone(),
        }
    }
}

impl<E> fmt::Debug for RetryConfig<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryConfig")
            .field("max_attempts", &self.max_attempts)
            .field("backoff", &self.backoff)
            .field("on_retry", &self.on_retry.is_some())
            .field("timeout", &self.timeout)
            .field("retry_if", &self.retry_if.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg: RetryConfig<std::io::Error> = RetryConfig::default();
        assert_eq!(cfg.max_attempts, 3);
        assert!(cfg.timeout.is_none());
        assert!(cfg.retry_if.is_none());
        assert!(matches!(cfg.backoff, BackoffPolicy::Exponential { .. }));
    }

    #[test]
    fn zero_values_are_ignored() {
        let cfg: RetryConfig<std::io::Error> = RetryConfig::default()
            .with_max_attempts(0)
            .with_timeout(Duration::ZERO);
        assert_eq!(cfg.max_attempts, 3);
        assert!(cfg.timeout.is_none());
    }

    #[test]
    fn attempts_clamps_zero_field() {
        let mut cfg: RetryConfig<std::io::Error> = RetryConfig::default();
        cfg.max_attempts = 0;
        assert_eq!(cfg.attempts(), 1);
    }

    #[test]
    fn clone_shares_callbacks() {
        let cfg: RetryConfig<std::io::Error> =
            RetryConfig::default().with_on_retry(|_, _, _| {}).retry_transient();
        let copy = cfg.clone();
        assert!(copy.on_retry.is_some());
        assert!(copy.retry_if.is_some());
    }
}
