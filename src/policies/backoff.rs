//! # Backoff policy for retrying tasks.
//!
//! [`BackoffPolicy`] maps a 1-based attempt number to the wait before the next attempt.
//!
//! | Variant       | `delay(n)` for `n >= 1`                               |
//! |---------------|-------------------------------------------------------|
//! | `None`        | `0`                                                   |
//! | `Fixed(d)`    | `d`                                                   |
//! | `Linear(d)`   | `n × d`                                               |
//! | `Exponential` | `min(first × factor^(n-1), max)`, then jitter applied |
//! | `Custom(f)`   | `f(n)`                                                |
//!
//! Attempt `0` is a sentinel and yields `Duration::ZERO` for every variant.
//!
//! The exponential base is derived purely from the attempt number, so jitter output
//! never feeds back into later calculations.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use tickvisor::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy::Exponential {
//!     first: Duration::from_millis(100),
//!     factor: 2.0,
//!     max: Duration::from_secs(10),
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(backoff.delay(0), Duration::ZERO);
//! assert_eq!(backoff.delay(1), Duration::from_millis(100));
//! assert_eq!(backoff.delay(2), Duration::from_millis(200));
//! // 100ms × 2^10 = 102_400ms → capped at max=10s
//! assert_eq!(backoff.delay(11), Duration::from_secs(10));
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// User-supplied backoff function (`attempt -> wait`).
pub type BackoffFn = Arc<dyn Fn(u32) -> Duration + Send + Sync>;

/// Retry backoff strategy.
#[derive(Clone)]
pub enum BackoffPolicy {
    /// Never wait between attempts.
    None,
    /// Constant wait regardless of attempt.
    Fixed(Duration),
    /// Wait grows by `increment` per attempt.
    Linear(Duration),
    /// Exponential growth capped at `max`, randomized by `jitter`.
    Exponential {
        /// Delay after the first failed attempt (before jitter).
        first: Duration,
        /// Multiplicative growth factor (`>= 1.0` recommended).
        factor: f64,
        /// Maximum delay cap, applied before jitter.
        max: Duration,
        /// Jitter policy to prevent thundering herd.
        jitter: JitterPolicy,
    },
    /// Arbitrary strategy.
    Custom(BackoffFn),
}

impl Default for BackoffPolicy {
    /// Returns `exponential(100ms, 1.5, 30s)` with equal jitter.
    fn default() -> Self {
        BackoffPolicy::exponential(Duration::from_millis(100), 1.5, Duration::from_secs(30))
    }
}

impl fmt::Debug for BackoffPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackoffPolicy::None => f.write_str("None"),
            BackoffPolicy::Fixed(d) => f.debug_tuple("Fixed").field(d).finish(),
            BackoffPolicy::Linear(d) => f.debug_tuple("Linear").field(d).finish(),
            BackoffPolicy::Exponential {
                first,
                factor,
                max,
                jitter,
            } => f
                .debug_struct("Exponential")
                .field("first", first)
                .field("factor", factor)
                .field("max", max)
                .field("jitter", jitter)
                .finish(),
            BackoffPolicy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl BackoffPolicy {
    /// Exponential backoff with [`JitterPolicy::Equal`].
    pub fn exponential(first: Duration, factor: f64, max: Duration) -> Self {
        BackoffPolicy::Exponential {
            first,
            factor,
            max,
            jitter: JitterPolicy::Equal,
        }
    }

    /// Wraps a closure as a [`BackoffPolicy::Custom`].
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        BackoffPolicy::Custom(Arc::new(f))
    }

    /// Computes the wait after the given 1-based attempt.
    ///
    /// # Notes
    /// - `attempt == 0` always yields zero.
    /// - Overflowing or non-finite exponential values clamp to `max`.
    /// - `Linear` saturates instead of overflowing.
    pub fn delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        match self {
            BackoffPolicy::None => Duration::ZERO,
            BackoffPolicy::Fixed(d) => *d,
            BackoffPolicy::Linear(increment) => increment.saturating_mul(attempt),
            BackoffPolicy::Exponential {
                first,
                factor,
                max,
                jitter,
            } => jitter.apply(exponential_base(*first, *factor, *max, attempt)),
            BackoffPolicy::Custom(f) => f(attempt),
        }
    }
}

/// `min(first × factor^(attempt-1), max)` without jitter.
fn exponential_base(first: Duration, factor: f64, max: Duration, attempt: u32) -> Duration {
    let exp = (attempt - 1).min(i32::MAX as u32) as i32;
    let nanos = first.as_nanos() as f64 * factor.powi(exp);

    if !nanos.is_finite() || nanos < 0.0 || nanos >= max.as_nanos() as f64 {
        max
    } else {
        Duration::from_nanos(nanos.round() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_exponential(first_ms: u64, factor: f64, max: Duration) -> BackoffPolicy {
        BackoffPolicy::Exponential {
            first: Duration::from_millis(first_ms),
            factor,
            max,
            jitter: JitterPolicy::None,
        }
    }

    #[test]
    fn attempt_zero_is_zero_for_all() {
        let policies = [
            BackoffPolicy::None,
            BackoffPolicy::Fixed(Duration::from_millis(10)),
            BackoffPolicy::Linear(Duration::from_millis(10)),
            BackoffPolicy::default(),
            BackoffPolicy::custom(|_| Duration::from_secs(1)),
        ];
        for p in policies {
            assert_eq!(p.delay(0), Duration::ZERO, "{p:?}");
        }
    }

    #[test]
    fn fixed_is_constant() {
        let p = BackoffPolicy::Fixed(Duration::from_millis(200));
        for n in 1..20 {
            assert_eq!(p.delay(n), Duration::from_millis(200));
        }
    }

    #[test]
    fn linear_grows_by_increment() {
        let p = BackoffPolicy::Linear(Duration::from_millis(50));
        assert_eq!(p.delay(1), Duration::from_millis(50));
        assert_eq!(p.delay(2), Duration::from_millis(100));
        assert_eq!(p.delay(7), Duration::from_millis(350));
    }

    #[test]
    fn linear_saturates() {
        let p = BackoffPolicy::Linear(Duration::MAX);
        assert_eq!(p.delay(3), Duration::MAX);
    }

    #[test]
    fn none_is_always_zero() {
        for n in 0..10 {
            assert_eq!(BackoffPolicy::None.delay(n), Duration::ZERO);
        }
    }

    #[test]
    fn exponential_growth_no_jitter() {
        let p = plain_exponential(100, 2.0, Duration::from_secs(30));
        assert_eq!(p.delay(1), Duration::from_millis(100));
        assert_eq!(p.delay(2), Duration::from_millis(200));
        assert_eq!(p.delay(3), Duration::from_millis(400));
        assert_eq!(p.delay(4), Duration::from_millis(800));
    }

    #[test]
    fn exponential_clamped_to_max() {
        let p = plain_exponential(100, 2.0, Duration::from_secs(1));
        assert_eq!(p.delay(10), Duration::from_secs(1));
        assert_eq!(p.delay(u32::MAX), Duration::from_secs(1));
    }

    #[test]
    fn first_exceeds_max() {
        let p = plain_exponential(10_000, 2.0, Duration::from_secs(5));
        assert_eq!(p.delay(1), Duration::from_secs(5));
    }

    #[test]
    fn exponential_with_jitter_never_exceeds_cap() {
        let cap = Duration::from_secs(2);
        let p = BackoffPolicy::exponential(Duration::from_millis(100), 2.0, cap);
        for n in 1..64 {
            let d = p.delay(n);
            assert!(d <= cap, "attempt {n}: {d:?} > {cap:?}");
        }
    }

    #[test]
    fn exponential_jitter_keeps_half() {
        let p =
            BackoffPolicy::exponential(Duration::from_millis(100), 2.0, Duration::from_secs(30));
        for _ in 0..100 {
            let d = p.delay(3);
            assert!(d >= Duration::from_millis(200));
            assert!(d < Duration::from_millis(400));
        }
    }

    #[test]
    fn custom_receives_attempt() {
        let p = BackoffPolicy::custom(|n| Duration::from_millis(u64::from(n) * 3));
        assert_eq!(p.delay(4), Duration::from_millis(12));
    }
}
