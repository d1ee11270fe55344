//! # Jitter policy for retry delays.
//!
//! [`JitterPolicy`] adds randomness to backoff delays to prevent thundering herd effects
//! when multiple callers retry simultaneously.
//!
//! - [`JitterPolicy::None`] - no randomization, predictable delays
//! - [`JitterPolicy::Full`] - random delay in [0, delay)
//! - [`JitterPolicy::Equal`] - delay/2 + random[0, delay)/2 (default for exponential backoff)

use rand::Rng;
use std::time::Duration;

/// Policy controlling randomization of retry delays.
///
/// ## Trade-offs
/// - **None**: Predictable, but risks thundering herd
/// - **Full**: Maximum randomness, may shrink the wait to nearly zero
/// - **Equal**: Halves the worst case while keeping at least half of the delay
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// No jitter: use exact backoff delay.
    None,

    /// Full jitter: random delay in `[0, delay)`.
    Full,

    /// Equal jitter: `delay/2 + j/2` with `j` uniform in `[0, delay)`.
    ///
    /// The result always lies in `[delay/2, delay)`.
    #[default]
    Equal,
}

impl JitterPolicy {
    /// Applies jitter to the given delay.
    ///
    /// `rand::rng()` is a thread-local generator, so concurrent callers never
    /// contend on a shared source.
    pub fn apply(&self, delay: Duration) -> Duration {
        match self {
            JitterPolicy::None => delay,
            JitterPolicy::Full => Duration::from_nanos(sample_below(delay)),
            JitterPolicy::Equal => {
                let nanos = clamp_nanos(delay);
                Duration::from_nanos(nanos / 2 + sample_below(delay) / 2)
            }
        }
    }
}

/// Uniform sample in `[0, delay)` in nanoseconds; zero for a zero delay.
fn sample_below(delay: Duration) -> u64 {
    let nanos = clamp_nanos(delay);
    if nanos == 0 {
        return 0;
    }
    rand::rng().random_range(0..nanos)
}

fn clamp_nanos(delay: Duration) -> u64 {
    delay.as_nanos().min(u128::from(u64::MAX)) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_identity() {
        let d = Duration::from_millis(250);
        assert_eq!(JitterPolicy::None.apply(d), d);
    }

    #[test]
    fn zero_delay_stays_zero() {
        for policy in [JitterPolicy::None, JitterPolicy::Full, JitterPolicy::Equal] {
            assert_eq!(policy.apply(Duration::ZERO), Duration::ZERO);
        }
    }

    #[test]
    fn equal_jitter_bounds() {
        let d = Duration::from_millis(1000);
        for _ in 0..200 {
            let got = JitterPolicy::Equal.apply(d);
            assert!(got >= Duration::from_millis(500), "{got:?} below half");
            assert!(got < d, "{got:?} not below delay");
        }
    }

    #[test]
    fn full_jitter_bounds() {
        let d = Duration::from_millis(1000);
        for _ in 0..200 {
            assert!(JitterPolicy::Full.apply(d) < d);
        }
    }

    #[test]
    fn one_nanosecond_delay() {
        let d = Duration::from_nanos(1);
        assert_eq!(JitterPolicy::Full.apply(d), Duration::ZERO);
        assert_eq!(JitterPolicy::Equal.apply(d), Duration::ZERO);
    }
}
