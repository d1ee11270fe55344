//! # Scheduler configuration.
//!
//! Provides [`SchedulerConfig`] settings for one [`Scheduler`](crate::Scheduler).
//!
//! ## Sentinel values
//! - `job_timeout = 0s` → no per-job timeout (see [`SchedulerConfig::job_timeout`])

use std::time::Duration;

use crate::policies::FailurePolicy;

/// Configuration of a scheduler.
///
/// ## Field semantics
/// - `name`: label attached to tick events
/// - `failure`: what a failing job does to its siblings within the tick
/// - `job_timeout`: per-job, per-tick timeout (`0s` = none)
///
/// ## Notes
/// All fields are public. Prefer the helper accessors over sprinkling sentinel
/// checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// Scheduler name used in logs.
    pub name: String,

    /// Sibling handling once a job fails within a tick.
    pub failure: FailurePolicy,

    /// Maximum run time of one job within one tick.
    ///
    /// - `Duration::ZERO` = no timeout
    /// - `> 0` = the job's token is cancelled and it fails with `JobError::Timeout`
    pub job_timeout: Duration,
}

impl SchedulerConfig {
    /// Returns the per-job timeout as an `Option`.
    #[inline]
    pub fn job_timeout(&self) -> Option<Duration> {
        if self.job_timeout == Duration::ZERO {
            None
        } else {
            Some(self.job_timeout)
        }
    }
}

impl Default for SchedulerConfig {
    /// Default configuration:
    ///
    /// - `name = "scheduler"`
    /// - `failure = FailurePolicy::RunAll`
    /// - `job_timeout = 0s` (no timeout)
    fn default() -> Self {
        Self {
            name: "scheduler".to_string(),
            failure: FailurePolicy::default(),
            job_timeout: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timeout_is_none() {
        let mut cfg = SchedulerConfig::default();
        assert_eq!(cfg.job_timeout(), None);

        cfg.job_timeout = Duration::from_millis(5);
        assert_eq!(cfg.job_timeout(), Some(Duration::from_millis(5)));
    }
}
