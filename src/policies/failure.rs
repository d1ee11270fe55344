//! # Failure policy for a scheduler tick.
//!
//! [`FailurePolicy`] decides what happens to the other jobs of a tick once one of them fails.
//!
//! ```text
//! RunAll    → every job runs to completion, failures are collected (default)
//! FailFast  → the first failure cancels the tick's shared token;
//!             jobs observing it may return early
//! ```
//!
//! Under both policies the tick succeeds iff zero jobs failed, and the
//! scheduler keeps ticking.

/// Policy controlling sibling jobs after a failure within one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// All jobs run to completion; errors are collected (default).
    #[default]
    RunAll,
    /// The first failure cancels the tick token shared by that tick's jobs.
    FailFast,
}

impl FailurePolicy {
    /// `true` for [`FailurePolicy::FailFast`].
    pub fn cancels_siblings(&self) -> bool {
        matches!(self, FailurePolicy::FailFast)
    }
}
