//! Error types used by jobs and the retry executor.
//!
//! This module defines two main error enums:
//!
//! - [`JobError`]: errors returned by scheduled jobs.
//! - [`RetryError`]: the outcome of a failed retry loop.
//!
//! It also defines [`Transient`], the capability markers ("temporary", "timeout")
//! inspected by the default retryability predicate
//! [`is_transient`](crate::is_transient).

use std::io;
use std::time::Duration;

use thiserror::Error;

/// # Errors produced by job execution.
///
/// Some errors are retryable (`Timeout`, `Fail`), others are considered fatal.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum JobError {
    /// Job execution exceeded its timeout duration.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The timeout duration that was exceeded.
        timeout: Duration,
    },

    /// Non-recoverable fatal error (should not be retried).
    #[error("fatal error (no retry): {reason}")]
    Fatal {
        /// The underlying error message.
        reason: String,
    },

    /// Job execution failed but may succeed if retried.
    #[error("execution failed: {reason}")]
    Fail {
        /// The underlying error message.
        reason: String,
    },

    /// Job was cancelled through its context.
    #[error("context cancelled")]
    Canceled,
}

impl JobError {
    /// Shorthand for [`JobError::Fail`].
    pub fn fail(reason: impl Into<String>) -> Self {
        JobError::Fail {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`JobError::Fatal`].
    pub fn fatal(reason: impl Into<String>) -> Self {
        JobError::Fatal {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use tickvisor::JobError;
    /// use std::time::Duration;
    ///
    /// let err = JobError::Timeout { timeout: Duration::from_secs(1) };
    /// assert_eq!(err.as_label(), "job_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            JobError::Timeout { .. } => "job_timeout",
            JobError::Fatal { .. } => "job_fatal",
            JobError::Fail { .. } => "job_failed",
            JobError::Canceled => "job_canceled",
        }
    }

    /// Indicates whether the error type is safe to retry.
    ///
    /// Returns `true` for [`JobError::Fail`] and [`JobError::Timeout`],
    /// `false` otherwise.
    ///
    /// # Example
    /// ```
    /// use tickvisor::JobError;
    ///
    /// assert!(JobError::fail("boom").is_retryable());
    /// assert!(!JobError::fatal("nope").is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(self, JobError::Fail { .. } | JobError::Timeout { .. })
    }
}

/// # Outcome of a retry loop that did not produce a value.
///
/// Cancellation and deadline expiry have distinct identities so callers can
/// tell "I gave up" apart from "the operation failed".
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RetryError<E> {
    /// The caller's cancellation token fired.
    #[error("context cancelled")]
    Canceled,

    /// The configured total timeout elapsed.
    #[error("deadline exceeded after {timeout:?}")]
    DeadlineExceeded {
        /// The configured total timeout.
        timeout: Duration,
    },

    /// The task failed and was not retried further: either attempts were
    /// exhausted or the predicate rejected the error. Carries the last error.
    #[error("attempt {attempt} failed: {error}")]
    Task {
        /// 1-based number of the attempt that produced `error`.
        attempt: u32,
        /// The last error returned by the task.
        #[source]
        error: E,
    },

    /// The task panicked inside [`execute_async`](crate::execute_async).
    #[error("task panicked: {reason}")]
    Panicked {
        /// Panic payload rendered as text.
        reason: String,
    },
}

impl<E> RetryError<E> {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RetryError::Canceled => "retry_canceled",
            RetryError::DeadlineExceeded { .. } => "retry_deadline_exceeded",
            RetryError::Task { .. } => "retry_task_failed",
            RetryError::Panicked { .. } => "retry_task_panicked",
        }
    }

    /// `true` if the loop stopped because the caller cancelled.
    pub fn is_canceled(&self) -> bool {
        matches!(self, RetryError::Canceled)
    }

    /// `true` if the loop stopped because the total timeout elapsed.
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, RetryError::DeadlineExceeded { .. })
    }

    /// Returns the last task error, if the loop ended on one.
    pub fn into_task_error(self) -> Option<E> {
        match self {
            RetryError::Task { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Borrowing variant of [`into_task_error`](Self::into_task_error).
    pub fn task_error(&self) -> Option<&E> {
        match self {
            RetryError::Task { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Capability markers for transient errors.
///
/// The default retryability predicate ([`is_transient`](crate::is_transient))
/// retries an error only if it reports itself as temporary or as a timeout.
/// Both markers default to `false`, so implementing the trait with an empty
/// body declares an error as never retryable.
///
/// # Example
/// ```
/// use tickvisor::{Transient, is_transient};
///
/// #[derive(Debug)]
/// struct Busy;
///
/// impl Transient for Busy {
///     fn is_temporary(&self) -> bool { true }
/// }
///
/// assert!(is_transient(&Busy));
/// ```
pub trait Transient {
    /// The error is expected to go away on its own.
    fn is_temporary(&self) -> bool {
        false
    }

    /// The error was caused by a timeout.
    fn is_timeout(&self) -> bool {
        false
    }
}

impl Transient for JobError {
    fn is_temporary(&self) -> bool {
        matches!(self, JobError::Fail { .. })
    }

    fn is_timeout(&self) -> bool {
        matches!(self, JobError::Timeout { .. })
    }
}

impl Transient for io::Error {
    fn is_temporary(&self) -> bool {
        matches!(
            self.kind(),
            io::ErrorKind::Interrupted
                | io::ErrorKind::WouldBlock
                | io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::ConnectionRefused
        )
    }

    fn is_timeout(&self) -> bool {
        self.kind() == io::ErrorKind::TimedOut
    }
}

impl<E: Transient> Transient for RetryError<E> {
    fn is_temporary(&self) -> bool {
        self.task_error().is_some_and(Transient::is_temporary)
    }

    fn is_timeout(&self) -> bool {
        match self {
            RetryError::DeadlineExceeded { .. } => true,
            other => other.task_error().is_some_and(Transient::is_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_error_labels_are_stable() {
        assert_eq!(JobError::fail("x").as_label(), "job_failed");
        assert_eq!(JobError::fatal("x").as_label(), "job_fatal");
        assert_eq!(JobError::Canceled.as_label(), "job_canceled");
    }

    #[test]
    fn job_error_markers() {
        assert!(JobError::fail("x").is_temporary());
        assert!(!JobError::fail("x").is_timeout());
        assert!(
            JobError::Timeout {
                timeout: Duration::from_secs(1)
            }
            .is_timeout()
        );
        assert!(!JobError::fatal("x").is_temporary());
        assert!(!JobError::Canceled.is_temporary());
    }

    #[test]
    fn io_error_markers() {
        let timed_out = io::Error::new(io::ErrorKind::TimedOut, "slow");
        assert!(timed_out.is_timeout());

        let reset = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        assert!(reset.is_temporary());

        let missing = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert!(!missing.is_temporary());
        assert!(!missing.is_timeout());
    }

    #[test]
    fn retry_error_accessors() {
        let err: RetryError<JobError> = RetryError::Task {
            attempt: 3,
            error: JobError::fail("last"),
        };
        assert_eq!(err.as_label(), "retry_task_failed");
        assert!(!err.is_canceled());
        assert!(err.is_temporary());
        assert_eq!(err.to_string(), "attempt 3 failed: execution failed: last");
        assert!(matches!(err.into_task_error(), Some(JobError::Fail { .. })));

        let canceled: RetryError<JobError> = RetryError::Canceled;
        assert!(canceled.is_canceled());
        assert!(canceled.into_task_error().is_none());

        let deadline: RetryError<JobError> = RetryError::DeadlineExceeded {
            timeout: Duration::from_millis(5),
        };
        assert!(deadline.is_deadline_exceeded());
        assert!(deadline.is_timeout());
    }
}
