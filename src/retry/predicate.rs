//! Default retryability predicate.

use crate::error::Transient;

/// Returns `true` if `err` reports itself as temporary or as a timeout.
///
/// Every other error is considered non-retryable: with this predicate the retry
/// loop returns it immediately.
///
/// # Example
/// ```
/// use std::io;
/// use tickvisor::is_transient;
///
/// assert!(is_transient(&io::Error::new(io::ErrorKind::TimedOut, "slow")));
/// assert!(!is_transient(&io::Error::new(io::ErrorKind::NotFound, "gone")));
/// ```
pub fn is_transient<E: Transient>(err: &E) -> bool {
    err.is_temporary() || err.is_timeout()
}
