//! # Runtime events emitted by the periodic runner and the scheduler.
//!
//! The [`EventKind`] enum classifies event types across two categories:
//! - **Tick events**: one firing of a ticker or a scheduler tick (started, panicked, succeeded, failed)
//! - **Job events**: outcome of an individual job inside a tick (failed, canceled, panicked)
//!
//! The [`Event`] struct carries the key/value attributes a logging sink renders:
//! timestamps, task/job name, reason, tick number, timeout and failure counts.
//! Each kind maps to a [`tracing::Level`] via [`EventKind::level`].
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use tickvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::JobFailed)
//!     .with_task("sync-prices")
//!     .with_reason("connection refused")
//!     .with_tick(3);
//!
//! assert_eq!(ev.kind, EventKind::JobFailed);
//! assert_eq!(ev.task.as_deref(), Some("sync-prices"));
//! assert_eq!(ev.tick, Some(3));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use tracing::Level;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Ticker events ===
    /// A periodic callback panicked; the ticker keeps running.
    ///
    /// Sets:
    /// - `task`: callback function name
    /// - `reason`: panic payload
    /// - `tick`: tick number (1-based)
    TickPanicked,

    // === Scheduler tick events ===
    /// A scheduler tick is launching its jobs.
    ///
    /// Sets:
    /// - `task`: scheduler name
    /// - `tick`: tick number
    /// - `jobs`: number of jobs launched
    TickStarted,

    /// Every job of the tick succeeded.
    ///
    /// Sets:
    /// - `task`: scheduler name
    /// - `tick`: tick number
    TickSucceeded,

    /// At least one job of the tick failed; `on_success` was skipped.
    ///
    /// Sets:
    /// - `task`: scheduler name
    /// - `tick`: tick number
    /// - `jobs`: number of jobs launched
    /// - `failures`: number of jobs that did not return `Ok`
    TickFailed,

    // === Job events ===
    /// A job returned an error (including per-job timeouts).
    ///
    /// Sets:
    /// - `task`: job name
    /// - `reason`: error message
    /// - `tick`: tick number
    /// - `timeout_ms`: only when the job hit its timeout
    JobFailed,

    /// A job returned `Canceled` after the tick token was cancelled (fail-fast or shutdown).
    ///
    /// Sets:
    /// - `task`: job name
    /// - `tick`: tick number
    JobCanceled,

    /// A job panicked; counted as a failure of the tick.
    ///
    /// Sets:
    /// - `task`: job name
    /// - `reason`: panic payload
    /// - `tick`: tick number
    JobPanicked,
}

impl EventKind {
    /// Severity [`LogWriter`](crate::LogWriter) records the event at.
    pub fn level(&self) -> Level {
        match self {
            EventKind::TickPanicked | EventKind::JobFailed | EventKind::JobPanicked => {
                Level::ERROR
            }
            EventKind::TickFailed => Level::WARN,
            EventKind::TickSucceeded => Level::INFO,
            EventKind::TickStarted | EventKind::JobCanceled => Level::DEBUG,
        }
    }

    /// Short stable label (snake_case).
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::TickPanicked => "tick_panicked",
            EventKind::TickStarted => "tick_started",
            EventKind::TickSucceeded => "tick_succeeded",
            EventKind::TickFailed => "tick_failed",
            EventKind::JobFailed => "job_failed",
            EventKind::JobCanceled => "job_canceled",
            EventKind::JobPanicked => "job_panicked",
        }
    }
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the job, scheduler or callback, if applicable.
    pub task: Option<Arc<str>>,
    /// Human-readable reason (errors, panic payloads).
    pub reason: Option<Arc<str>>,
    /// Tick number (starting from 1).
    pub tick: Option<u64>,
    /// Job timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Number of jobs launched in the tick.
    pub jobs: Option<u32>,
    /// Number of failed jobs in the tick.
    pub failures: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            reason: None,
            tick: None,
            timeout_ms: None,
            jobs: None,
            failures: None,
        }
    }

    /// Severity of this event.
    #[inline]
    pub fn level(&self) -> Level {
        self.kind.level()
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a tick number.
    #[inline]
    pub fn with_tick(mut self, tick: u64) -> Self {
        self.tick = Some(tick);
        self
    }

    /// Attaches a timeout duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Attaches the number of jobs launched.
    #[inline]
    pub fn with_jobs(mut self, n: usize) -> Self {
        self.jobs = Some(u32::try_from(n).unwrap_or(u32::MAX));
        self
    }

    /// Attaches the number of failed jobs.
    #[inline]
    pub fn with_failures(mut self, n: usize) -> Self {
        self.failures = Some(u32::try_from(n).unwrap_or(u32::MAX));
        self
    }

    /// Creates a ticker panic event.
    #[inline]
    pub fn tick_panicked(callback: &str, tick: u64, info: String) -> Self {
        Event::new(EventKind::TickPanicked)
            .with_task(callback)
            .with_tick(tick)
            .with_reason(info)
    }
}
