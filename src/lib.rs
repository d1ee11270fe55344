//! # tickvisor
//!
//! **Tickvisor** is a small async toolkit for running work on a clock and
//! surviving its failures.
//!
//! It provides three cooperating primitives built on `tokio`:
//! delayed/periodic callbacks, a job scheduler that fans jobs out once per tick,
//! and a retry executor with pluggable backoff.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │    JobRef    │   │    JobRef    │   │    JobRef    │
//!     │ (user job 1) │   │ (user job 2) │   │ (user job 3) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Scheduler                                                        │
//! │  - SchedulerConfig (name, failure policy, job timeout)            │
//! │  - Runner::every  (sequential ticks, panic isolation)             │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼ every tick
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!        job.run(ctx)        job.run(ctx)        job.run(ctx)
//!            │                   │                   │
//!            └───────── wait for all, count ─────────┘
//!                                │
//!               all Ok ─► on_success()   else ─► JobFailed events
//!                                │
//!                                ▼
//!                  SubscriberSet ──► LogWriter / custom sinks
//! ```
//!
//! ### Retry loop
//! ```text
//! execute_sync / execute_async:
//!
//! loop {
//!   ├─► cancelled? deadline? ─► Canceled / DeadlineExceeded
//!   ├─► attempt += 1; task().await
//!   │       ├─ Ok  ──► done
//!   │       └─ Err ──► predicate rejects or last attempt ─► Task{ attempt, error }
//!   ├─► wait = backoff.delay(attempt); on_retry(attempt + 1, &err, wait)
//!   └─► sleep(wait), racing cancellation and the deadline
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                | Key types / traits                                |
//! |-------------------|------------------------------------------------------------|---------------------------------------------------|
//! | **Timing**        | Run a callback after a delay or on an interval.            | [`Runner`], [`after`], [`every`]                  |
//! | **Scheduling**    | Fan a set of jobs out per tick, aggregate failures.        | [`Scheduler`], [`SchedulerHandle`], [`Job`]       |
//! | **Retry**         | Retry fallible async work with backoff and a deadline.     | [`execute_sync`], [`execute_async`], [`RetryConfig`] |
//! | **Policies**      | Backoff, jitter and in-tick failure handling.              | [`BackoffPolicy`], [`JitterPolicy`], [`FailurePolicy`] |
//! | **Subscriber API**| Observe tick and job events (logging, metrics, tests).     | [`Subscribe`], [`SubscriberSet`], [`LogWriter`]   |
//! | **Errors**        | Typed job and retry errors, transient classification.      | [`JobError`], [`RetryError`], [`Transient`]       |
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use tickvisor::{JobError, JobFn, JobRef, Scheduler};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let token = CancellationToken::new();
//!
//!     let hello: JobRef = JobFn::arc("hello", |ctx: CancellationToken| async move {
//!         if ctx.is_cancelled() {
//!             return Err(JobError::Canceled);
//!         }
//!         println!("Hello from job!");
//!         Ok(())
//!     });
//!
//!     let mut sched = Scheduler::builder(token.clone())
//!         .with_name("demo")
//!         .build();
//!     sched.add_job(hello);
//!
//!     // Stop after the first successful tick.
//!     let stop = token.clone();
//!     let handle = sched.start(Duration::from_millis(10), Some(move || stop.cancel()));
//!     handle.join().await;
//! }
//! ```
mod core;
mod error;
mod events;
mod jobs;
mod policies;
mod retry;
mod subscribers;

// ---- Public re-exports ----

pub use core::{
    Runner, Scheduler, SchedulerBuilder, SchedulerConfig, SchedulerHandle, after, every,
};
pub use error::{JobError, RetryError, Transient};
pub use events::{Event, EventKind};
pub use jobs::{Job, JobFn, JobRef};
pub use policies::{BackoffFn, BackoffPolicy, FailurePolicy, JitterPolicy};
pub use retry::{
    Callbacks, OnRetry, RetryConfig, RetryPredicate, execute_async, execute_sync,
    execute_sync_with_predicate, is_transient,
};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
