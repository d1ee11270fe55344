//! # One scheduler tick: fan out every job, wait for all, count failures.
//!
//! ```text
//! tick_token = scheduler_token.child_token()
//!
//! for job in jobs (registration order):
//!   spawn ─► catch_unwind(run_job(job, tick_token, timeout))
//!
//! join all (completion order):
//!   ├─ Ok(())                          → -
//!   ├─ Err(Canceled) & token cancelled → JobCanceled
//!   ├─ Err(e)                          → JobFailed   (+ FailFast: cancel tick_token)
//!   └─ panic                           → JobPanicked (+ FailFast: cancel tick_token)
//! ```
//!
//! Every job is launched before any result is known; the tick returns only
//! after all of them finished.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::task::JoinSet;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::core::config::SchedulerConfig;
use crate::core::panic_message;
use crate::error::JobError;
use crate::events::{Event, EventKind};
use crate::jobs::{Job, JobRef};
use crate::subscribers::SubscriberSet;

/// Result of one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TickOutcome {
    pub launched: usize,
    /// Jobs that returned an error or panicked.
    pub failures: usize,
    /// Jobs that gave up after the tick token was cancelled.
    pub canceled: usize,
}

impl TickOutcome {
    /// Every job returned `Ok`.
    pub fn succeeded(&self) -> bool {
        self.failures == 0 && self.canceled == 0
    }

    /// Jobs that did not return `Ok`.
    pub fn unsuccessful(&self) -> usize {
        self.failures + self.canceled
    }
}

/// Runs every job once, concurrently, and reports each failure to `subs`.
pub(crate) async fn run_tick(
    jobs: &Arc<[JobRef]>,
    tick: u64,
    parent: &CancellationToken,
    cfg: &SchedulerConfig,
    subs: &SubscriberSet,
) -> TickOutcome {
    let tick_token = parent.child_token();
    let timeout = cfg.job_timeout();
    let mut outcome = TickOutcome {
        launched: jobs.len(),
        ..TickOutcome::default()
    };

    let mut set = JoinSet::new();
    for job in jobs.iter() {
        let job = Arc::clone(job);
        let ctx = tick_token.clone();
        set.spawn(async move {
            let res = AssertUnwindSafe(run_job(job.as_ref(), ctx, timeout))
                .catch_unwind()
                .await;
            (job, res)
        });
    }

    while let Some(joined) = set.join_next().await {
        let (job, res) = match joined {
            Ok(pair) => pair,
            Err(join_err) => {
                // Only reachable when the runtime aborts the task.
                tracing::warn!(tick, error = %join_err, "job task aborted");
                outcome.canceled += 1;
                continue;
            }
        };

        let event = match res {
            Ok(Ok(())) => continue,
            Ok(Err(JobError::Canceled)) if tick_token.is_cancelled() => {
                outcome.canceled += 1;
                Event::new(EventKind::JobCanceled)
            }
            Ok(Err(err)) => {
                outcome.failures += 1;
                let ev = Event::new(EventKind::JobFailed)
                    .with_reason(err.to_string());
                match err {
                    JobError::Timeout { timeout } => ev.with_timeout(timeout),
                    _ => ev,
                }
            }
            Err(panic_err) => {
                outcome.failures += 1;
                Event::new(EventKind::JobPanicked)
                    .with_reason(panic_message(panic_err.as_ref()))
            }
        };

        if event.kind != EventKind::JobCanceled && cfg.failure.cancels_siblings() {
            tick_token.cancel();
        }
        subs.emit(&event.with_task(job.name()).with_tick(tick)).await;
    }

    tick_token.cancel();
    outcome
}

/// Runs one job with its own child token and the optional timeout.
///
/// On timeout the child token is cancelled and the job fails with
/// [`JobError::Timeout`].
async fn run_job(
    job: &dyn Job,
    parent: CancellationToken,
    timeout: Option<Duration>,
) -> Result<(), JobError> {
    let child = parent.child_token();

    match timeout {
        Some(dur) => match time::timeout(dur, job.run(child.clone())).await {
            Ok(res) => res,
            Err(_elapsed) => {
                child.cancel();
                Err(JobError::Timeout { timeout: dur })
            }
        },
        None => job.run(child).await,
    }
}
