//! # Example: periodic_jobs
//!
//! Runs three jobs every 500ms through a [`Scheduler`]. One of them fails on
//! every third tick, which suppresses `on_success` for that tick only.
//! The scheduler stops after five successful ticks.
//!
//! ## Flow
//! ```text
//! tick N:
//!   ├─► fetch-rates, fetch-fees, sync-ledger (concurrently)
//!   ├─ all Ok → TickSucceeded → on_success (count += 1)
//!   └─ any Err → JobFailed{ job, err } + TickFailed
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=tickvisor=debug cargo run --example periodic_jobs
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tickvisor::{FailurePolicy, JobError, JobFn, JobRef, Scheduler};
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

fn fetch(name: &'static str, latency: Duration) -> JobRef {
    JobFn::arc(name, move |ctx: CancellationToken| async move {
        tokio::select! {
            _ = ctx.cancelled() => Err(JobError::Canceled),
            _ = time::sleep(latency) => Ok(()),
        }
    })
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let token = CancellationToken::new();

    let runs = Arc::new(AtomicU32::new(0));
    let ledger_runs = Arc::clone(&runs);
    let sync_ledger: JobRef = JobFn::arc("sync-ledger", move |_ctx: CancellationToken| {
        let n = ledger_runs.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            if n % 3 == 0 {
                return Err(JobError::fail(format!("ledger locked on run {n}")));
            }
            Ok(())
        }
    });

    let mut sched = Scheduler::builder(token.clone())
        .with_name("billing")
        .with_failure_policy(FailurePolicy::RunAll)
        .with_job_timeout(Duration::from_secs(1))
        .build();
    sched
        .add_job(fetch("fetch-rates", Duration::from_millis(120)))
        .add_job(fetch("fetch-fees", Duration::from_millis(80)))
        .add_job(sync_ledger);

    let successes = Arc::new(AtomicU32::new(0));
    let (hits, stop) = (Arc::clone(&successes), token.clone());
    let handle = sched.start(
        Duration::from_millis(500),
        Some(move || {
            if hits.fetch_add(1, Ordering::SeqCst) + 1 >= 5 {
                stop.cancel();
            }
        }),
    );

    handle.join().await;
    tracing::info!(
        successes = successes.load(Ordering::SeqCst),
        runs = runs.load(Ordering::SeqCst),
        "scheduler stopped"
    );
}
