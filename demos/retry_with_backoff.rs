//! # Example: retry_with_backoff
//!
//! Retries a flaky operation with exponential backoff and equal jitter,
//! first in place with [`execute_sync`], then on a spawned task with
//! [`execute_async`].
//!
//! ## Flow
//! ```text
//! execute_sync
//!   ├─► attempt 1 → Err("upstream 503")
//!   ├─► on_retry(2, err, ~100ms) → sleep
//!   ├─► attempt 2 → Err("upstream 503")
//!   ├─► on_retry(3, err, ~150ms) → sleep
//!   └─► attempt 3 → Ok(42)
//!
//! execute_async (fatal error, transient-only predicate)
//!   └─► attempt 1 → Err(Fatal) → on_failure(Task{ attempt: 1 })
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=tickvisor=trace cargo run --example retry_with_backoff
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tickvisor::{
    BackoffPolicy, Callbacks, JitterPolicy, JobError, RetryConfig, execute_async, execute_sync,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let ctx = CancellationToken::new();

    // 1. Flaky operation: fails twice, then succeeds.
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);
    let flaky = move || {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            if n < 3 {
                Err(JobError::fail("upstream 503"))
            } else {
                Ok(42)
            }
        }
    };

    let cfg = RetryConfig::default()
        .with_max_attempts(5)
        .with_backoff(BackoffPolicy::Exponential {
            first: Duration::from_millis(100),
            factor: 1.5,
            max: Duration::from_secs(2),
            jitter: JitterPolicy::Equal,
        })
        .with_timeout(Duration::from_secs(10))
        .with_on_retry(|next, err: &JobError, wait| {
            tracing::warn!(next, %err, ?wait, "retrying");
        });

    let value = execute_sync(&ctx, flaky, &cfg).await?;
    let attempts = calls.load(Ordering::SeqCst);
    tracing::info!(value, attempts, "flaky operation succeeded");

    // 2. Fatal error is not retried when only transient errors qualify.
    let fatal = || async { Err::<(), _>(JobError::fatal("invalid api key")) };
    let callbacks = Callbacks::new()
        .on_success(|()| tracing::info!("unexpected success"))
        .on_failure(|err| tracing::error!(label = err.as_label(), %err, "gave up"));

    execute_async(ctx.clone(), fatal, callbacks, cfg.retry_transient()).await?;
    Ok(())
}
