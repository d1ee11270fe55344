//! # Example: delayed_once
//!
//! Shows the two timing primitives side by side:
//! - [`after`] fires a reminder once, and a second timer is cancelled before it fires;
//! - [`Runner::every`] keeps ticking after a panicking tick.
//!
//! ## Run
//! ```bash
//! cargo run --example delayed_once
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tickvisor::{Runner, after};
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // 1. One-shot timer that fires.
    let fired = after(Duration::from_millis(200), CancellationToken::new(), |_ctx| async {
        tracing::info!("reminder fired");
    });

    // 2. One-shot timer cancelled before its delay.
    let token = CancellationToken::new();
    let cancelled = after(Duration::from_secs(5), token.clone(), |_ctx| async {
        tracing::error!("must never fire");
    });
    token.cancel();

    fired.await?;
    cancelled.await?;

    // 3. Ticker whose second tick panics; the ticker keeps going.
    let ticker_token = CancellationToken::new();
    let ticks = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&ticks);
    let interval = Duration::from_millis(100);
    let ticker = Runner::default().every(interval, ticker_token.clone(), move |_ctx| {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            if n == 2 {
                panic!("tick {n} exploded");
            }
            tracing::info!(tick = n, "tick");
        }
    });

    time::sleep(Duration::from_millis(550)).await;
    ticker_token.cancel();
    ticker.await?;

    tracing::info!(ticks = ticks.load(Ordering::SeqCst), "ticker stopped");
    Ok(())
}
