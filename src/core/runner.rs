//! # Delayed and periodic callbacks.
//!
//! [`Runner`] spawns the two timing primitives of the crate:
//! - [`Runner::after`]: run a callback once after a delay,
//! - [`Runner::every`]: run a callback on a fixed interval until cancelled.
//!
//! Both run on their own tokio task and race every wait against the
//! [`CancellationToken`], with cancellation taking priority.
//!
//! ## Ticker loop
//! ```text
//! loop {
//!   ├─► select (biased):
//!   │     ├─ token.cancelled() → exit
//!   │     └─ interval.tick()   → continue
//!   ├─► tick += 1
//!   └─► catch_unwind(callback(token).await)
//!         └─ panic → emit TickPanicked{ callback, tick, payload }, keep ticking
//! }
//! ```
//!
//! ## Rules
//! - The first firing happens one full interval after the call.
//! - Ticks are **sequential**: the next tick is not dispatched before the
//!   callback returns. Missed ticks are delayed, never burst.
//! - No callback starts after cancellation has been observed.
//! - Panics are isolated per invocation; the ticker ends only through its token.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::core::panic_message;
use crate::events::Event;
use crate::subscribers::SubscriberSet;

/// Smallest accepted interval; tokio rejects a zero period.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Largest interval kept as is (roughly 30 years, as tokio's own `sleep`).
/// Longer periods would overflow `Instant` arithmetic.
const MAX_INTERVAL: Duration = Duration::from_secs(86400 * 365 * 30);

/// Spawns delayed and periodic callbacks, reporting faults to its subscribers.
///
/// Cloning is cheap; clones share the subscriber set.
#[derive(Clone, Debug, Default)]
pub struct Runner {
    subs: Arc<SubscriberSet>,
}

impl Runner {
    /// Creates a runner that reports to `subs`.
    pub fn new(subs: SubscriberSet) -> Self {
        Self {
            subs: Arc::new(subs),
        }
    }

    /// Creates a runner sharing an existing subscriber set.
    pub fn with_shared(subs: Arc<SubscriberSet>) -> Self {
        Self { subs }
    }

    /// Subscribers this runner reports to.
    pub fn subscribers(&self) -> &Arc<SubscriberSet> {
        &self.subs
    }

    /// Runs `callback` once after `delay`, unless `token` is cancelled first.
    ///
    /// The callback receives the same token. Panics inside it are not caught
    /// (they surface through the returned handle).
    pub fn after<F, Fut>(
        &self,
        delay: Duration,
        token: CancellationToken,
        callback: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(async move {
            let fire = tokio::select! {
                biased;
                _ = token.cancelled() => false,
                _ = time::sleep(delay) => true,
            };
            if fire {
                callback(token).await;
            }
        })
    }

    /// Runs `callback` every `interval` until `token` is cancelled.
    ///
    /// Each invocation runs inside a fault boundary: a panic is reported as
    /// [`EventKind::TickPanicked`](crate::EventKind::TickPanicked) and the
    /// ticker proceeds to the next interval. `interval` below 1ms is raised to 1ms;
    /// one above about 30 years is lowered to that, so it effectively never fires.
    ///
    /// Only the panic payload is reported: once `catch_unwind` returns, the
    /// stack of the panicking invocation is gone and no backtrace is available.
    pub fn every<F, Fut>(
        &self,
        interval: Duration,
        token: CancellationToken,
        mut callback: F,
    ) -> JoinHandle<()>
    where
        F: FnMut(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let subs = Arc::clone(&self.subs);
        let callback_name = std::any::type_name::<F>();
        let period = interval.clamp(MIN_INTERVAL, MAX_INTERVAL);

        tokio::spawn(async move {
            let Some(start) = Instant::now().checked_add(period) else {
                // The first tick lies past the clock's range: nothing ever fires.
                token.cancelled().await;
                return;
            };
            let mut ticker = time::interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut tick: u64 = 0;

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                tick += 1;
                let ctx = token.clone();
                let invocation = async { callback(ctx).await };

                if let Err(panic_err) = AssertUnwindSafe(invocation).catch_unwind().await {
                    let info = panic_message(panic_err.as_ref());
                    subs.emit(&Event::tick_panicked(callback_name, tick, info))
                        .await;
                }
            }
        })
    }
}

/// [`Runner::after`] with the default subscribers ([`LogWriter`](crate::LogWriter)).
pub fn after<F, Fut>(delay: Duration, token: CancellationToken, callback: F) -> JoinHandle<()>
where
    F: FnOnce(CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Runner::default().after(delay, token, callback)
}

/// [`Runner::every`] with the default subscribers ([`LogWriter`](crate::LogWriter)).
pub fn every<F, Fut>(interval: Duration, token: CancellationToken, callback: F) -> JoinHandle<()>
where
    F: FnMut(CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Runner::default().every(interval, token, callback)
}
