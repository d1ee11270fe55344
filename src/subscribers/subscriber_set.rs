//! # Panic-isolated event delivery to multiple subscribers.
//!
//! Provides [`SubscriberSet`]: the injected logging sink of the runtime. It
//! delivers each event to every subscriber in registration order.
//!
//! ## Architecture
//! ```text
//! emit(event)
//!     │
//!     ├──► subscriber1.on_event() ──► panic → tracing::error!, continue
//!     ├──► subscriber2.on_event()
//!     └──► subscriberN.on_event()
//! ```
//!
//! ## Rules
//! - **Per-subscriber FIFO**: events emitted from one task reach a subscriber in order
//! - **Isolation**: a panicking subscriber doesn't affect the others or the caller
//! - **Default**: [`SubscriberSet::default`] holds a single [`LogWriter`]
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a subscriber uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::core::panic_message;
use crate::events::Event;
use crate::subscribers::{LogWriter, Subscribe};

/// Ordered collection of event subscribers.
#[derive(Clone)]
pub struct SubscriberSet {
    subs: Vec<Arc<dyn Subscribe>>,
}

impl SubscriberSet {
    /// Creates a set from the given subscribers (may be empty: events are then discarded).
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        Self { subs }
    }

    /// A set that discards every event.
    #[must_use]
    pub fn silent() -> Self {
        Self { subs: Vec::new() }
    }

    /// Appends a subscriber.
    pub fn push(&mut self, sub: Arc<dyn Subscribe>) {
        self.subs.push(sub);
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.subs.len()
    }

    /// `true` if no subscriber is registered.
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// Delivers `event` to every subscriber.
    ///
    /// Panics raised by a subscriber are caught and reported through `tracing`.
    pub async fn emit(&self, event: &Event) {
        for sub in &self.subs {
            let fut = sub.on_event(event);
            if let Err(panic_err) = AssertUnwindSafe(fut).catch_unwind().await {
                tracing::error!(
                    subscriber = sub.name(),
                    info = %panic_message(panic_err.as_ref()),
                    seq = event.seq,
                    "subscriber panicked"
                );
            }
        }
    }
}

impl Default for SubscriberSet {
    fn default() -> Self {
        let log: Arc<dyn Subscribe> = Arc::new(LogWriter::new());
        Self::new(vec![log])
    }
}

impl fmt::Debug for SubscriberSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.subs.iter().map(|s| s.name()))
            .finish()
    }
}
