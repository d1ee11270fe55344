//! # Core subscriber trait
//!
//! `Subscribe` is the logging collaborator of the runtime: the periodic runner and
//! the scheduler hand every [`Event`] to the injected
//! [`SubscriberSet`](crate::subscribers::SubscriberSet), which calls each subscriber in turn.
//!
//! ## Contract
//! - Called inline from the ticker or tick task; keep handlers short (hand off
//!   slow I/O to your own channel/task).
//! - A panicking subscriber is isolated by the set and never stops a ticker.
//! - Output format is entirely up to the subscriber.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use tickvisor::{Event, EventKind, Subscribe};
//!
//! struct FailureCounter(std::sync::atomic::AtomicU64);
//!
//! #[async_trait]
//! impl Subscribe for FailureCounter {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::JobFailed {
//!             self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "failure-counter"
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
