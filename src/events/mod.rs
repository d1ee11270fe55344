//! Runtime events: the data model handed to logging sinks.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and key/value metadata
//!
//! ## Quick reference
//! - **Publishers**: `core::runner` (ticker panics), `core::tick` (job outcomes),
//!   `core::scheduler` (tick outcomes).
//! - **Consumers**: every [`Subscribe`](crate::Subscribe) in the injected
//!   [`SubscriberSet`](crate::SubscriberSet).

mod event;

pub use event::{Event, EventKind};
