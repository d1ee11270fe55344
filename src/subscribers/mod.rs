//! # Event subscribers (the logging collaborator).
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] that is
//! injected into the periodic runner and the scheduler, and the default
//! [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Runner::every ─┐
//!   run_tick ──────┼── emit(&Event) ──► SubscriberSet ──► Subscribe::on_event(&Event)
//!   Scheduler ─────┘                                          │
//!                                                     ┌───────┴────┬─────────┐
//!                                                     ▼            ▼         ▼
//!                                                 LogWriter    Metrics    Custom
//! ```

mod log;
mod subscribe;
mod subscriber_set;

pub use log::LogWriter;
pub use subscribe::Subscribe;
pub use subscriber_set::SubscriberSet;
