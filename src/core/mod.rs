//! Runtime core: timing primitives and the job scheduler.
//!
//! Public API from this module: [`Runner`] (with the free functions [`after`] and
//! [`every`]), [`Scheduler`] and its builder/handle, [`SchedulerConfig`].
//!
//! Internal modules:
//! - [`runner`]: one-shot and periodic callbacks with per-invocation fault isolation;
//! - [`scheduler`]: job registration, start/stop, tick events;
//! - [`tick`]: fan-out of one tick with timeout, failure policy and job events;
//! - [`panic`]: rendering of caught panic payloads.

mod config;
mod panic;
mod runner;
mod scheduler;
mod tick;

pub(crate) use panic::panic_message;

pub use config::SchedulerConfig;
pub use runner::{Runner, after, every};
pub use scheduler::{Scheduler, SchedulerBuilder, SchedulerHandle};
