//! # LogWriter: events rendered through `tracing`
//!
//! The default subscriber. Each [`Event`] becomes one `tracing` record at
//! [`EventKind::level`], with the event attributes as structured fields.
//!
//! ## Example output (with `tracing_subscriber::fmt`)
//! ```text
//! ERROR tickvisor: callback panicked callback="demo::main::{{closure}}" tick=1 info="boom"
//! DEBUG tickvisor: tick started scheduler="prices" tick=4 jobs=3
//! ERROR tickvisor: job failed job="fetch-eur" tick=4 err="execution failed: 503"
//! WARN  tickvisor: tick failed scheduler="prices" tick=4 failures=1
//! INFO  tickvisor: tick succeeded scheduler="prices" tick=5
//! ```

use async_trait::async_trait;
use tracing::Level;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// `tracing` macros take a constant level; dispatch on a runtime one.
macro_rules! record {
    ($level:expr, $($arg:tt)+) => {{
        let level = $level;
        if level == Level::ERROR {
            tracing::error!(target: "tickvisor", $($arg)+);
        } else if level == Level::WARN {
            tracing::warn!(target: "tickvisor", $($arg)+);
        } else if level == Level::INFO {
            tracing::info!(target: "tickvisor", $($arg)+);
        } else if level == Level::DEBUG {
            tracing::debug!(target: "tickvisor", $($arg)+);
        } else {
            tracing::trace!(target: "tickvisor", $($arg)+);
        }
    }};
}

/// Event writer subscriber.
#[derive(Default, Debug, Clone, Copy)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let level = e.kind.level();
        let name = e.task.as_deref().unwrap_or("unknown");
        let reason = e.reason.as_deref().unwrap_or("");
        let tick = e.tick.unwrap_or_default();

        match e.kind {
            EventKind::TickPanicked => {
                record!(
                    level,
                    callback = name,
                    tick,
                    info = reason,
                    "callback panicked"
                );
            }
            EventKind::TickStarted => {
                let jobs = e.jobs.unwrap_or_default();
                record!(level, scheduler = name, tick, jobs, "tick started");
            }
            EventKind::TickSucceeded => {
                record!(level, scheduler = name, tick, "tick succeeded");
            }
            EventKind::TickFailed => {
                let failures = e.failures.unwrap_or_default();
                record!(level, scheduler = name, tick, failures, "tick failed");
            }
            EventKind::JobFailed => {
                let timeout_ms = e.timeout_ms;
                record!(level, job = name, tick, err = reason, ?timeout_ms, "job failed");
            }
            EventKind::JobCanceled => {
                record!(level, job = name, tick, "job cancelled");
            }
            EventKind::JobPanicked => {
                record!(level, job = name, tick, info = reason, "job panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct Buf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buf {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn render(event: &Event) -> String {
        let buf = Buf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(Level::TRACE)
            .with_ansi(false)
            .without_time()
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            futures::executor::block_on(LogWriter.on_event(event));
        });
        let bytes = buf.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn records_at_kind_level() {
        let kinds = [
            EventKind::TickPanicked,
            EventKind::TickStarted,
            EventKind::TickSucceeded,
            EventKind::TickFailed,
            EventKind::JobFailed,
            EventKind::JobCanceled,
            EventKind::JobPanicked,
        ];
        for kind in kinds {
            let out = render(&Event::new(kind).with_task("prices").with_tick(4));
            assert!(
                out.trim_start().starts_with(&kind.level().to_string()),
                "{kind:?} rendered as {out:?}"
            );
        }
    }

    #[test]
    fn job_failure_carries_fields() {
        let event = Event::new(EventKind::JobFailed)
            .with_task("fetch-eur")
            .with_tick(2)
            .with_reason("execution failed: 503");

        let out = render(&event);
        assert!(out.contains("job failed"));
        assert!(out.contains("job=\"fetch-eur\""));
        assert!(out.contains("tick=2"));
    }
}
