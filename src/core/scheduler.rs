//! # Job scheduler: a named set of jobs fanned out once per tick.
//!
//! [`Scheduler`] collects jobs, then [`Scheduler::start`] hands them to the
//! runner's [`every`](crate::Runner::every) ticker bound to the scheduler token.
//!
//! ## Tick flow
//! ```text
//! every(interval, token):
//!   ├─► publish TickStarted{ name, tick, jobs }
//!   ├─► run_tick(jobs)            (fan-out, wait for all)
//!   ├─ all Ok → publish TickSucceeded → on_success()
//!   └─ else   → publish TickFailed{ failures }     (on_success skipped)
//! ```
//!
//! ## Rules
//! - Jobs are added before `start`; `start` consumes the scheduler, so the
//!   job set is immutable while ticking.
//! - Ticks never overlap: the next tick waits for every job of the current one.
//! - Job errors never stop the scheduler; only its token does.
//! - Stopping does not abort jobs in flight; they observe the token themselves.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::config::SchedulerConfig;
use crate::core::runner::Runner;
use crate::core::tick::run_tick;
use crate::events::{Event, EventKind};
use crate::jobs::JobRef;
use crate::policies::FailurePolicy;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Ordered set of jobs run together on a fixed interval.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use tickvisor::{JobFn, Scheduler};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let token = CancellationToken::new();
/// let mut sched = Scheduler::new(token.clone());
/// sched.add_job(JobFn::arc("noop", |_ctx: CancellationToken| async { Ok(()) }));
///
/// let stop = token.clone();
/// let handle = sched.start(Duration::from_millis(5), Some(move || stop.cancel()));
/// handle.join().await;
/// # }
/// ```
pub struct Scheduler {
    cfg: SchedulerConfig,
    token: CancellationToken,
    runner: Runner,
    jobs: Vec<JobRef>,
}

impl Scheduler {
    /// Creates a scheduler with default configuration and the default subscribers.
    pub fn new(token: CancellationToken) -> Self {
        Self::builder(token).build()
    }

    /// Starts a [`SchedulerBuilder`] bound to `token`.
    pub fn builder(token: CancellationToken) -> SchedulerBuilder {
        SchedulerBuilder::new(token)
    }

    /// Appends a job. Duplicates are allowed; launch order follows insertion order.
    pub fn add_job(&mut self, job: JobRef) -> &mut Self {
        self.jobs.push(job);
        self
    }

    /// Scheduler name.
    pub fn name(&self) -> &str {
        &self.cfg.name
    }

    /// Registered jobs in insertion order.
    pub fn jobs(&self) -> &[JobRef] {
        &self.jobs
    }

    /// Number of registered jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// `true` if no job has been added.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Token governing the scheduler's lifetime.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Active configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.cfg
    }

    /// Starts ticking every `interval` and returns a handle to the running scheduler.
    ///
    /// `on_success` runs once for each tick in which every job returned `Ok`.
    /// A panic inside it is isolated like any other tick fault.
    pub fn start<F>(self, interval: Duration, on_success: Option<F>) -> SchedulerHandle
    where
        F: Fn() + Send + Sync + 'static,
    {
        let Scheduler {
            cfg,
            token,
            runner,
            jobs,
        } = self;

        let name: Arc<str> = Arc::from(cfg.name.as_str());
        let jobs: Arc<[JobRef]> = jobs.into();
        let cfg = Arc::new(cfg);
        let on_success = on_success.map(Arc::new);
        let subs = Arc::clone(runner.subscribers());

        tracing::debug!(scheduler = %name, jobs = jobs.len(), ?interval, "scheduler starting");

        let tick_name = Arc::clone(&name);
        let mut tick: u64 = 0;
        let join = runner.every(interval, token.clone(), move |ctx| {
            tick += 1;
            let tick = tick;
            let name = Arc::clone(&tick_name);
            let jobs = Arc::clone(&jobs);
            let cfg = Arc::clone(&cfg);
            let subs = Arc::clone(&subs);
            let on_success = on_success.clone();

            async move {
                subs.emit(
                    &Event::new(EventKind::TickStarted)
                        .with_task(Arc::clone(&name))
                        .with_tick(tick)
                        .with_jobs(jobs.len()),
                )
                .await;

                let outcome = run_tick(&jobs, tick, &ctx, &cfg, &subs).await;

                if outcome.succeeded() {
                    subs.emit(
                        &Event::new(EventKind::TickSucceeded)
                            .with_task(name)
                            .with_tick(tick),
                    )
                    .await;
                    if let Some(cb) = on_success {
                        cb();
                    }
                } else {
                    subs.emit(
                        &Event::new(EventKind::TickFailed)
                            .with_task(name)
                            .with_tick(tick)
                            .with_jobs(outcome.launched)
                            .with_failures(outcome.unsuccessful()),
                    )
                    .await;
                }
            }
        });

        SchedulerHandle { name, token, join }
    }

    /// [`Scheduler::start`] without a success callback.
    pub fn start_silent(self, interval: Duration) -> SchedulerHandle {
        self.start::<fn()>(interval, None)
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("cfg", &self.cfg)
            .field("jobs", &self.jobs.len())
            .field("stopped", &self.token.is_cancelled())
            .finish()
    }
}

/// Builder for [`Scheduler`].
pub struct SchedulerBuilder {
    cfg: SchedulerConfig,
    token: CancellationToken,
    subscribers: Option<SubscriberSet>,
}

impl SchedulerBuilder {
    /// Creates a builder with default configuration.
    pub fn new(token: CancellationToken) -> Self {
        Self {
            cfg: SchedulerConfig::default(),
            token,
            subscribers: None,
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, cfg: SchedulerConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets the scheduler name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.cfg.name = name.into();
        self
    }

    /// Sets the failure policy applied within each tick.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.cfg.failure = policy;
        self
    }

    /// Sets the per-job timeout (`Duration::ZERO` disables it).
    pub fn with_job_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.job_timeout = timeout;
        self
    }

    /// Sets event subscribers. Replaces the default [`LogWriter`](crate::LogWriter).
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = Some(SubscriberSet::new(subscribers));
        self
    }

    /// Sets a prepared subscriber set.
    pub fn with_subscriber_set(mut self, set: SubscriberSet) -> Self {
        self.subscribers = Some(set);
        self
    }

    /// Builds the scheduler with an empty job list.
    pub fn build(self) -> Scheduler {
        let subs = self.subscribers.unwrap_or_default();
        Scheduler {
            cfg: self.cfg,
            token: self.token,
            runner: Runner::new(subs),
            jobs: Vec::new(),
        }
    }
}

/// Handle to a started [`Scheduler`].
#[derive(Debug)]
pub struct SchedulerHandle {
    name: Arc<str>,
    token: CancellationToken,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Cancels the scheduler token. Idempotent.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// `true` once the scheduler token has been cancelled.
    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Token governing the scheduler's lifetime.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Scheduler name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Waits for the ticker loop to exit (after the token is cancelled and
    /// the tick in progress has finished).
    pub async fn join(self) {
        if let Err(err) = self.join.await {
            tracing::warn!(scheduler = %self.name, error = %err, "scheduler loop aborted");
        }
    }

    /// [`SchedulerHandle::stop`] followed by [`SchedulerHandle::join`].
    pub async fn shutdown(self) {
        self.stop();
        self.join().await;
    }
}
