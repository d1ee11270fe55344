//! Retry executor behavior.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use tickvisor::{
    BackoffPolicy, Callbacks, JobError, RetryConfig, RetryError, execute_async, execute_sync,
    execute_sync_with_predicate, is_transient,
};

fn fixed(ms: u64) -> RetryConfig<JobError> {
    RetryConfig::from_backoff(BackoffPolicy::Fixed(Duration::from_millis(ms)))
}

/// Task failing with `Fail` until call number `succeed_on`; counts calls.
fn flaky(
    calls: &Arc<AtomicU32>,
    succeed_on: u32,
) -> impl FnMut() -> std::future::Ready<Result<u32, JobError>> + use<> {
    let calls = Arc::clone(calls);
    move || {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n >= succeed_on {
            std::future::ready(Ok(n))
        } else {
            std::future::ready(Err(JobError::fail(format!("attempt {n}"))))
        }
    }
}

#[tokio::test(start_paused = true)]
async fn always_failing_task_runs_max_attempts() {
    let calls = Arc::new(AtomicU32::new(0));
    let cfg = fixed(1).with_max_attempts(4);

    let res = execute_sync(&CancellationToken::new(), flaky(&calls, u32::MAX), &cfg).await;

    assert_eq!(calls.load(Ordering::SeqCst), 4);
    match res {
        Err(RetryError::Task { attempt, error }) => {
            assert_eq!(attempt, 4);
            assert_eq!(error.to_string(), "execution failed: attempt 4");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn success_on_attempt_m_stops_retrying() {
    let calls = Arc::new(AtomicU32::new(0));
    let cfg = fixed(1).with_max_attempts(5);

    let res = execute_sync(&CancellationToken::new(), flaky(&calls, 2), &cfg).await;

    assert_eq!(res.ok(), Some(2));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn fail_twice_then_succeed_waits_between_attempts() {
    let calls = Arc::new(AtomicU32::new(0));
    let cfg = fixed(10).with_max_attempts(3);

    let started = Instant::now();
    let res = execute_sync(&CancellationToken::new(), flaky(&calls, 3), &cfg).await;

    assert!(res.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(started.elapsed() >= Duration::from_millis(20));
}

#[tokio::test(start_paused = true)]
async fn cancel_during_backoff_returns_canceled() {
    let calls = Arc::new(AtomicU32::new(0));
    let cfg = fixed(10_000).with_max_attempts(5);
    let token = CancellationToken::new();

    let canceller = token.clone();
    tokio::spawn(async move {
        time::sleep(Duration::from_secs(1)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let res = execute_sync(&token, flaky(&calls, u32::MAX), &cfg).await;

    assert!(matches!(res, Err(RetryError::Canceled)));
    assert!(calls.load(Ordering::SeqCst) < 5);
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn cancelled_token_skips_first_attempt() {
    let calls = Arc::new(AtomicU32::new(0));
    let token = CancellationToken::new();
    token.cancel();

    let res = execute_sync(&token, flaky(&calls, 1), &fixed(1)).await;

    assert!(res.unwrap_err().is_canceled());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn total_timeout_yields_deadline_exceeded() {
    let calls = Arc::new(AtomicU32::new(0));
    let cfg = fixed(30)
        .with_max_attempts(10)
        .with_timeout(Duration::from_millis(50));

    let res = execute_sync(&CancellationToken::new(), flaky(&calls, u32::MAX), &cfg).await;

    match res {
        Err(RetryError::DeadlineExceeded { timeout }) => {
            assert_eq!(timeout, Duration::from_millis(50));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn unbounded_timeout_means_no_deadline() {
    let calls = Arc::new(AtomicU32::new(0));
    let cfg = RetryConfig::from_backoff(BackoffPolicy::None)
        .with_max_attempts(2)
        .with_timeout(Duration::MAX);

    let res = execute_sync(&CancellationToken::new(), flaky(&calls, 2), &cfg).await;

    assert_eq!(res.unwrap(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn predicate_rejects_fatal_error_immediately() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);
    let task = move || {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Err::<(), _>(JobError::fatal("bad credentials")) }
    };

    let res = execute_sync_with_predicate(
        &CancellationToken::new(),
        task,
        is_transient,
        &fixed(1).with_max_attempts(5),
    )
    .await;

    assert!(matches!(res, Err(RetryError::Task { attempt: 1, .. })));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn predicate_retries_transient_errors() {
    let calls = Arc::new(AtomicU32::new(0));

    let res = execute_sync_with_predicate(
        &CancellationToken::new(),
        flaky(&calls, 3),
        is_transient,
        &fixed(1).with_max_attempts(5),
    )
    .await;

    assert_eq!(res.ok(), Some(3));
}

#[tokio::test(start_paused = true)]
async fn config_predicate_is_used_by_execute_sync() {
    let calls = Arc::new(AtomicU32::new(0));
    let cfg = fixed(1)
        .with_max_attempts(5)
        .with_retry_if(|e: &JobError| !matches!(e, JobError::Fail { .. }));

    let res = execute_sync(&CancellationToken::new(), flaky(&calls, u32::MAX), &cfg).await;

    assert!(matches!(res, Err(RetryError::Task { attempt: 1, .. })));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn on_retry_sees_next_attempt_and_wait() {
    let calls = Arc::new(AtomicU32::new(0));
    let seen: Arc<Mutex<Vec<(u32, Duration)>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let cfg = fixed(5)
        .with_max_attempts(3)
        .with_on_retry(move |next, _err, wait| sink.lock().unwrap().push((next, wait)));

    let res = execute_sync(&CancellationToken::new(), flaky(&calls, u32::MAX), &cfg).await;

    assert!(res.is_err());
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(2, Duration::from_millis(5)), (3, Duration::from_millis(5))]
    );
}

#[tokio::test(start_paused = true)]
async fn execute_async_reports_success_once() {
    let calls = Arc::new(AtomicU32::new(0));
    let ok = Arc::new(AtomicU32::new(0));
    let failed = Arc::new(AtomicU32::new(0));

    let (ok_c, failed_c) = (Arc::clone(&ok), Arc::clone(&failed));
    let callbacks = Callbacks::new()
        .on_success(move |v: u32| {
            assert_eq!(v, 2);
            ok_c.fetch_add(1, Ordering::SeqCst);
        })
        .on_failure(move |_err| {
            failed_c.fetch_add(1, Ordering::SeqCst);
        });

    execute_async(CancellationToken::new(), flaky(&calls, 2), callbacks, fixed(1))
        .await
        .unwrap();

    assert_eq!(ok.load(Ordering::SeqCst), 1);
    assert_eq!(failed.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn execute_async_reports_failure_once() {
    let calls = Arc::new(AtomicU32::new(0));
    let ok = Arc::new(AtomicU32::new(0));
    let failures: Arc<Mutex<Vec<String>>> = Arc::default();

    let (ok_c, sink) = (Arc::clone(&ok), Arc::clone(&failures));
    let callbacks = Callbacks::new()
        .on_success(move |_v: u32| {
            ok_c.fetch_add(1, Ordering::SeqCst);
        })
        .on_failure(move |err: RetryError<JobError>| {
            sink.lock().unwrap().push(err.as_label().to_string());
        });

    execute_async(
        CancellationToken::new(),
        flaky(&calls, u32::MAX),
        callbacks,
        fixed(1).with_max_attempts(2),
    )
    .await
    .unwrap();

    assert_eq!(ok.load(Ordering::SeqCst), 0);
    assert_eq!(*failures.lock().unwrap(), vec!["retry_task_failed".to_string()]);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn execute_async_without_callbacks_completes() {
    let calls = Arc::new(AtomicU32::new(0));

    let task = flaky(&calls, 2);
    execute_async(CancellationToken::new(), task, Callbacks::default(), fixed(1))
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn execute_async_reports_panic_as_failure() {
    let reasons: Arc<Mutex<Vec<String>>> = Arc::default();
    let sink = Arc::clone(&reasons);

    let task = || async {
        if true {
            panic!("kaboom");
        }
        Ok::<(), JobError>(())
    };
    let callbacks = Callbacks::new().on_failure(move |err: RetryError<JobError>| {
        if let RetryError::Panicked { reason } = err {
            sink.lock().unwrap().push(reason);
        }
    });

    execute_async(CancellationToken::new(), task, callbacks, fixed(1))
        .await
        .unwrap();

    assert_eq!(*reasons.lock().unwrap(), vec!["kaboom".to_string()]);
}
