//! End-to-end retry scenarios against the real clock

use backwater::prelude::*;
use backwater::{retry_with_timeout, RetryEvent};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

/// Fails `failures` times, then succeeds.
fn fail_times(failures: u32) -> impl FnMut(CancelSignal) -> std::future::Ready<Result<(), &'static str>> {
    let mut calls = 0;
    move |_| {
        calls += 1;
        std::future::ready(if calls > failures { Ok(()) } else { Err("dummy error") })
    }
}

#[tokio::test]
async fn four_failures_then_success_within_timeout() {
    let start = Instant::now();
    let mut delays = 0;

    let result = Retrier::new(DelayStrategy::constant(Duration::from_millis(10)))
        .with_timeout(Duration::from_secs(1))
        .retry_with_hooks(
            &CancelSignal::new(),
            fail_times(4),
            |_: &RetryEvent<'_, &str>| delays += 1,
        )
        .await;

    let elapsed = start.elapsed();
    assert_eq!(result, Ok(()));
    assert_eq!(delays, 4);
    assert!(elapsed >= Duration::from_millis(40), "{:?}", elapsed);
    assert!(elapsed < Duration::from_secs(1), "{:?}", elapsed);
}

#[tokio::test]
async fn single_attempt_ceiling_gives_up_immediately() {
    let start = Instant::now();

    let result = Retrier::new(DelayStrategy::exponential(Duration::from_secs(10)))
        .with_max_attempts(1)
        .retry(&CancelSignal::new(), fail_times(5))
        .await;

    assert_eq!(
        result,
        Err(RetryError::MaxAttemptsExceeded {
            attempts: 1,
            max_attempts: 1,
            last_error: "dummy error",
        })
    );
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn timeout_shorter_than_delay_is_reported_as_deadline() {
    for strategy in [
        DelayStrategy::constant(Duration::from_millis(10)),
        DelayStrategy::linear(Duration::from_millis(10)),
        DelayStrategy::exponential(Duration::from_millis(10)),
    ] {
        let result = retry_with_timeout(
            &CancelSignal::new(),
            strategy,
            0,
            Duration::from_millis(10),
            |_| async { Err::<(), _>("dummy error") },
        )
        .await;

        let err = result.unwrap_err();
        assert!(err.is_cancelled(), "{:?}", err);
        assert_eq!(err.cause(), Some(CancelCause::DeadlineExceeded));
    }
}

#[tokio::test]
async fn jittered_strategies_finish_inside_timeout() {
    let cases = [
        DelayStrategy::from(
            Exponential::new(Duration::from_millis(10))
                .with_max_delay(Duration::from_millis(15))
                .with_max_jitter(Duration::from_millis(5)),
        ),
        DelayStrategy::from(
            Constant::new(Duration::from_millis(10)).with_max_jitter(Duration::from_millis(5)),
        ),
        DelayStrategy::from(
            Linear::new(Duration::from_millis(10)).with_max_jitter(Duration::from_millis(5)),
        ),
    ];

    for strategy in cases {
        let result = Retrier::new(strategy.clone())
            .with_timeout(Duration::from_millis(500))
            .retry(&CancelSignal::new(), fail_times(2))
            .await;
        assert_eq!(result, Ok(()), "{:?}", strategy);
    }
}

#[tokio::test]
async fn caller_cancellation_is_distinct_from_giving_up() {
    let signal = CancelSignal::new();
    let canceller = signal.clone();
    let attempts = AtomicU32::new(0);

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        canceller.cancel();
    });

    let result = Retrier::new(DelayStrategy::constant(Duration::from_millis(5)))
        .retry(&signal, |_| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>("dummy error") }
        })
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.cause(), Some(CancelCause::Cancelled));
    assert!(!err.is_max_attempts_exceeded());
    assert!(attempts.load(Ordering::SeqCst) >= 1);
}

#[tokio::test]
async fn immediate_success_calls_operation_once() {
    let retrier = Retrier::new(DelayStrategy::default()).with_max_attempts(5);

    for _ in 0..2 {
        let calls = AtomicU32::new(0);
        let result = retrier
            .retry(&CancelSignal::new(), |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, ()>("ok") }
            })
            .await;
        assert_eq!(result, Ok("ok"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
