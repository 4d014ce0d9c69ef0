//! Retry Patterns Example
//!
//! Demonstrates retrying flaky async work with backwater:
//! - Comparing the delay sequences of the built-in strategies
//! - Basic retry with an attempt ceiling
//! - Bounding a run with a timeout
//! - Cancelling a run from the outside
//! - Observing failures through a hook

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use backwater::prelude::*;
use backwater::{RetryEvent, SeededRandom};

// ==================== Backoff Strategies ====================

/// Example 1: how delays grow with each strategy
fn example_backoff_strategies() {
    println!("\n=== Example 1: Backoff Strategies ===");

    let constant = Constant::new(Duration::from_millis(100));
    let linear = Linear::new(Duration::from_millis(100)).with_max_delay(Duration::from_millis(350));
    let exponential = Exponential::new(Duration::from_millis(100))
        .with_factor(2)
        .with_max_delay(Duration::from_secs(1));

    for events in 0..6 {
        println!(
            "  after failure {}: constant {:?}, linear {:?}, exponential {:?}",
            events + 1,
            constant.delay_for(events),
            linear.delay_for(events),
            exponential.delay_for(events),
        );
    }
}

// ==================== Basic Retry ====================

/// Example 2: retry until success or three attempts
async fn example_basic_retry() {
    println!("\n=== Example 2: Basic Retry ===");

    let attempts = Arc::new(AtomicU32::new(0));
    let retrier = Retrier::new(DelayStrategy::exponential(Duration::from_millis(50)))
        .with_max_attempts(3);

    let result = retrier
        .retry(&CancelSignal::new(), |_| {
            let attempts = attempts.clone();
            async move {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                println!("  Attempt {}", n + 1);
                if n < 2 {
                    Err("transient failure")
                } else {
                    Ok("success!")
                }
            }
        })
        .await;

    match result {
        Ok(value) => println!("Succeeded: {}", value),
        Err(e) => println!("Failed: {}", e),
    }
}

// ==================== Timeout ====================

/// Example 3: a run that never succeeds, bounded by a deadline
async fn example_timeout() {
    println!("\n=== Example 3: Timeout ===");

    let retrier = Retrier::new(
        Constant::new(Duration::from_millis(40)).with_max_jitter(Duration::from_millis(10)),
    )
    .with_timeout(Duration::from_millis(150))
    .with_random_source(SeededRandom::new(7));

    let result = retrier
        .retry(&CancelSignal::new(), |_| async {
            Err::<(), _>("service unavailable")
        })
        .await;

    if let Err(e) = result {
        println!("Stopped: {} (deadline: {})", e, e.is_deadline_exceeded());
    }
}

// ==================== Cancellation ====================

/// Example 4: a caller abandoning the run
async fn example_cancellation() {
    println!("\n=== Example 4: Cancellation ===");

    let signal = CancelSignal::new();
    let canceller = signal.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(120)).await;
        println!("  caller cancels");
        canceller.cancel();
    });

    let result = Retrier::new(DelayStrategy::linear(Duration::from_millis(50)))
        .retry(&signal, |_| async { Err::<(), _>("still down") })
        .await;

    match result {
        Err(RetryError::Cancelled { cause, last_error }) => {
            println!("Cancelled ({}), last error: {:?}", cause, last_error)
        }
        other => println!("Unexpected: {:?}", other),
    }
}

// ==================== Hooks ====================

/// Example 5: logging every failed attempt
async fn example_hooks() {
    println!("\n=== Example 5: Retry Hooks ===");

    let retrier = Retrier::new(DelayStrategy::exponential(Duration::from_millis(10)))
        .with_max_attempts(4);

    let result = retrier
        .retry_with_hooks(
            &CancelSignal::new(),
            |_| async { Err::<(), _>("boom") },
            |event: &RetryEvent<'_, &str>| {
                println!(
                    "  attempt {} failed ({}), retrying in {:?} [{:?} elapsed]",
                    event.attempt, event.error, event.next_delay, event.elapsed
                );
            },
        )
        .await;

    if let Err(e) = result {
        println!("Gave up: {}", e);
    }
}

#[tokio::main]
async fn main() {
    println!("Backwater Retry Patterns");
    println!("========================");

    example_backoff_strategies();
    example_basic_retry().await;
    example_timeout().await;
    example_cancellation().await;
    example_hooks().await;

    println!("\n=== All examples completed ===");
}
