//! Tracing Demo
//!
//! Shows the events the retry loop emits when the `tracing` feature is on.
//!
//! Run with: cargo run --example tracing_demo --features tracing

use std::time::Duration;

use backwater::prelude::*;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let retrier = Retrier::new(
        Exponential::new(Duration::from_millis(20)).with_max_delay(Duration::from_millis(100)),
    )
    .with_max_attempts(4);

    let result = retrier
        .retry(&CancelSignal::new(), |_| async {
            Err::<(), _>("connection refused")
        })
        .await;

    tracing::info!(gave_up = result.is_err(), "done");
}
