//! Retrying fallible async operations.
//!
//! A [`Retrier`] is just configuration: a [`Backoff`](crate::Backoff)
//! strategy, an attempt ceiling and an optional timeout. Running it drives a
//! small state machine:
//!
//! - the operation succeeds: its value is returned
//! - it fails and the ceiling is reached: [`RetryError::MaxAttemptsExceeded`]
//! - the signal fires, before an attempt or during a delay: [`RetryError::Cancelled`]
//! - otherwise: wait for the strategy's delay and try again
//!
//! Every failure is treated as retryable. Deciding which errors are worth
//! retrying is up to the operation, which can map permanent failures to
//! success values or cancel the signal it was handed.
//!
//! # Quick Start
//!
//! ```rust
//! use backwater::{CancelSignal, DelayStrategy, Retrier};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let retrier = Retrier::new(DelayStrategy::exponential(Duration::from_millis(10)))
//!     .with_max_attempts(3);
//!
//! let value = retrier
//!     .retry(&CancelSignal::new(), |_| async { Ok::<_, String>(42) })
//!     .await;
//!
//! assert_eq!(value, Ok(42));
//! # });
//! ```
//!
//! # Error Types
//!
//! - [`RetryError`]: the single terminal condition of a failed run

mod config;
mod error;
mod retrier;

pub use config::RetryConfig;
pub use error::RetryError;
pub use retrier::{retry, retry_with_timeout, Retrier, RetryEvent};
