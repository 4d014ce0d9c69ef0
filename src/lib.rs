//! # Backwater
//!
//! > *"Wait a moment, then try again"*
//!
//! Retry with backoff for async Rust.
//!
//! ## Philosophy
//!
//! **Backwater** keeps the same split as a pure core around an imperative shell:
//! - **Strategies** are pure data: given how many attempts have failed, they
//!   say how long to wait. No clocks, no global state.
//! - **The retrier** is the shell: it runs the operation, sleeps, and stops on
//!   success, on an attempt ceiling, or when a [`CancelSignal`] fires.
//!
//! ## Quick Example
//!
//! ```rust
//! use backwater::{CancelSignal, Exponential, Retrier, RetryError};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let retrier = Retrier::new(
//!     Exponential::new(Duration::from_millis(1))
//!         .with_max_delay(Duration::from_millis(50))
//!         .with_max_jitter(Duration::from_millis(1)),
//! )
//! .with_max_attempts(4)
//! .with_timeout(Duration::from_secs(2));
//!
//! let result = retrier
//!     .retry(&CancelSignal::new(), |_signal| async {
//!         Err::<(), _>("service unavailable")
//!     })
//!     .await;
//!
//! match result {
//!     Ok(()) => unreachable!(),
//!     Err(RetryError::MaxAttemptsExceeded { attempts, .. }) => assert_eq!(attempts, 4),
//!     Err(RetryError::Cancelled { cause, .. }) => println!("gave up: {}", cause),
//! }
//! # });
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod backoff;
pub mod random;
pub mod retry;
#[cfg(feature = "serde")]
mod serde_impl;
pub mod signal;

// Re-exports
pub use backoff::{Backoff, Constant, DelayContext, DelayStrategy, Exponential, Linear};
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use retry::{retry, retry_with_timeout, Retrier, RetryConfig, RetryError, RetryEvent};
pub use signal::{CancelCause, CancelSignal};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::backoff::{Backoff, Constant, DelayStrategy, Exponential, Linear};
    pub use crate::retry::{Retrier, RetryConfig, RetryError};
    pub use crate::signal::{CancelCause, CancelSignal};
}
