//! The retry loop.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::backoff::{Backoff, DelayContext, DelayStrategy};
use crate::random::{RandomSource, ThreadRandom};
use crate::signal::CancelSignal;

use super::error::RetryError;

/// Information about a failed attempt, passed to hooks.
#[derive(Debug, Clone)]
pub struct RetryEvent<'a, E> {
    /// Which attempt just failed (1-indexed).
    pub attempt: u32,
    /// The error from the failed attempt.
    pub error: &'a E,
    /// Delay before the next attempt.
    pub next_delay: Duration,
    /// Total elapsed time since the first attempt.
    pub elapsed: Duration,
}

/// Retries an operation according to a [`Backoff`] strategy.
///
/// A retrier is plain configuration: it can be shared and used for any number
/// of concurrent runs, each of which keeps its own attempt count.
///
/// # Bounds
///
/// - `max_attempts`: total attempts including the first; `0` means unlimited.
/// - `timeout`: deadline for the whole run, layered on the caller's signal.
///
/// With neither bound the run only ends on success or when the caller's
/// signal fires.
///
/// # Examples
///
/// ```rust
/// use backwater::{CancelSignal, Exponential, Retrier};
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let retrier = Retrier::new(Exponential::new(Duration::from_millis(1)))
///     .with_max_attempts(5)
///     .with_timeout(Duration::from_secs(1));
///
/// let calls = AtomicU32::new(0);
/// let result = retrier
///     .retry(&CancelSignal::new(), |_signal| {
///         let n = calls.fetch_add(1, Ordering::SeqCst);
///         async move { if n < 2 { Err("not yet") } else { Ok(n) } }
///     })
///     .await;
///
/// assert_eq!(result, Ok(2));
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct Retrier<B = DelayStrategy> {
    backoff: B,
    max_attempts: u32,
    timeout: Option<Duration>,
    rng: Arc<dyn RandomSource>,
}

impl<B: Backoff> Retrier<B> {
    /// Unlimited attempts, no timeout, jitter from the thread-local generator.
    pub fn new(backoff: B) -> Self {
        Self {
            backoff,
            max_attempts: 0,
            timeout: None,
            rng: Arc::new(ThreadRandom),
        }
    }

    /// Stop after `n` failed attempts. `0` means unlimited.
    pub fn with_max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Give the whole run a deadline of `timeout` from its start.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Draw jitter from `rng` instead of the thread-local generator.
    pub fn with_random_source<R: RandomSource + 'static>(self, rng: R) -> Self {
        self.with_shared_random_source(Arc::new(rng))
    }

    /// Draw jitter from a generator shared with other retriers.
    pub fn with_shared_random_source(mut self, rng: Arc<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    /// The delay strategy.
    pub fn backoff(&self) -> &B {
        &self.backoff
    }

    /// The attempt ceiling, `0` for unlimited.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// The per-run timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run `operation` until it succeeds, the attempt ceiling is hit, or
    /// `signal` fires.
    ///
    /// The operation receives the signal governing the run (a child of
    /// `signal` when a timeout is configured) so it can stop early on its own.
    /// Operation errors are never inspected; every failure is retried.
    pub async fn retry<T, E, F, Fut>(
        &self,
        signal: &CancelSignal,
        operation: F,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut(CancelSignal) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.retry_with_hooks(signal, operation, |_: &RetryEvent<'_, E>| {})
            .await
    }

    /// Like [`retry`](Self::retry), calling `on_retry` after every failed
    /// attempt that will be retried.
    ///
    /// The hook is synchronous and runs before the backoff delay; use it for
    /// logging or metrics.
    ///
    /// # Example
    ///
    /// ```rust
    /// use backwater::{CancelSignal, DelayStrategy, Retrier, RetryEvent};
    /// use std::time::Duration;
    ///
    /// # tokio_test::block_on(async {
    /// let retrier = Retrier::new(DelayStrategy::constant(Duration::from_millis(1)))
    ///     .with_max_attempts(3);
    ///
    /// let mut seen = Vec::new();
    /// let result = retrier
    ///     .retry_with_hooks(
    ///         &CancelSignal::new(),
    ///         |_| async { Err::<(), _>("down") },
    ///         |event: &RetryEvent<'_, &str>| seen.push(event.attempt),
    ///     )
    ///     .await;
    ///
    /// assert!(result.is_err());
    /// assert_eq!(seen, vec![1, 2]);
    /// # });
    /// ```
    pub async fn retry_with_hooks<T, E, F, Fut, H>(
        &self,
        signal: &CancelSignal,
        operation: F,
        on_retry: H,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut(CancelSignal) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        H: FnMut(&RetryEvent<'_, E>),
    {
        match self.timeout {
            Some(timeout) => {
                let scoped = signal.child_with_timeout(timeout);
                let _release = scoped.drop_guard();
                self.run(&scoped, operation, on_retry).await
            }
            None => self.run(signal, operation, on_retry).await,
        }
    }

    async fn run<T, E, F, Fut, H>(
        &self,
        signal: &CancelSignal,
        mut operation: F,
        mut on_retry: H,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut(CancelSignal) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        H: FnMut(&RetryEvent<'_, E>),
    {
        let start = Instant::now();
        let mut adverse_events: u32 = 0;
        let mut last_error: Option<E> = None;

        loop {
            if let Some(cause) = signal.cause() {
                #[cfg(feature = "tracing")]
                tracing::warn!(attempts = adverse_events, %cause, "retry cancelled");
                return Err(RetryError::cancelled(cause, last_error));
            }

            let error = match operation(signal.clone()).await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };
            let attempt = adverse_events.saturating_add(1);

            if self.max_attempts > 0 && attempt >= self.max_attempts {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    attempts = attempt,
                    max_attempts = self.max_attempts,
                    "max attempts exceeded"
                );
                return Err(RetryError::MaxAttemptsExceeded {
                    attempts: attempt,
                    max_attempts: self.max_attempts,
                    last_error: error,
                });
            }

            // Strategies see the failures before this one.
            let delay = self
                .backoff
                .delay(&DelayContext::new(u64::from(adverse_events), &*self.rng));

            on_retry(&RetryEvent {
                attempt,
                error: &error,
                next_delay: delay,
                elapsed: start.elapsed(),
            });

            #[cfg(feature = "tracing")]
            tracing::debug!(attempt, ?delay, "attempt failed, backing off");

            adverse_events = attempt;
            last_error = Some(error);

            if let Err(cause) = signal.sleep(delay).await {
                #[cfg(feature = "tracing")]
                tracing::warn!(attempts = adverse_events, %cause, "retry cancelled while backing off");
                return Err(RetryError::cancelled(cause, last_error));
            }
        }
    }
}

/// Retry `operation` with `backoff` until success, `max_attempts` failures
/// (`0` for unlimited), or `signal` fires.
///
/// Shorthand for `Retrier::new(backoff).with_max_attempts(max_attempts).retry(signal, operation)`.
pub async fn retry<B, T, E, F, Fut>(
    signal: &CancelSignal,
    backoff: B,
    max_attempts: u32,
    operation: F,
) -> Result<T, RetryError<E>>
where
    B: Backoff,
    F: FnMut(CancelSignal) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    Retrier::new(backoff)
        .with_max_attempts(max_attempts)
        .retry(signal, operation)
        .await
}

/// [`retry`] bounded by a deadline `timeout` from now.
///
/// The derived signal is released when the run ends, whatever the outcome.
pub async fn retry_with_timeout<B, T, E, F, Fut>(
    signal: &CancelSignal,
    backoff: B,
    max_attempts: u32,
    timeout: Duration,
    operation: F,
) -> Result<T, RetryError<E>>
where
    B: Backoff,
    F: FnMut(CancelSignal) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    Retrier::new(backoff)
        .with_max_attempts(max_attempts)
        .with_timeout(timeout)
        .retry(signal, operation)
        .await
}
