//! Error type for retry runs.

use std::fmt;

use crate::signal::CancelCause;

/// Why a retry run ended without success.
///
/// A run reports exactly one of two terminal conditions, so callers can tell
/// "gave up after N tries" apart from "was told to stop".
///
/// # Examples
///
/// ```rust
/// use backwater::{CancelSignal, DelayStrategy, Retrier, RetryError};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let retrier = Retrier::new(DelayStrategy::constant(Duration::from_millis(1)))
///     .with_max_attempts(3);
///
/// let result = retrier
///     .retry(&CancelSignal::new(), |_| async { Err::<(), _>("always fails") })
///     .await;
///
/// match result {
///     Err(RetryError::MaxAttemptsExceeded { attempts, max_attempts, last_error }) => {
///         assert_eq!(attempts, 3);
///         assert_eq!(max_attempts, 3);
///         assert_eq!(last_error, "always fails");
///     }
///     other => panic!("unexpected: {:?}", other),
/// }
/// # });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError<E> {
    /// The attempt ceiling was reached without success.
    MaxAttemptsExceeded {
        /// Attempts made, including the first.
        attempts: u32,
        /// The configured ceiling.
        max_attempts: u32,
        /// The error from the final attempt.
        last_error: E,
    },
    /// The cancellation signal fired.
    Cancelled {
        /// Explicit cancellation or deadline expiry.
        cause: CancelCause,
        /// The error from the most recent attempt, if one was made.
        last_error: Option<E>,
    },
}

impl<E> RetryError<E> {
    pub(crate) fn cancelled(cause: CancelCause, last_error: Option<E>) -> Self {
        Self::Cancelled { cause, last_error }
    }

    /// Returns true if the attempt ceiling was reached.
    pub fn is_max_attempts_exceeded(&self) -> bool {
        matches!(self, Self::MaxAttemptsExceeded { .. })
    }

    /// Returns true if the run was cancelled or timed out.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Returns true if the run stopped because a deadline passed.
    pub fn is_deadline_exceeded(&self) -> bool {
        self.cause() == Some(CancelCause::DeadlineExceeded)
    }

    /// The cancellation cause, if the run was cancelled.
    pub fn cause(&self) -> Option<CancelCause> {
        match self {
            Self::Cancelled { cause, .. } => Some(*cause),
            Self::MaxAttemptsExceeded { .. } => None,
        }
    }

    /// Attempts made, if the ceiling was reached.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::MaxAttemptsExceeded { attempts, .. } => Some(*attempts),
            Self::Cancelled { .. } => None,
        }
    }

    /// The error from the last attempt, if any attempt was made.
    pub fn last_error(&self) -> Option<&E> {
        match self {
            Self::MaxAttemptsExceeded { last_error, .. } => Some(last_error),
            Self::Cancelled { last_error, .. } => last_error.as_ref(),
        }
    }

    /// Extract the error from the last attempt, discarding metadata.
    pub fn into_last_error(self) -> Option<E> {
        match self {
            Self::MaxAttemptsExceeded { last_error, .. } => Some(last_error),
            Self::Cancelled { last_error, .. } => last_error,
        }
    }

    /// Transform the carried operation error.
    pub fn map_err<F, E2>(self, f: F) -> RetryError<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Self::MaxAttemptsExceeded {
                attempts,
                max_attempts,
                last_error,
            } => RetryError::MaxAttemptsExceeded {
                attempts,
                max_attempts,
                last_error: f(last_error),
            },
            Self::Cancelled { cause, last_error } => RetryError::Cancelled {
                cause,
                last_error: last_error.map(f),
            },
        }
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxAttemptsExceeded {
                attempts,
                max_attempts,
                last_error,
            } => write!(
                f,
                "{} out of {} maximum attempts failed: {}",
                attempts, max_attempts, last_error
            ),
            Self::Cancelled {
                cause,
                last_error: Some(e),
            } => write!(f, "retry stopped, {}: {}", cause, e),
            Self::Cancelled {
                cause,
                last_error: None,
            } => write!(f, "retry stopped before first attempt, {}", cause),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MaxAttemptsExceeded { last_error, .. } => Some(last_error),
            Self::Cancelled {
                last_error: Some(e),
                ..
            } => Some(e),
            Self::Cancelled { cause, .. } => Some(cause),
        }
    }
}
