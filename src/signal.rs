//! Cooperative cancellation.
//!
//! A [`CancelSignal`] fires either when someone calls [`CancelSignal::cancel`]
//! or when its deadline passes. Signals form a tree: a child fires whenever
//! its parent does, but cancelling a child leaves the parent alone.
//!
//! The retry loop only ever *observes* a signal. It checks it between
//! attempts, races it against every backoff delay, and hands a clone to the
//! operation so long-running work can bail out on its own.
//!
//! # Examples
//!
//! ```rust
//! use backwater::{CancelCause, CancelSignal};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let parent = CancelSignal::new();
//! let child = parent.child_with_timeout(Duration::from_millis(5));
//!
//! assert_eq!(child.triggered().await, CancelCause::DeadlineExceeded);
//! assert!(!parent.is_triggered());
//! # });
//! ```

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};

/// Why a [`CancelSignal`] fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelCause {
    /// [`CancelSignal::cancel`] was called on the signal or an ancestor.
    Cancelled,
    /// The signal's deadline passed.
    DeadlineExceeded,
}

impl fmt::Display for CancelCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "operation was cancelled"),
            Self::DeadlineExceeded => write!(f, "deadline exceeded"),
        }
    }
}

impl std::error::Error for CancelCause {}

/// A clonable cancellation handle with an optional deadline.
///
/// Clones share state: cancelling one clone cancels them all.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CancelSignal {
    /// A root signal that only fires when cancelled explicitly.
    pub fn new() -> Self {
        Self::default()
    }

    /// A root signal that also fires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// A root signal that also fires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().child_with_timeout(timeout)
    }

    /// A child inheriting this signal's cancellation and deadline.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// A child whose deadline is the earlier of this signal's and `deadline`.
    pub fn child_with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(parent) => parent.min(deadline),
            None => deadline,
        };
        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    /// A child that fires at the latest `timeout` from now.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.child_with_deadline(deadline),
            None => self.child(),
        }
    }

    /// Fire this signal and every child derived from it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The absolute deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Why the signal has fired, or `None` while it is still live.
    ///
    /// Explicit cancellation takes precedence over an expired deadline.
    pub fn cause(&self) -> Option<CancelCause> {
        if self.token.is_cancelled() {
            return Some(CancelCause::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(CancelCause::DeadlineExceeded),
            _ => None,
        }
    }

    /// Whether the signal has fired.
    pub fn is_triggered(&self) -> bool {
        self.cause().is_some()
    }

    /// Wait until the signal fires.
    pub async fn triggered(&self) -> CancelCause {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.token.cancelled() => CancelCause::Cancelled,
                _ = tokio::time::sleep_until(deadline) => CancelCause::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                CancelCause::Cancelled
            }
        }
    }

    /// Wait for `duration`, or until the signal fires, whichever comes first.
    ///
    /// Returns `Err` with the cause if the signal won.
    pub async fn sleep(&self, duration: Duration) -> Result<(), CancelCause> {
        if let Some(cause) = self.cause() {
            return Err(cause);
        }
        tokio::select! {
            biased;
            cause = self.triggered() => Err(cause),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }

    /// Cancels this signal when the guard is dropped.
    pub(crate) fn drop_guard(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }
}
