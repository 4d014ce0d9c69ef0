//! Constant delay.

use std::time::Duration;

use super::{jitter, Backoff, DelayContext};

/// The same delay after every adverse event, optionally jittered.
///
/// Delay = `base ± jitter`, never below zero.
///
/// # Examples
///
/// ```rust
/// use backwater::{Backoff, Constant};
/// use std::time::Duration;
///
/// let backoff = Constant::new(Duration::from_millis(500));
///
/// assert_eq!(backoff.delay_for(1), Duration::from_millis(500));
/// assert_eq!(backoff.delay_for(10), Duration::from_millis(500));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constant {
    #[cfg_attr(feature = "serde", serde(rename = "base_ms", with = "crate::serde_impl::millis"))]
    base: Duration,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "max_jitter_ms", default, with = "crate::serde_impl::millis")
    )]
    max_jitter: Duration,
}

impl Constant {
    /// Constant delay of `base`, no jitter.
    pub fn new(base: Duration) -> Self {
        Self {
            base,
            max_jitter: Duration::ZERO,
        }
    }

    /// Jitter each delay uniformly within `[-max_jitter, max_jitter)`.
    pub fn with_max_jitter(mut self, max_jitter: Duration) -> Self {
        self.max_jitter = max_jitter;
        self
    }

    /// The configured delay.
    pub fn base(&self) -> Duration {
        self.base
    }

    /// The jitter bound.
    pub fn max_jitter(&self) -> Duration {
        self.max_jitter
    }
}

impl Backoff for Constant {
    fn delay(&self, ctx: &DelayContext<'_>) -> Duration {
        let base = ctx.base().unwrap_or(self.base);
        jitter::apply(base, self.max_jitter, ctx.rng())
    }
}
