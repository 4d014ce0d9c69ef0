//! Linearly increasing delay.

use std::time::Duration;

use super::{jitter, Backoff, DelayContext};

/// Delay grows by `base` with every adverse event.
///
/// Delay = `min(base × n, max_delay) ± jitter`, never below zero. The cap
/// bounds the non-jittered part only, so the largest possible delay is
/// `max_delay + max_jitter`.
///
/// # Examples
///
/// ```rust
/// use backwater::{Backoff, Linear};
/// use std::time::Duration;
///
/// let backoff = Linear::new(Duration::from_millis(100))
///     .with_max_delay(Duration::from_millis(350));
///
/// assert_eq!(backoff.delay_for(1), Duration::from_millis(100));
/// assert_eq!(backoff.delay_for(2), Duration::from_millis(200));
/// assert_eq!(backoff.delay_for(3), Duration::from_millis(300));
/// assert_eq!(backoff.delay_for(4), Duration::from_millis(350));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Linear {
    #[cfg_attr(feature = "serde", serde(rename = "base_ms", with = "crate::serde_impl::millis"))]
    base: Duration,
    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "max_delay_ms",
            default,
            with = "crate::serde_impl::option_millis"
        )
    )]
    max_delay: Option<Duration>,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "max_jitter_ms", default, with = "crate::serde_impl::millis")
    )]
    max_jitter: Duration,
}

impl Linear {
    /// Linear growth by `base`, uncapped, no jitter.
    pub fn new(base: Duration) -> Self {
        Self {
            base,
            max_delay: None,
            max_jitter: Duration::ZERO,
        }
    }

    /// Cap the non-jittered delay.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    /// Jitter each delay uniformly within `[-max_jitter, max_jitter)`.
    pub fn with_max_jitter(mut self, max_jitter: Duration) -> Self {
        self.max_jitter = max_jitter;
        self
    }

    /// The slope.
    pub fn base(&self) -> Duration {
        self.base
    }

    /// The cap, if any.
    pub fn max_delay(&self) -> Option<Duration> {
        self.max_delay
    }

    /// The jitter bound.
    pub fn max_jitter(&self) -> Duration {
        self.max_jitter
    }
}

impl Backoff for Linear {
    fn delay(&self, ctx: &DelayContext<'_>) -> Duration {
        let base = ctx.base().unwrap_or(self.base);
        let grown = jitter::cap(jitter::scale(base, ctx.adverse_events()), self.max_delay);
        jitter::apply(grown, self.max_jitter, ctx.rng())
    }
}
