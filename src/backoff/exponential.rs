//! Exponentially increasing delay.

use std::time::Duration;

use super::{jitter, pow, Backoff, DelayContext};

const MIN_FACTOR: u64 = 2;

/// Delay multiplies by `factor` with every adverse event.
///
/// Delay = `max(min(base × factorⁿ⁻¹, max_delay) ± jitter, base)`, where `n`
/// is the number of adverse events (`0` is treated as `1`).
///
/// - The factor is at least 2; smaller values are raised at construction.
/// - The result is never below `base`, even when jitter is subtracted.
/// - The cap bounds the non-jittered part, so the largest possible delay is
///   `max_delay + max_jitter`.
///
/// # Examples
///
/// ```rust
/// use backwater::{Backoff, Exponential};
/// use std::time::Duration;
///
/// let backoff = Exponential::new(Duration::from_millis(100))
///     .with_factor(3)
///     .with_max_delay(Duration::from_secs(2));
///
/// assert_eq!(backoff.delay_for(1), Duration::from_millis(100));
/// assert_eq!(backoff.delay_for(2), Duration::from_millis(300));
/// assert_eq!(backoff.delay_for(3), Duration::from_millis(900));
/// assert_eq!(backoff.delay_for(4), Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exponential {
    #[cfg_attr(feature = "serde", serde(rename = "base_ms", with = "crate::serde_impl::millis"))]
    base: Duration,
    #[cfg_attr(
        feature = "serde",
        serde(
            default = "default_factor",
            deserialize_with = "crate::serde_impl::factor_at_least_two"
        )
    )]
    factor: u64,
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

#[cfg(feature = "serde")]
fn default_factor() -> u64 {
    MIN_FACTOR
}

impl Exponential {
    /// Doubling from `base`, uncapped, no jitter.
    pub fn new(base: Duration) -> Self {
        Self {
            base,
            factor: MIN_FACTOR,
            max_delay: None,
            max_jitter: Duration::ZERO,
        }
    }

    /// Growth factor per adverse event. Values below 2 become 2.
    pub fn with_factor(mut self, factor: u64) -> Self {
        self.factor = factor.max(MIN_FACTOR);
        self
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

    /// The delay after the first adverse event, and the floor for all delays.
    pub fn base(&self) -> Duration {
        self.base
    }

    /// The growth factor.
    pub fn factor(&self) -> u64 {
        self.factor
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

impl Backoff for Exponential {
    fn delay(&self, ctx: &DelayContext<'_>) -> Duration {
        let base = ctx.base().unwrap_or(self.base);
        let exponent = ctx.adverse_events().max(1) - 1;
        let multiplier = pow(self.factor, exponent);

        let grown = jitter::cap(jitter::scale(base, multiplier), self.max_delay);
        jitter::apply(grown, self.max_jitter, ctx.rng()).max(base)
    }
}
