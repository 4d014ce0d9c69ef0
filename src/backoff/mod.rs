//! Delay strategies.
//!
//! A strategy is a pure description of how long to wait after the `n`th
//! adverse event. Strategies hold only immutable configuration; the only
//! thing they draw from outside is randomness for jitter, which arrives
//! through [`DelayContext`].
//!
//! - [`Constant`]: `base ± jitter`
//! - [`Linear`]: `min(base × n, max) ± jitter`
//! - [`Exponential`]: `max(min(base × factorⁿ⁻¹, max) ± jitter, base)`
//!
//! [`DelayStrategy`] is the tagged union of the three, and the default
//! strategy type of [`Retrier`](crate::Retrier). Anything implementing
//! [`Backoff`] can be plugged into a retrier.
//!
//! # Examples
//!
//! ```rust
//! use backwater::{Backoff, Exponential};
//! use std::time::Duration;
//!
//! let backoff = Exponential::new(Duration::from_secs(1))
//!     .with_factor(2)
//!     .with_max_delay(Duration::from_secs(15));
//!
//! assert_eq!(backoff.delay_for(1), Duration::from_secs(1));
//! assert_eq!(backoff.delay_for(2), Duration::from_secs(2));
//! assert_eq!(backoff.delay_for(4), Duration::from_secs(8));
//! assert_eq!(backoff.delay_for(5), Duration::from_secs(15));
//! ```

mod constant;
mod exponential;
pub(crate) mod jitter;
mod linear;
mod pow;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::random::{RandomSource, ThreadRandom};

pub use constant::Constant;
pub use exponential::Exponential;
pub use linear::Linear;
pub use pow::{checked_pow, pow};

/// Inputs to a single delay computation.
#[derive(Debug, Clone, Copy)]
pub struct DelayContext<'a> {
    adverse_events: u64,
    base: Option<Duration>,
    rng: &'a dyn RandomSource,
}

impl<'a> DelayContext<'a> {
    /// Context for a delay preceded by `adverse_events` earlier failures.
    ///
    /// The retry loop passes `0` for the delay after the first failure.
    pub fn new(adverse_events: u64, rng: &'a dyn RandomSource) -> Self {
        Self {
            adverse_events,
            base: None,
            rng,
        }
    }

    /// Override the strategy's configured base delay for this computation.
    pub fn with_base(mut self, base: Duration) -> Self {
        self.base = Some(base);
        self
    }

    /// Number of failed attempts before the one that triggered this delay.
    pub fn adverse_events(&self) -> u64 {
        self.adverse_events
    }

    /// The base delay override, if any.
    pub fn base(&self) -> Option<Duration> {
        self.base
    }

    /// The randomness source for jitter.
    pub fn rng(&self) -> &'a dyn RandomSource {
        self.rng
    }
}

/// Maps a [`DelayContext`] to the time to wait before the next attempt.
///
/// Implementations must be stateless: a single instance is shared by every
/// concurrent retry run that uses it.
pub trait Backoff: Send + Sync + fmt::Debug {
    /// Compute the delay for `ctx`.
    fn delay(&self, ctx: &DelayContext<'_>) -> Duration;

    /// Delay after `adverse_events` failures, jittered from the thread-local generator.
    ///
    /// Deterministic when the strategy has no jitter configured.
    fn delay_for(&self, adverse_events: u64) -> Duration {
        self.delay(&DelayContext::new(adverse_events, &ThreadRandom))
    }
}

impl<B: Backoff + ?Sized> Backoff for &B {
    fn delay(&self, ctx: &DelayContext<'_>) -> Duration {
        (**self).delay(ctx)
    }
}

impl<B: Backoff + ?Sized> Backoff for Arc<B> {
    fn delay(&self, ctx: &DelayContext<'_>) -> Duration {
        (**self).delay(ctx)
    }
}

impl<B: Backoff + ?Sized> Backoff for Box<B> {
    fn delay(&self, ctx: &DelayContext<'_>) -> Duration {
        (**self).delay(ctx)
    }
}

/// One of the built-in strategies.
///
/// # Examples
///
/// ```rust
/// use backwater::{Backoff, DelayStrategy, Linear};
/// use std::time::Duration;
///
/// let constant = DelayStrategy::constant(Duration::from_millis(250));
/// assert_eq!(constant.delay_for(7), Duration::from_millis(250));
///
/// let linear: DelayStrategy = Linear::new(Duration::from_millis(100))
///     .with_max_delay(Duration::from_millis(250))
///     .into();
/// assert_eq!(linear.delay_for(2), Duration::from_millis(200));
/// assert_eq!(linear.delay_for(3), Duration::from_millis(250));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum DelayStrategy {
    /// Fixed delay.
    Constant(Constant),
    /// Delay grows by `base` per adverse event.
    Linear(Linear),
    /// Delay multiplies by `factor` per adverse event.
    Exponential(Exponential),
}

impl DelayStrategy {
    /// Constant delay without jitter.
    pub fn constant(delay: Duration) -> Self {
        Self::Constant(Constant::new(delay))
    }

    /// Linear delay without cap or jitter.
    pub fn linear(base: Duration) -> Self {
        Self::Linear(Linear::new(base))
    }

    /// Doubling delay without cap or jitter.
    pub fn exponential(base: Duration) -> Self {
        Self::Exponential(Exponential::new(base))
    }

    /// The base delay of the wrapped strategy.
    pub fn base(&self) -> Duration {
        match self {
            Self::Constant(c) => c.base(),
            Self::Linear(l) => l.base(),
            Self::Exponential(e) => e.base(),
        }
    }

    /// The jitter bound of the wrapped strategy.
    pub fn max_jitter(&self) -> Duration {
        match self {
            Self::Constant(c) => c.max_jitter(),
            Self::Linear(l) => l.max_jitter(),
            Self::Exponential(e) => e.max_jitter(),
        }
    }

    /// Replace the jitter bound of the wrapped strategy.
    pub fn with_max_jitter(self, max_jitter: Duration) -> Self {
        match self {
            Self::Constant(c) => Self::Constant(c.with_max_jitter(max_jitter)),
            Self::Linear(l) => Self::Linear(l.with_max_jitter(max_jitter)),
            Self::Exponential(e) => Self::Exponential(e.with_max_jitter(max_jitter)),
        }
    }
}

impl Default for DelayStrategy {
    /// 100ms doubling, capped at 30s, no jitter.
    fn default() -> Self {
        Self::Exponential(
            Exponential::new(Duration::from_millis(100)).with_max_delay(Duration::from_secs(30)),
        )
    }
}

impl Backoff for DelayStrategy {
    fn delay(&self, ctx: &DelayContext<'_>) -> Duration {
        match self {
            Self::Constant(c) => c.delay(ctx),
            Self::Linear(l) => l.delay(ctx),
            Self::Exponential(e) => e.delay(ctx),
        }
    }
}

impl From<Constant> for DelayStrategy {
    fn from(c: Constant) -> Self {
        Self::Constant(c)
    }
}

impl From<Linear> for DelayStrategy {
    fn from(l: Linear) -> Self {
        Self::Linear(l)
    }
}

impl From<Exponential> for DelayStrategy {
    fn from(e: Exponential) -> Self {
        Self::Exponential(e)
    }
}
