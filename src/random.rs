//! Randomness sources for jitter.
//!
//! Strategies never reach for a global generator on their own. The
//! [`Retrier`](crate::Retrier) owns an `Arc<dyn RandomSource>` and hands it to
//! every delay computation through [`DelayContext`](crate::DelayContext), so a
//! test can swap in [`SeededRandom`] and get reproducible jitter.
//!
//! # Examples
//!
//! ```rust
//! use backwater::random::{RandomSource, SeededRandom};
//!
//! let a = SeededRandom::new(7);
//! let b = SeededRandom::new(7);
//!
//! let xs: Vec<u64> = (0..5).map(|_| a.below(1_000)).collect();
//! let ys: Vec<u64> = (0..5).map(|_| b.below(1_000)).collect();
//! assert_eq!(xs, ys);
//! ```

use std::fmt;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A thread-safe source of uniformly distributed integers.
pub trait RandomSource: Send + Sync + fmt::Debug {
    /// Draw a value uniformly from `[0, upper)`.
    ///
    /// Returns `0` when `upper` is `0`.
    fn below(&self, upper: u64) -> u64;
}

/// Draws from the thread-local generator (`rand::rng()`).
///
/// Lock free: every thread has its own generator, seeded from the OS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn below(&self, upper: u64) -> u64 {
        if upper == 0 {
            return 0;
        }
        rand::rng().random_range(0..upper)
    }
}

/// A deterministic generator seeded once at construction.
///
/// Shared behind a mutex, so concurrent retry runs draw from one sequence.
/// There is no way to reseed an existing instance.
pub struct SeededRandom {
    seed: u64,
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    /// Create a generator from a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// The seed this generator was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl fmt::Debug for SeededRandom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeededRandom")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl RandomSource for SeededRandom {
    fn below(&self, upper: u64) -> u64 {
        if upper == 0 {
            return 0;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.random_range(0..upper)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for std::sync::Arc<R> {
    fn below(&self, upper: u64) -> u64 {
        (**self).below(upper)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &R {
    fn below(&self, upper: u64) -> u64 {
        (**self).below(upper)
    }
}
