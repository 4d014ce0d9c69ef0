//! Duration arithmetic shared by the strategies.

use std::time::Duration;

use crate::random::RandomSource;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Perturb `delay` by an offset drawn uniformly from `[-max_jitter, max_jitter)`.
///
/// A zero `max_jitter` returns `delay` unchanged without touching `rng`.
/// The result never goes below zero.
pub(crate) fn apply(delay: Duration, max_jitter: Duration, rng: &dyn RandomSource) -> Duration {
    if max_jitter.is_zero() {
        return delay;
    }

    let bound = saturating_nanos(max_jitter);
    let sample = rng.below(bound.saturating_mul(2));

    if sample >= bound {
        delay.saturating_add(Duration::from_nanos(sample - bound))
    } else {
        delay.saturating_sub(Duration::from_nanos(bound - sample))
    }
}

/// `delay * factor`, saturating at `Duration::MAX`.
pub(crate) fn scale(delay: Duration, factor: u64) -> Duration {
    let nanos = delay.as_nanos().saturating_mul(u128::from(factor));
    let secs = nanos / NANOS_PER_SEC;
    if secs > u128::from(u64::MAX) {
        return Duration::MAX;
    }
    Duration::new(secs as u64, (nanos % NANOS_PER_SEC) as u32)
}

/// Optional upper bound; `None` leaves the delay untouched.
pub(crate) fn cap(delay: Duration, max: Option<Duration>) -> Duration {
    match max {
        Some(max) => delay.min(max),
        None => delay,
    }
}

fn saturating_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;

    /// Always returns the same sample, clamped into range.
    #[derive(Debug)]
    struct Fixed(u64);

    impl RandomSource for Fixed {
        fn below(&self, upper: u64) -> u64 {
            self.0.min(upper.saturating_sub(1))
        }
    }

    #[test]
    fn test_zero_jitter_is_identity() {
        let d = Duration::from_millis(10);
        assert_eq!(apply(d, Duration::ZERO, &Fixed(123)), d);
    }

    #[test]
    fn test_lowest_sample_subtracts_full_bound() {
        let d = Duration::from_millis(10);
        let j = Duration::from_millis(5);
        assert_eq!(apply(d, j, &Fixed(0)), Duration::from_millis(5));
    }

    #[test]
    fn test_highest_sample_stays_below_upper_bound() {
        let d = Duration::from_millis(10);
        let j = Duration::from_millis(5);
        let got = apply(d, j, &Fixed(u64::MAX));
        assert_eq!(got, Duration::from_millis(15) - Duration::from_nanos(1));
    }

    #[test]
    fn test_never_negative() {
        let d = Duration::from_millis(1);
        let j = Duration::from_millis(50);
        assert_eq!(apply(d, j, &Fixed(0)), Duration::ZERO);
    }

    #[test]
    fn test_symmetric_range() {
        let rng = SeededRandom::new(3);
        let d = Duration::from_millis(100);
        let j = Duration::from_millis(20);
        for _ in 0..1_000 {
            let got = apply(d, j, &rng);
            assert!(got >= Duration::from_millis(80));
            assert!(got < Duration::from_millis(120));
        }
    }

    #[test]
    fn test_scale() {
        assert_eq!(
            scale(Duration::from_millis(100), 8),
            Duration::from_millis(800)
        );
        assert_eq!(scale(Duration::from_millis(100), 0), Duration::ZERO);
        assert_eq!(scale(Duration::from_secs(1), u64::MAX), Duration::from_secs(u64::MAX));
        assert_eq!(scale(Duration::from_secs(2), u64::MAX), Duration::MAX);
    }

    #[test]
    fn test_cap() {
        let d = Duration::from_secs(10);
        assert_eq!(cap(d, None), d);
        assert_eq!(cap(d, Some(Duration::from_secs(3))), Duration::from_secs(3));
        assert_eq!(cap(d, Some(Duration::from_secs(30))), d);
    }
}
