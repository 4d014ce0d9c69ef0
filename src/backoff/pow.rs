//! Exact integer exponentiation.
//!
//! Used by [`Exponential`](super::Exponential) so integer growth factors never
//! go through floating point.

/// Raise `base` to `exponent` using binary exponentiation.
///
/// Saturates at `u64::MAX` instead of wrapping, so callers clamping the result
/// against a maximum delay always see a value at least as large as the true one.
///
/// # Examples
///
/// ```rust
/// use backwater::backoff::pow;
///
/// assert_eq!(pow(2, 8), 256);
/// assert_eq!(pow(3, 4), 81);
/// assert_eq!(pow(7, 0), 1);
/// assert_eq!(pow(2, 64), u64::MAX);
/// ```
pub fn pow(base: u64, exponent: u64) -> u64 {
    checked_pow(base, exponent).unwrap_or(u64::MAX)
}

/// Like [`pow`], but returns `None` on overflow.
pub fn checked_pow(mut base: u64, mut exponent: u64) -> Option<u64> {
    let mut result: u64 = 1;

    while exponent != 0 {
        if exponent & 1 != 0 {
            result = result.checked_mul(base)?;
        }

        exponent >>= 1;
        if exponent != 0 {
            base = base.checked_mul(base)?;
        }
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_exponent_is_one() {
        assert_eq!(pow(0, 0), 1);
        assert_eq!(pow(1, 0), 1);
        assert_eq!(pow(u64::MAX, 0), 1);
    }

    #[test]
    fn test_known_values() {
        assert_eq!(pow(2, 8), 256);
        assert_eq!(pow(3, 4), 81);
        assert_eq!(pow(10, 3), 1000);
        assert_eq!(pow(0, 5), 0);
        assert_eq!(pow(1, 1_000_000), 1);
    }

    #[test]
    fn test_matches_repeated_multiplication() {
        for base in 0..8u64 {
            for exponent in 0..10u64 {
                let expected = (0..exponent).fold(1u64, |acc, _| acc * base);
                assert_eq!(pow(base, exponent), expected, "{}^{}", base, exponent);
            }
        }
    }

    #[test]
    fn test_largest_exact_power() {
        assert_eq!(checked_pow(2, 63), Some(1 << 63));
    }

    #[test]
    fn test_overflow_saturates() {
        assert_eq!(checked_pow(2, 64), None);
        assert_eq!(pow(2, 64), u64::MAX);
        assert_eq!(pow(3, 1_000), u64::MAX);
    }

    #[test]
    fn test_base_squaring_past_last_bit_does_not_overflow() {
        // 2^32 squared would overflow, but is never needed for 2^32 itself.
        assert_eq!(checked_pow(1 << 32, 1), Some(1 << 32));
    }
}
