//! Exact scaling by powers of two and three.
//!
//! Powers of three are plain shifts of both masks because the masks are
//! indexed by base-3 position. Powers of two have no shift form in base 3
//! and go through the adder.

use crate::ternary::{add, Result, TernaryError, Word64};

/// Multiply by 2 via `w + w`.
#[inline]
pub fn double_value(w: Word64) -> Result<Word64> {
    add(w, w)
}

/// Multiply by 2^k.
///
/// Odd exponents peel off one doubling, even exponents recurse on the half,
/// so the recursion depth is logarithmic in `k`. Any non-zero word overflows
/// past k = 100, and zero is returned as is.
pub fn multiply_by_pow2(w: Word64, k: u32) -> Result<Word64> {
    if w.is_zero() {
        return Ok(w);
    }
    match k {
        0 => Ok(w),
        k if k % 2 == 1 => double_value(multiply_by_pow2(w, k - 1)?),
        k => multiply_by_pow2(multiply_by_pow2(w, k / 2)?, k / 2),
    }
}

/// Multiply by 3^k (shift left by `k` trits).
///
/// Fails with [`TernaryError::Overflow`] if a non-zero trit would be shifted
/// out of the window.
pub fn mul_pow3(w: Word64, k: u32) -> Result<Word64> {
    if w.is_zero() {
        return Ok(w);
    }
    if k >= u64::BITS || w.trit_size() + k > u64::BITS {
        return Err(TernaryError::Overflow);
    }
    Ok(Word64::from_masks_unchecked(w.neg_mask() << k, w.pos_mask() << k))
}

/// Divide by 3^k (shift right by `k` trits).
///
/// Dropping low trits rounds to the nearest integer: the discarded tail is
/// always smaller than half of 3^k in magnitude.
pub fn div_pow3(w: Word64, k: u32) -> Word64 {
    if k >= u64::BITS {
        return Word64::zero();
    }
    Word64::from_masks_unchecked(w.neg_mask() >> k, w.pos_mask() >> k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ternary::{decode, encode, encode_signed};

    #[test]
    fn test_multiply_by_pow2() {
        for n in 0..2_000u64 {
            for k in 0..=5 {
                assert_eq!(decode(multiply_by_pow2(encode(n), k).unwrap()), n << k);
            }
        }
        assert_eq!(
            multiply_by_pow2(encode_signed(-7), 40).unwrap().to_i128(),
            -7 * (1i128 << 40)
        );
    }

    #[test]
    fn test_multiply_by_pow2_overflow() {
        // 2^100 < (3^64 - 1) / 2 < 2^101
        assert!(multiply_by_pow2(encode(1), 100).is_ok());
        assert_eq!(multiply_by_pow2(encode(1), 101), Err(TernaryError::Overflow));
        assert_eq!(multiply_by_pow2(encode(1), u32::MAX), Err(TernaryError::Overflow));
    }

    #[test]
    fn test_multiply_zero_by_huge_power() {
        assert!(multiply_by_pow2(Word64::zero(), u32::MAX).unwrap().is_zero());
    }

    #[test]
    fn test_shift_left() {
        let a = encode(1);
        assert_eq!(decode(mul_pow3(a, 1).unwrap()), 3);
        assert_eq!(decode(mul_pow3(a, 3).unwrap()), 27);
        assert_eq!(mul_pow3(a, 63).unwrap().trit_size(), 64);
        assert_eq!(mul_pow3(a, 64), Err(TernaryError::Overflow));
        assert_eq!(mul_pow3(encode(4), 63), Err(TernaryError::Overflow));
        assert!(mul_pow3(Word64::zero(), 100).unwrap().is_zero());
    }

    #[test]
    fn test_shift_right_rounds_to_nearest() {
        assert_eq!(decode(div_pow3(encode(27), 1)), 9);
        assert_eq!(decode(div_pow3(encode(27), 3)), 1);
        // 13/3 = 4.33, 14/3 = 4.67
        assert_eq!(decode(div_pow3(encode(13), 1)), 4);
        assert_eq!(decode(div_pow3(encode(14), 1)), 5);
        assert_eq!(div_pow3(encode_signed(-14), 1).to_i128(), -5);
        assert!(div_pow3(encode(u64::MAX), 64).is_zero());
    }

    #[test]
    fn test_shift_roundtrip() {
        for n in -500i64..500 {
            let w = encode_signed(n);
            assert_eq!(div_pow3(mul_pow3(w, 7).unwrap(), 7), w);
        }
    }
}
