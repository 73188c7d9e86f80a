//! Multi-trit addition, subtraction and comparison.
//!
//! Addition treats the second operand as a pending carry and folds it into
//! the first one position-parallel step at a time, using the balanced
//! ternary digit law on both masks at once. Every other operation here
//! reduces to that adder and to mask swapping.

use std::cmp::Ordering;
use crate::ternary::{Result, TernaryError, Word64};

/// One parallel step of the digit law.
///
/// Returns the new digit masks, the carry masks shifted one position left,
/// and the net carry that left trit 63 (+1, -1 or 0).
#[inline]
fn carry_step(a: (u64, u64), c: (u64, u64)) -> ((u64, u64), (u64, u64), i32) {
    let (an, ap) = a;
    let (cn, cp) = c;

    let a_zero = !(an | ap);
    let c_zero = !(cn | cp);

    // 1+1 = -1 carry 1; -1+-1 = 1 carry -1; otherwise the lone digit survives.
    let rn = (ap & cp) | (an & c_zero) | (cn & a_zero);
    let rp = (an & cn) | (ap & c_zero) | (cp & a_zero);

    let carry_n = an & cn;
    let carry_p = ap & cp;
    let spill = (carry_p >> 63) as i32 - (carry_n >> 63) as i32;

    ((rn, rp), (carry_n << 1, carry_p << 1), spill)
}

/// Run the carry chain to completion. Returns the in-window result and the
/// net multiple of 3^64 that was carried out of it.
fn propagate(a: Word64, b: Word64) -> (Word64, i32) {
    let mut digits = (a.neg_mask(), a.pos_mask());
    let mut carry = (b.neg_mask(), b.pos_mask());
    let mut spill = 0i32;

    // A carry moves up one position per step, so the chain dies out within
    // the word width.
    while carry != (0, 0) {
        let (next, next_carry, out) = carry_step(digits, carry);
        digits = next;
        carry = next_carry;
        spill += out;
    }

    (Word64::from_masks_unchecked(digits.0, digits.1), spill)
}

/// Add two words.
///
/// Fails with [`TernaryError::Overflow`] when the sum leaves the 64-trit
/// window. Carries that leave the top and are later cancelled by opposite
/// carries do not count as overflow.
pub fn add(a: Word64, b: Word64) -> Result<Word64> {
    match propagate(a, b) {
        (sum, 0) => Ok(sum),
        _ => Err(TernaryError::Overflow),
    }
}

/// Add two words, silently dropping anything carried past trit 63.
pub fn wrapping_add(a: Word64, b: Word64) -> Word64 {
    propagate(a, b).0
}

/// Negate a word (swap the masks).
#[inline]
pub fn negate(a: Word64) -> Word64 {
    -a
}

/// Subtract two words (a - b).
#[inline]
pub fn subtract(a: Word64, b: Word64) -> Result<Word64> {
    add(a, -b)
}

/// Absolute value. The range is symmetric, so this never overflows.
#[inline]
pub fn abs(a: Word64) -> Word64 {
    if a.is_non_negative() {
        a
    } else {
        -a
    }
}

/// Compare two words by the sign of their difference.
pub fn compare(a: Word64, b: Word64) -> Result<Ordering> {
    let d = subtract(a, b)?;
    Ok(if d.is_zero() {
        Ordering::Equal
    } else if d.is_negative() {
        Ordering::Less
    } else {
        Ordering::Greater
    })
}

/// `a < b`.
#[inline]
pub fn less_than(a: Word64, b: Word64) -> Result<bool> {
    Ok(subtract(a, b)?.is_negative())
}

/// `a <= b`.
#[inline]
pub fn less_or_equal(a: Word64, b: Word64) -> Result<bool> {
    Ok(!less_than(b, a)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ternary::{encode, encode_signed, encode_wide, Trit};

    fn word(n: i64) -> Word64 {
        encode_signed(n)
    }

    #[test]
    fn test_add_basic() {
        let result = add(word(100), word(50)).unwrap();
        assert_eq!(result.to_i128(), 150);

        let result = add(word(100), word(-150)).unwrap();
        assert_eq!(result.to_i128(), -50);
    }

    #[test]
    fn test_subtract() {
        assert_eq!(subtract(word(100), word(30)).unwrap().to_i128(), 70);
        assert_eq!(subtract(word(30), word(100)).unwrap().to_i128(), -70);
    }

    #[test]
    fn test_matches_digit_adder() {
        // Every pair of single-position digits, checked against Trit::full_add.
        for a in Trit::ALL {
            for b in Trit::ALL {
                let wa = Word64::zero().with_trit(5, a);
                let wb = Word64::zero().with_trit(5, b);
                let (sum, carry) = a.full_add(b, Trit::O);
                let expected = Word64::zero().with_trit(5, sum).with_trit(6, carry);
                assert_eq!(add(wa, wb).unwrap(), expected, "{:?} + {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_additive_inverse() {
        for val in [-9841i64, -100, -1, 0, 1, 100, 9841, i64::MAX] {
            let a = word(val);
            let result = add(a, negate(a)).unwrap();
            assert!(result.is_zero(), "Expected {} + (-{}) = 0", val, val);
        }
    }

    #[test]
    fn test_add_commutativity() {
        let a = word(12345);
        let b = word(-6789);
        assert_eq!(add(a, b).unwrap(), add(b, a).unwrap());
    }

    #[test]
    fn test_long_carry_chain() {
        // All +1 trits below position 40, plus one: the carry ripples the
        // whole way up.
        let ones = Word64::from_masks(0, (1 << 40) - 1).unwrap();
        let sum = add(ones, encode(1)).unwrap();
        assert_eq!(sum.to_i128(), ones.to_i128() + 1);
        assert_eq!(sum.neg_mask() & sum.pos_mask(), 0);
    }

    #[test]
    fn test_overflow_at_window_edge() {
        let max = encode_wide((3u128.pow(64) - 1) / 2).unwrap();
        assert_eq!(add(max, encode(1)), Err(TernaryError::Overflow));
        assert_eq!(subtract(-max, encode(1)), Err(TernaryError::Overflow));
        assert!(add(max, -encode(1)).is_ok());

        // The truncating adder wraps around by 3^64.
        let wrapped = wrapping_add(max, encode(1));
        assert_eq!(wrapped.to_i128(), -max.to_i128());
    }

    #[test]
    fn test_cancelled_top_carry_is_not_overflow() {
        // Top trit +1 on both sides carries out of the window, but the -1
        // trits below carry back in and the sum still fits.
        let a = Word64::parse(&format!("+{}", "-".repeat(63))).unwrap();
        let sum = add(a, a).unwrap();
        assert_eq!(sum.to_i128(), 2 * a.to_i128());
    }

    #[test]
    fn test_compare() {
        assert_eq!(compare(word(3), word(5)).unwrap(), Ordering::Less);
        assert_eq!(compare(word(-3), word(-5)).unwrap(), Ordering::Greater);
        assert_eq!(compare(word(7), word(7)).unwrap(), Ordering::Equal);
        assert!(less_than(word(-1), word(0)).unwrap());
        assert!(!less_than(word(0), word(0)).unwrap());
        assert!(less_or_equal(word(0), word(0)).unwrap());
        assert!(!less_or_equal(word(2), word(1)).unwrap());
    }

    #[test]
    fn test_abs() {
        assert_eq!(abs(word(-42)), word(42));
        assert_eq!(abs(word(42)), word(42));
        assert!(abs(Word64::zero()).is_zero());
    }
}
