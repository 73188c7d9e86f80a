//! Conversion between words and conventional integers.

use crate::ternary::{Result, TernaryError, Word64};

/// Expand `n` digit by digit: a remainder of 2 becomes -1 with a borrow.
fn expand(mut n: u128) -> Result<Word64> {
    let (mut neg, mut pos) = (0u64, 0u64);
    let mut ti = 0usize;

    while n > 0 {
        if ti >= Word64::WIDTH {
            return Err(TernaryError::Overflow);
        }
        match n % 3 {
            1 => {
                pos |= 1 << ti;
                n -= 1;
            }
            2 => {
                neg |= 1 << ti;
                n += 1;
            }
            _ => {}
        }
        n /= 3;
        ti += 1;
    }

    Ok(Word64::from_masks_unchecked(neg, pos))
}

/// Encode a natural number.
///
/// `u64::MAX` needs 42 trits, so every input fits the window.
pub fn encode(n: u64) -> Word64 {
    match expand(u128::from(n)) {
        Ok(word) => word,
        Err(_) => unreachable!("u64 values need at most 42 trits"),
    }
}

/// Encode a natural number that may not fit in 64 trits.
pub fn encode_wide(n: u128) -> Result<Word64> {
    expand(n)
}

/// Encode a signed integer.
pub fn encode_signed(n: i64) -> Word64 {
    let magnitude = encode(n.unsigned_abs());
    if n < 0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Decode a word, most significant trit first.
///
/// The result is taken modulo 2^64, so it is exact for every value in
/// `[0, 2^64)`. Use [`signed_decode`] for negative words or
/// [`Word64::to_i128`] for the full range.
pub fn decode(word: Word64) -> u64 {
    let (neg, pos) = (word.neg_mask(), word.pos_mask());
    (0..Word64::WIDTH).rev().fold(0u64, |n, ti| {
        let n = n.wrapping_mul(3);
        if neg & (1 << ti) != 0 {
            n.wrapping_sub(1)
        } else if pos & (1 << ti) != 0 {
            n.wrapping_add(1)
        } else {
            n
        }
    })
}

/// Decode a word that may be negative.
pub fn signed_decode(word: Word64) -> i64 {
    if word.is_non_negative() {
        decode(word) as i64
    } else {
        (decode(-word) as i64).wrapping_neg()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ternary::Trit;

    #[test]
    fn test_encode_known_digits() {
        // 13 = 9 + 3 + 1
        let w = encode(13);
        assert_eq!(w, Word64::parse("+++").unwrap());
        assert_eq!(decode(w), 13);

        // 42 = 81 - 27 - 9 - 3
        assert_eq!(encode(42), Word64::parse("+---0").unwrap());
        // 2 = 3 - 1
        assert_eq!(encode(2).trit(0), Trit::N);
    }

    #[test]
    fn test_roundtrip_small() {
        for n in 0..10_000u64 {
            let w = encode(n);
            assert_eq!(w.neg_mask() & w.pos_mask(), 0, "encode({}) not normalized", n);
            assert_eq!(decode(w), n);
        }
    }

    #[test]
    fn test_extremes() {
        assert_eq!(decode(encode(u64::MAX)), u64::MAX);
        assert_eq!(encode(u64::MAX).trit_size(), 42);
        assert_eq!(signed_decode(encode_signed(i64::MIN)), i64::MIN);
        assert_eq!(signed_decode(encode_signed(i64::MAX)), i64::MAX);
    }

    #[test]
    fn test_encode_wide_capacity() {
        // (3^64 - 1) / 2 is all +1 trits.
        let max = (3u128.pow(64) - 1) / 2;
        let w = encode_wide(max).unwrap();
        assert_eq!(w.pos_mask(), u64::MAX);
        assert_eq!(w.to_i128(), max as i128);
        assert_eq!(encode_wide(max + 1), Err(TernaryError::Overflow));
    }

    #[test]
    fn test_signed() {
        for n in -2_000i64..2_000 {
            let w = encode_signed(n);
            assert_eq!(signed_decode(w), n);
            assert_eq!(w.to_i128(), i128::from(n));
            assert_eq!(w.is_negative(), n < 0);
        }
    }
}
