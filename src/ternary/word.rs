//! The 64-trit balanced ternary word.
//!
//! A word is stored as two parallel bitmasks: bit `i` of `neg` marks trit
//! `i` as -1, bit `i` of `pos` marks it as +1, and a position clear in both
//! is 0. The masks are private; every constructor keeps them disjoint.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use crate::ternary::{Result, TernaryError, Trit};

/// A 64-trit balanced ternary word.
///
/// Value = Σ trit(i)·3^i for i in 0..64, so the range is
/// ±(3^64 - 1)/2, comfortably inside `i128`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Masks", into = "Masks")]
pub struct Word64 {
    neg: u64,
    pos: u64,
}

/// Wire form of a word. Deserialization goes through [`Word64::from_masks`].
#[derive(Serialize, Deserialize)]
pub struct Masks {
    neg: u64,
    pos: u64,
}

impl Word64 {
    /// Number of trits in a word.
    pub const WIDTH: usize = 64;

    pub const ZERO: Word64 = Word64 { neg: 0, pos: 0 };

    pub const ONE: Word64 = Word64 { neg: 0, pos: 1 };

    /// Create the zero word.
    #[inline]
    pub const fn zero() -> Self {
        Self::ZERO
    }

    /// Build a word from raw masks.
    ///
    /// Fails with [`TernaryError::InvalidRepresentation`] when a position is
    /// set in both masks.
    pub fn from_masks(neg: u64, pos: u64) -> Result<Self> {
        let overlap = neg & pos;
        if overlap != 0 {
            return Err(TernaryError::InvalidRepresentation { overlap });
        }
        Ok(Self { neg, pos })
    }

    /// Build a word from masks the caller has already proven disjoint.
    #[inline]
    pub(crate) const fn from_masks_unchecked(neg: u64, pos: u64) -> Self {
        debug_assert!(neg & pos == 0);
        Self { neg, pos }
    }

    /// Mask of the -1 trits.
    #[inline]
    pub const fn neg_mask(self) -> u64 {
        self.neg
    }

    /// Mask of the +1 trits.
    #[inline]
    pub const fn pos_mask(self) -> u64 {
        self.pos
    }

    /// Get a single trit by index (0 = LSB).
    ///
    /// # Panics
    /// Panics if `index >= 64`.
    pub fn trit(self, index: usize) -> Trit {
        assert!(index < Self::WIDTH, "trit index {} out of range (0-63)", index);
        let bit = 1u64 << index;
        if self.neg & bit != 0 {
            Trit::N
        } else if self.pos & bit != 0 {
            Trit::P
        } else {
            Trit::O
        }
    }

    /// Return a copy with trit `index` replaced.
    ///
    /// # Panics
    /// Panics if `index >= 64`.
    pub fn with_trit(self, index: usize, trit: Trit) -> Self {
        assert!(index < Self::WIDTH, "trit index {} out of range (0-63)", index);
        let bit = 1u64 << index;
        let (neg, pos) = (self.neg & !bit, self.pos & !bit);
        match trit {
            Trit::N => Self { neg: neg | bit, pos },
            Trit::O => Self { neg, pos },
            Trit::P => Self { neg, pos: pos | bit },
        }
    }

    /// Create a word from trits, least significant first.
    pub fn from_trits(trits: &[Trit]) -> Result<Self> {
        let mut word = Self::ZERO;
        for (i, &trit) in trits.iter().enumerate() {
            if i >= Self::WIDTH {
                if trit.is_zero() {
                    continue;
                }
                return Err(TernaryError::Overflow);
            }
            word = word.with_trit(i, trit);
        }
        Ok(word)
    }

    /// All 64 trits, least significant first.
    pub fn trits(self) -> impl Iterator<Item = Trit> {
        (0..Self::WIDTH).map(move |i| self.trit(i))
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.neg == 0 && self.pos == 0
    }

    /// True for positive words and for zero.
    ///
    /// Comparing the masks as plain integers decides which of them owns the
    /// most significant set trit.
    #[inline]
    pub const fn is_non_negative(self) -> bool {
        self.pos >= self.neg
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.pos < self.neg
    }

    /// The leading non-zero trit, or `O` for zero.
    pub const fn sign(self) -> Trit {
        if self.is_zero() {
            Trit::O
        } else if self.is_negative() {
            Trit::N
        } else {
            Trit::P
        }
    }

    /// Number of significant trits: index of the highest non-zero trit plus one.
    #[inline]
    pub const fn trit_size(self) -> u32 {
        u64::BITS - (self.neg | self.pos).leading_zeros()
    }

    /// Number of zero trits in the 64-trit window.
    #[inline]
    pub const fn zero_trit_count(self) -> u32 {
        (!(self.neg | self.pos)).count_ones()
    }

    /// Parity of the value.
    ///
    /// Every power of three is odd, so the value's parity is the parity of
    /// its non-zero trits, and with an even width that equals the parity of
    /// the zero trits.
    #[inline]
    pub const fn parity(self) -> u32 {
        self.zero_trit_count() & 1
    }

    /// Exact value over the whole window.
    pub fn to_i128(self) -> i128 {
        (0..Self::WIDTH)
            .rev()
            .fold(0i128, |acc, i| acc * 3 + i128::from(self.trit(i).to_i8()))
    }

    /// Parse from a string like `"0t+0-"` or `"PON"` (most significant first).
    ///
    /// Leading zeros may be omitted; at most 64 significant characters are
    /// accepted.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = s.strip_prefix("0t").unwrap_or(s);

        let trits = s
            .chars()
            .rev()
            .map(Trit::from_char)
            .collect::<Result<Vec<_>>>()?;
        Self::from_trits(&trits)
    }

    /// The digit string followed by trit-size, zero count and parity.
    pub fn diagnostic(&self) -> String {
        format!("{:#}", self)
    }
}

impl TryFrom<Masks> for Word64 {
    type Error = TernaryError;

    fn try_from(masks: Masks) -> Result<Self> {
        Word64::from_masks(masks.neg, masks.pos)
    }
}

impl From<Word64> for Masks {
    fn from(word: Word64) -> Self {
        Masks { neg: word.neg, pos: word.pos }
    }
}

impl FromStr for Word64 {
    type Err = TernaryError;

    fn from_str(s: &str) -> Result<Self> {
        Word64::parse(s)
    }
}

impl fmt::Debug for Word64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word64(0t")?;
        let size = self.trit_size().max(1) as usize;
        for i in (0..size).rev() {
            write!(f, "{}", self.trit(i))?;
        }
        write!(f, " = {})", self.to_i128())
    }
}

/// Renders all 64 trits, most significant first.
///
/// The alternate form (`{:#}`) appends
/// `(tritsize=.. zeros=.. parity=..)` for inspection.
impl fmt::Display for Word64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..Self::WIDTH).rev() {
            write!(f, "{}", self.trit(i))?;
        }
        if f.alternate() {
            write!(
                f,
                " (tritsize={} zeros={} parity={})",
                self.trit_size(),
                self.zero_trit_count(),
                self.parity()
            )?;
        }
        Ok(())
    }
}

impl std::ops::Neg for Word64 {
    type Output = Self;

    /// Swap the masks: every +1 becomes -1 and vice versa.
    fn neg(self) -> Self::Output {
        Self { neg: self.pos, pos: self.neg }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        let zero = Word64::zero();
        assert!(zero.is_zero());
        assert_eq!(zero.to_i128(), 0);
        assert_eq!(zero.trit_size(), 0);
        assert_eq!(zero.zero_trit_count(), 64);
        assert_eq!(zero.parity(), 0);
        assert_eq!(zero.sign(), Trit::O);
    }

    #[test]
    fn test_from_masks_rejects_overlap() {
        assert_eq!(
            Word64::from_masks(0b0110, 0b0011),
            Err(TernaryError::InvalidRepresentation { overlap: 0b0010 })
        );
        let w = Word64::from_masks(0b0100, 0b0011).unwrap();
        // -9 + 3 + 1
        assert_eq!(w.to_i128(), -5);
    }

    #[test]
    fn test_trit_access() {
        let w = Word64::zero()
            .with_trit(0, Trit::P)
            .with_trit(1, Trit::N)
            .with_trit(3, Trit::P);
        assert_eq!(w.to_i128(), 1 - 3 + 27);
        assert_eq!(w.trit(1), Trit::N);
        assert_eq!(w.trit(2), Trit::O);

        // Overwriting a trit keeps the masks disjoint.
        let w = w.with_trit(1, Trit::P);
        assert_eq!(w.neg_mask() & w.pos_mask(), 0);
        assert_eq!(w.to_i128(), 1 + 3 + 27);
    }

    #[test]
    fn test_queries() {
        // 0t+0-+ = 27 - 3 + 1
        let w = Word64::parse("+0-+").unwrap();
        assert_eq!(w.to_i128(), 25);
        assert_eq!(w.trit_size(), 4);
        assert_eq!(w.zero_trit_count(), 61);
        assert_eq!(w.parity(), 1);
        assert!(w.is_non_negative());
        assert_eq!((-w).sign(), Trit::N);
        assert!((-w).is_negative());
    }

    #[test]
    fn test_parse_and_display() {
        let w: Word64 = "0tPON".parse().unwrap();
        assert_eq!(w.to_i128(), 8);

        let rendered = w.to_string();
        assert_eq!(rendered.len(), 64);
        assert!(rendered.ends_with("+0-"));
        assert_eq!(Word64::parse(&rendered).unwrap(), w);

        assert_eq!(Word64::parse("+x-"), Err(TernaryError::InvalidTrit('x')));
        let too_long = format!("+{}", "0".repeat(64));
        assert_eq!(Word64::parse(&too_long), Err(TernaryError::Overflow));
        // Extra leading zeros are harmless.
        let padded = format!("0{}", "+".repeat(64));
        assert!(Word64::parse(&padded).is_ok());
    }

    #[test]
    fn test_diagnostic_suffix() {
        let w = Word64::parse("+-").unwrap();
        let text = w.diagnostic();
        assert!(text.ends_with(" (tritsize=2 zeros=62 parity=0)"), "{}", text);
        assert_eq!(format!("{:?}", w), "Word64(0t+- = 2)");
    }

    #[test]
    fn test_serde_rejects_overlap() {
        let w = Word64::parse("+-0+").unwrap();
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(serde_json::from_str::<Word64>(&json).unwrap(), w);
        assert!(serde_json::from_str::<Word64>(r#"{"neg":3,"pos":1}"#).is_err());
    }
}
