//! Single balanced ternary digit (trit).
//!
//! Words store trits as two bitmasks, so `Trit` never appears in the hot
//! arithmetic paths. It is the digit-level view used for rendering, parsing
//! and for checking the bitwise adder law one position at a time.

use std::fmt;
use serde::{Serialize, Deserialize};
use crate::ternary::TernaryError;

/// A single balanced ternary digit.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Trit {
    /// Negative (-1)
    N,
    /// Zero (0)
    #[default]
    O,
    /// Positive (+1)
    P,
}

impl Trit {
    /// All possible trit values in order: N, O, P
    pub const ALL: [Trit; 3] = [Trit::N, Trit::O, Trit::P];

    /// Convert to integer value.
    #[inline]
    pub const fn to_i8(self) -> i8 {
        match self {
            Trit::N => -1,
            Trit::O => 0,
            Trit::P => 1,
        }
    }

    /// Flip N ↔ P, O stays O.
    #[inline]
    pub const fn neg(self) -> Self {
        match self {
            Trit::N => Trit::P,
            Trit::O => Trit::O,
            Trit::P => Trit::N,
        }
    }

    /// The rendering character: `-`, `0` or `+`.
    #[inline]
    pub const fn to_char(self) -> char {
        match self {
            Trit::N => '-',
            Trit::O => '0',
            Trit::P => '+',
        }
    }

    /// Parse a trit character. Accepts `-0+` and the `NOP` letters.
    pub fn from_char(c: char) -> Result<Self, TernaryError> {
        match c {
            '-' | 'N' | 'n' => Ok(Trit::N),
            '0' | 'O' | 'o' => Ok(Trit::O),
            '+' | 'P' | 'p' => Ok(Trit::P),
            _ => Err(TernaryError::InvalidTrit(c)),
        }
    }

    /// Digit-level full adder: `a + b + carry_in` as `(sum, carry_out)`.
    ///
    /// The word adder applies the same law to all 64 positions at once with
    /// bitmasks; this is the one-position reference.
    pub const fn full_add(self, other: Self, carry_in: Self) -> (Self, Self) {
        let total = self.to_i8() + other.to_i8() + carry_in.to_i8();
        match total {
            -3 => (Trit::O, Trit::N),
            -2 => (Trit::P, Trit::N),
            -1 => (Trit::N, Trit::O),
            0 => (Trit::O, Trit::O),
            1 => (Trit::P, Trit::O),
            2 => (Trit::N, Trit::P),
            _ => (Trit::O, Trit::P),
        }
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        matches!(self, Trit::O)
    }
}

impl fmt::Debug for Trit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trit::N => write!(f, "N"),
            Trit::O => write!(f, "O"),
            Trit::P => write!(f, "P"),
        }
    }
}

impl fmt::Display for Trit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl std::ops::Neg for Trit {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Trit::neg(self)
    }
}

impl TryFrom<i8> for Trit {
    type Error = TernaryError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Trit::N),
            0 => Ok(Trit::O),
            1 => Ok(Trit::P),
            _ => Err(TernaryError::InvalidDigit(value)),
        }
    }
}

impl From<Trit> for i8 {
    fn from(trit: Trit) -> Self {
        trit.to_i8()
    }
}
