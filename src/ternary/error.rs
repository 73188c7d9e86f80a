//! Error taxonomy for ternary arithmetic.

use thiserror::Error;

/// Result alias used throughout the arithmetic engine.
pub type Result<T> = std::result::Result<T, TernaryError>;

/// Faults surfaced by word construction and arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TernaryError {
    /// A result needs a significant trit beyond position 63.
    #[error("word overflow: result does not fit in 64 trits")]
    Overflow,

    /// Raw masks claim some positions as both -1 and +1.
    #[error("invalid representation: trits {overlap:#018x} are both -1 and +1")]
    InvalidRepresentation { overlap: u64 },

    /// A correction loop ran out of fuel or stopped shrinking.
    #[error("division by 2^{k} did not converge within {rounds} rounds")]
    NotConverged { k: u32, rounds: u32 },

    /// Exact division was asked of a value that is not a multiple of 2^k.
    #[error("value is not a multiple of 2^{k}")]
    Indivisible { k: u32 },

    /// `2^0 - 1` leaves nothing to reduce by.
    #[error("modulus 2^0 - 1 is zero")]
    ZeroModulus,

    #[error("invalid trit character: '{0}' (expected -, 0, + or N, O, P)")]
    InvalidTrit(char),

    #[error("invalid trit value: {0} (must be -1, 0, or 1)")]
    InvalidDigit(i8),
}
