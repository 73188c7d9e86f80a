//! # bt64
//!
//! Fixed-width balanced ternary arithmetic.
//!
//! Integers are held as 64 trits in {-1, 0, +1}, stored as two parallel
//! bitmasks. Addition runs the balanced ternary carry law on all positions
//! at once; multiplication and division by powers of three are shifts; and
//! division by powers of two, which base 3 cannot shift, converges an
//! approximate quotient under an explicit iteration budget.

pub mod ternary;
pub mod check;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use ternary::{Trit, Word64, TernaryError, Divider, Limits};
pub use ternary::{encode, encode_signed, decode, signed_decode};
pub use check::{run_self_check, CheckConfig, CheckReport};
