//! Balanced ternary arithmetic over 64-trit words.
//!
//! - [`Trit`] - A single balanced ternary digit (-1, 0, +1)
//! - [`Word64`] - A 64-trit word stored as two disjoint bitmasks
//! - [`codec`] - Conversion to and from conventional integers
//! - [`arith`] - The carry-propagating adder and what reduces to it
//! - [`scale`] - Exact scaling by powers of two and three
//! - [`div`] - Convergent division by 2^k and reduction modulo 2^k - 1

mod error;
mod trit;
mod word;
pub mod arith;
pub mod codec;
pub mod div;
pub mod scale;

pub use error::{Result, TernaryError};
pub use trit::Trit;
pub use word::Word64;
pub use codec::{decode, encode, encode_signed, encode_wide, signed_decode};
pub use arith::{
    abs, add, compare, less_or_equal, less_than, negate, subtract, wrapping_add,
};
pub use scale::{div_pow3, double_value, mul_pow3, multiply_by_pow2};
pub use div::{
    approx_quotient, div2, div32, div8, div_pow2k, floor_div_mod_pow2k, floor_div_pow2k,
    floor_mod_pow2k, mod_mersenne, Divider, Limits,
};
