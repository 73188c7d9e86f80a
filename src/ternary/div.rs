//! Division by powers of two and reduction modulo 2^k - 1.
//!
//! Base 3 has no shift for halving, so quotients are converged instead of
//! computed digit by digit:
//!
//! 1. [`approx_quotient`] builds an estimate of `t / 2^k` from geometric
//!    series. `(1 + 3^-1)(1 + 3^-2)(1 + 3^-4)…` telescopes to 3/2, so adding
//!    shrinking copies of the accumulator to itself and dropping one trit
//!    halves it; starting the series at 3^-2 gives 9/8 and dropping two
//!    trits divides by 8.
//! 2. A correction loop keeps the state `(quotient, residual)` with
//!    `residual = t - quotient·2^k` and nudges the quotient by the estimate of
//!    the residual until a stopping predicate holds.
//!
//! Every loop runs on explicit fuel ([`Limits::max_rounds`]). Running dry,
//! or a residual that stops shrinking, is reported as
//! [`TernaryError::NotConverged`] rather than spinning.

use serde::{Serialize, Deserialize};
use tracing::{debug, trace, warn};
use crate::ternary::{
    abs, add, div_pow3, less_than, mul_pow3, multiply_by_pow2, subtract, Result, TernaryError,
    Word64,
};

/// Iteration budget for the convergent loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum residual evaluations per correction loop, and maximum folds
    /// per Mersenne reduction.
    pub max_rounds: u32,
}

impl Limits {
    /// Folding by 2^1 halves the value each round and the window holds
    /// about 2^100, so this leaves headroom for every exponent.
    pub const DEFAULT_MAX_ROUNDS: u32 = 128;
}

impl Default for Limits {
    fn default() -> Self {
        Self { max_rounds: Self::DEFAULT_MAX_ROUNDS }
    }
}

/// Largest exponent whose power of two fits the window:
/// 2^100 < (3^64 - 1)/2 < 2^101.
const MAX_POW2_EXP: u32 = 100;

/// 2^k, or `None` when it lies outside the window.
fn pow2(k: u32) -> Result<Option<Word64>> {
    if k > MAX_POW2_EXP {
        return Ok(None);
    }
    multiply_by_pow2(Word64::ONE, k).map(Some)
}

/// `t + 2^k - bias` for a negative `t`, for any `k`.
///
/// 2^k is added in chunks of at most 2^100, so the only failure is the
/// result itself leaving the window. Past two extra chunks the sum always
/// overflows, which ends the loop.
fn offset_negative(t: Word64, k: u32, bias: Word64) -> Result<Word64> {
    let chunk_exp = k.min(MAX_POW2_EXP);
    let chunk = multiply_by_pow2(Word64::ONE, chunk_exp)?;
    let chunks = 1u128.checked_shl(k - chunk_exp).unwrap_or(u128::MAX);

    let mut acc = subtract(add(t, chunk)?, bias)?;
    for _ in 1..chunks {
        acc = add(acc, chunk)?;
    }
    Ok(acc)
}

/// The geometric series for j in {1, 3}: `t · (1 + 3^-s)(1 + 3^-2s)… / 3^m`.
fn series(t: Word64, j: u32) -> Result<Word64> {
    let mut acc = t;
    let mut scale = 1u32 << ((j - 1) / 2);
    while scale < u64::BITS {
        acc = add(acc, div_pow3(acc, scale))?;
        scale *= 2;
    }
    Ok(div_pow3(acc, (j + 1) / 2))
}

/// One geometric-series stub dividing by 2^j, for j in {1, 3}.
///
/// 2^1 = 3·(1 - 1/3) and 2^3 = 9·(1 - 1/9) are the only powers of two one
/// away from a power of three, which is what makes these two stubs exact up
/// to rounding.
///
/// The series overshoots its input by 3/2 (or 9/8) before the final shift,
/// so it runs on roughly a third (ninth) of `t`: with `t = 3^m·h + l`,
/// `t / 2^j = h + (h + l) / 2^j`.
fn stub(t: Word64, j: u32) -> Result<Word64> {
    let m = (j + 1) / 2;
    let h = div_pow3(t, m);
    let l = subtract(t, mul_pow3(h, m)?)?;
    add(h, series(add(h, l)?, j)?)
}

/// Estimate `t / 2^k`.
///
/// Composes ÷8 stubs for `k / 3` and ÷2 stubs for the rest. Each stub rounds
/// to nearest, so the estimate stays within about one unit of the true
/// quotient and is exact on multiples of 2^k in practice. Negation commutes
/// with every step, so `approx_quotient(-t, k) == -approx_quotient(t, k)`.
pub fn approx_quotient(t: Word64, k: u32) -> Result<Word64> {
    let mut acc = t;
    for _ in 0..k / 3 {
        if acc.is_zero() {
            return Ok(acc);
        }
        acc = stub(acc, 3)?;
    }
    for _ in 0..k % 3 {
        acc = stub(acc, 1)?;
    }
    Ok(acc)
}

/// Source of quotient estimates for the correction loop.
type Estimator = fn(Word64, u32) -> Result<Word64>;

/// Runs the division family under a fixed [`Limits`].
#[derive(Debug, Clone, Copy)]
pub struct Divider {
    limits: Limits,
    estimate: Estimator,
}

impl Default for Divider {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}

impl Divider {
    pub fn new(limits: Limits) -> Self {
        Self { limits, estimate: approx_quotient }
    }

    /// Swap the estimator, e.g. for one that never converges.
    #[cfg(test)]
    fn with_estimator(self, estimate: Estimator) -> Self {
        Self { estimate, ..self }
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    fn exhausted(&self, k: u32, rounds: u32) -> TernaryError {
        warn!(k, rounds, "division did not converge");
        TernaryError::NotConverged { k, rounds }
    }

    /// Move `q` toward the true quotient by the estimate of residual `d`.
    ///
    /// An estimate that rounds to zero still moves by one unit, so every
    /// round makes progress.
    fn correct(&self, q: Word64, d: Word64, k: u32) -> Result<Word64> {
        let mut step = (self.estimate)(abs(d), k)?;
        if step.is_zero() {
            step = Word64::ONE;
        }
        if d.is_negative() {
            subtract(q, step)
        } else {
            add(q, step)
        }
    }

    /// Correction loop shared by the exact and floor variants.
    ///
    /// Returns the first `(quotient, residual)` for which `settled` holds.
    /// The residual magnitude must shrink strictly between rounds.
    fn converge<F>(&self, t: Word64, k: u32, mut settled: F) -> Result<(Word64, Word64)>
    where
        F: FnMut(Word64) -> Result<bool>,
    {
        let mut q = (self.estimate)(t, k)?;
        let mut previous: Option<Word64> = None;

        for round in 0..self.limits.max_rounds {
            let scaled = match multiply_by_pow2(q, k) {
                Ok(scaled) => scaled,
                // Near the window edge the estimate can land one unit past a
                // quotient whose multiple still fits; |q| is then too large.
                Err(TernaryError::Overflow) => {
                    trace!(k, round, "estimate leaves the window");
                    q = if q.is_negative() {
                        add(q, Word64::ONE)?
                    } else {
                        subtract(q, Word64::ONE)?
                    };
                    continue;
                }
                Err(e) => return Err(e),
            };
            let d = subtract(t, scaled)?;
            if settled(d)? {
                debug!(k, round, "quotient settled");
                return Ok((q, d));
            }

            let magnitude = abs(d);
            if let Some(prev) = previous {
                if !less_than(magnitude, prev)? {
                    return Err(self.exhausted(k, round + 1));
                }
            }
            previous = Some(magnitude);

            trace!(k, round, residual = %d.to_i128(), "correcting quotient");
            q = self.correct(q, d, k)?;
        }

        Err(self.exhausted(k, self.limits.max_rounds))
    }

    /// `t / 2^k` for a `t` known to be a multiple of 2^k.
    ///
    /// Fails with [`TernaryError::Indivisible`] once the residual is non-zero
    /// but smaller than the divisor.
    pub fn exact(&self, t: Word64, k: u32) -> Result<Word64> {
        let divisor = match pow2(k)? {
            Some(divisor) => divisor,
            // |t| < 2^k: only zero divides.
            None if t.is_zero() => return Ok(t),
            None => return Err(TernaryError::Indivisible { k }),
        };
        let (q, _) = self.converge(t, k, |d| {
            if d.is_zero() {
                Ok(true)
            } else if less_than(abs(d), divisor)? {
                Err(TernaryError::Indivisible { k })
            } else {
                Ok(false)
            }
        })?;
        Ok(q)
    }

    /// Floor division and modulus by 2^k.
    ///
    /// The quotient rounds toward negative infinity and the remainder lies in
    /// `[0, 2^k)`. A negative `t` with 2^k past the window fails with
    /// [`TernaryError::Overflow`] when its remainder `t + 2^k` does not fit.
    pub fn floor(&self, t: Word64, k: u32) -> Result<(Word64, Word64)> {
        let divisor = match pow2(k)? {
            Some(divisor) => divisor,
            None if t.is_non_negative() => return Ok((Word64::ZERO, t)),
            None => return Ok((-Word64::ONE, offset_negative(t, k, Word64::ZERO)?)),
        };
        let (q, d) = self.converge(t, k, |d| less_than(abs(d), divisor))?;
        if d.is_negative() {
            Ok((subtract(q, Word64::ONE)?, add(d, divisor)?))
        } else {
            Ok((q, d))
        }
    }

    /// `t mod (2^k - 1)`, in `[0, 2^k - 1)`.
    ///
    /// Since 2^k ≡ 1, splitting `acc = q·2^k + r` and replacing `acc` by
    /// `q + r` keeps it congruent to `t` while shrinking it roughly by 2^k.
    /// Folding stops once `|acc| < 2^k`; the last step is a plain range
    /// adjustment.
    ///
    /// Experimental: every fold strictly shrinks `|acc|` while `|acc| ≥ 2^k`,
    /// and fuel bounds the number of folds.
    pub fn mersenne(&self, t: Word64, k: u32) -> Result<Word64> {
        if k == 0 {
            return Err(TernaryError::ZeroModulus);
        }
        let base = match pow2(k)? {
            Some(base) => base,
            // The modulus exceeds every word.
            None if t.is_non_negative() => return Ok(t),
            None => return offset_negative(t, k, Word64::ONE),
        };
        let modulus = subtract(base, Word64::ONE)?;
        let mut acc = t;

        for round in 0..self.limits.max_rounds {
            if less_than(abs(acc), base)? {
                while acc.is_non_negative() && !less_than(acc, modulus)? {
                    acc = subtract(acc, modulus)?;
                }
                while acc.is_negative() {
                    acc = add(acc, modulus)?;
                }
                debug!(k, round, "mersenne reduction settled");
                return Ok(acc);
            }

            let (q, r) = self.floor(acc, k)?;
            acc = add(q, r)?;
            trace!(k, round, acc = %acc.to_i128(), "folded");
        }

        Err(self.exhausted(k, self.limits.max_rounds))
    }
}

/// `t / 2^k` for an exact multiple of 2^k.
pub fn div_pow2k(t: Word64, k: u32) -> Result<Word64> {
    Divider::default().exact(t, k)
}

/// `t / 2` for an even `t`.
pub fn div2(t: Word64) -> Result<Word64> {
    div_pow2k(t, 1)
}

/// `t / 8` for a multiple of 8.
pub fn div8(t: Word64) -> Result<Word64> {
    div_pow2k(t, 3)
}

/// `t / 32` for a multiple of 32.
pub fn div32(t: Word64) -> Result<Word64> {
    div_pow2k(t, 5)
}

/// Floor quotient and remainder by 2^k.
pub fn floor_div_mod_pow2k(t: Word64, k: u32) -> Result<(Word64, Word64)> {
    Divider::default().floor(t, k)
}

/// `⌊t / 2^k⌋`.
pub fn floor_div_pow2k(t: Word64, k: u32) -> Result<Word64> {
    Ok(floor_div_mod_pow2k(t, k)?.0)
}

/// `t mod 2^k`, in `[0, 2^k)`.
pub fn floor_mod_pow2k(t: Word64, k: u32) -> Result<Word64> {
    Ok(floor_div_mod_pow2k(t, k)?.1)
}

/// `t mod (2^k - 1)`. See [`Divider::mersenne`].
pub fn mod_mersenne(t: Word64, k: u32) -> Result<Word64> {
    Divider::default().mersenne(t, k)
}
