//! Built-in self-check.
//!
//! Runs the arithmetic identities the engine promises over bounded integer
//! ranges and collects one [`CheckOutcome`] per identity. The CLI prints the
//! report or emits it as JSON; the test suite runs it with a small range.

use serde::{Serialize, Deserialize};
use tracing::{info, warn};
use crate::ternary::{
    add, decode, double_value, encode, mul_pow3, multiply_by_pow2, subtract, Divider, Limits,
    Result,
};

/// What to exercise and how hard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Number of inputs per identity; inputs run `0..range`.
    pub range: u64,
    /// Fuel for the division family.
    pub limits: Limits,
}

impl CheckConfig {
    /// Largest supported range. The widest identity computes `n << 5`, which
    /// must still fit a `u64`.
    pub const MAX_RANGE: u64 = 1 << 59;

    /// `range`, capped at [`CheckConfig::MAX_RANGE`].
    pub fn effective_range(&self) -> u64 {
        self.range.min(Self::MAX_RANGE)
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self { range: 10_000, limits: Limits::default() }
    }
}

/// Result of one identity over its input range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub name: String,
    pub cases: u64,
    pub failures: u64,
    /// Description of the first failing input, if any.
    pub first_failure: Option<String>,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.failures == 0
    }
}

/// All outcomes of a self-check run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub checks: Vec<CheckOutcome>,
}

impl CheckReport {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(CheckOutcome::passed)
    }

    pub fn failed_checks(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed()).count()
    }
}

/// Evaluate `property` for every `n` in `inputs`.
///
/// `property` returns the observed value and the expected one; an error
/// counts as a failure.
fn check<I, F>(name: &str, inputs: I, mut property: F) -> CheckOutcome
where
    I: IntoIterator<Item = u64>,
    F: FnMut(u64) -> Result<(u64, u64)>,
{
    let mut outcome = CheckOutcome {
        name: name.to_string(),
        cases: 0,
        failures: 0,
        first_failure: None,
    };

    for n in inputs {
        outcome.cases += 1;
        let failure = match property(n) {
            Ok((got, expected)) if got == expected => continue,
            Ok((got, expected)) => format!("n = {}: got {}, expected {}", n, got, expected),
            Err(e) => format!("n = {}: {}", n, e),
        };
        outcome.failures += 1;
        outcome.first_failure.get_or_insert(failure);
    }

    info!(check = name, cases = outcome.cases, failures = outcome.failures, "self-check");
    outcome
}

/// Run every identity over `0..range`.
///
/// A range past [`CheckConfig::MAX_RANGE`] is capped with a warning.
pub fn run_self_check(config: &CheckConfig) -> CheckReport {
    let range = config.effective_range();
    if range < config.range {
        warn!(requested = config.range, range, "self-check range capped");
    }
    run_checks(0..range, Divider::new(config.limits))
}

fn run_checks<I>(inputs: I, divider: Divider) -> CheckReport
where
    I: Iterator<Item = u64> + Clone,
{
    let range = || inputs.clone();
    let mut checks = Vec::new();

    checks.push(check("encode is normalized", range(), |n| {
        let w = encode(n);
        Ok((w.neg_mask() & w.pos_mask(), 0))
    }));
    checks.push(check("decode(encode(n)) = n", range(), |n| Ok((decode(encode(n)), n))));
    checks.push(check("parity = n mod 2", range(), |n| {
        Ok((u64::from(encode(n).parity()), n % 2))
    }));
    checks.push(check("n * 3 by shift", range(), |n| {
        Ok((decode(mul_pow3(encode(n), 1)?), 3 * n))
    }));
    checks.push(check("(n+1) + 2n", range(), |n| {
        Ok((decode(add(encode(n + 1), encode(2 * n))?), 3 * n + 1))
    }));
    checks.push(check("(2n+3) - (n+1)", range(), |n| {
        Ok((decode(subtract(encode(2 * n + 3), encode(n + 1))?), n + 2))
    }));
    checks.push(check("n * 2", range(), |n| Ok((decode(double_value(encode(n))?), 2 * n))));
    for k in 1..=5u32 {
        checks.push(check(&format!("n * 2^{}", k), range(), |n| {
            Ok((decode(multiply_by_pow2(encode(n), k)?), n << k))
        }));
    }
    for k in [1u32, 3, 5] {
        checks.push(check(&format!("exact n / 2^{}", k), range(), |n| {
            Ok((decode(divider.exact(encode(n << k), k)?), n))
        }));
    }
    checks.push(check("floor n / 32", range(), |n| {
        Ok((decode(divider.floor(encode(n), 5)?.0), n / 32))
    }));
    checks.push(check("floor n mod 32", range(), |n| {
        Ok((decode(divider.floor(encode(n), 5)?.1), n % 32))
    }));
    for k in [3u32, 5, 7, 9] {
        let modulus = (1u64 << k) - 1;
        checks.push(check(&format!("n mod (2^{} - 1)", k), range(), |n| {
            Ok((decode(divider.mersenne(encode(n), k)?), n % modulus))
        }));
    }

    CheckReport { checks }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_check_passes() {
        let report = run_self_check(&CheckConfig { range: 600, ..CheckConfig::default() });
        assert!(report.passed(), "{:#?}", report);
        assert_eq!(report.failed_checks(), 0);
        assert!(report.checks.iter().all(|c| c.cases == 600));
    }

    #[test]
    fn test_failures_are_reported() {
        // Without fuel nothing in the division family can settle.
        let config = CheckConfig { range: 10, limits: Limits { max_rounds: 0 } };
        let report = run_self_check(&config);
        assert!(!report.passed());

        let exact = report.checks.iter().find(|c| c.name == "exact n / 2^5").unwrap();
        assert_eq!(exact.failures, 10);
        let message = exact.first_failure.as_deref().unwrap();
        assert!(message.starts_with("n = 0: "), "{}", message);
        assert!(message.contains("did not converge"), "{}", message);

        // Checks outside the division family are unaffected.
        let roundtrip = &report.checks[1];
        assert!(roundtrip.passed());
    }

    #[test]
    fn test_range_is_capped() {
        let config = CheckConfig { range: u64::MAX, ..CheckConfig::default() };
        assert_eq!(config.effective_range(), CheckConfig::MAX_RANGE);
        assert_eq!(CheckConfig::default().effective_range(), 10_000);
    }

    #[test]
    fn test_largest_inputs_pass() {
        let top = CheckConfig::MAX_RANGE;
        let report = run_checks(top - 3..top, Divider::default());
        assert!(report.passed(), "{:#?}", report);
        assert!(report.checks.iter().all(|c| c.cases == 3));
    }

    #[test]
    fn test_report_serializes() {
        let report = run_self_check(&CheckConfig { range: 3, ..CheckConfig::default() });
        let json = serde_json::to_string(&report).unwrap();
        let back: CheckReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
