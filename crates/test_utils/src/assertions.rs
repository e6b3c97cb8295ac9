//! Custom Test Assertions
//!
//! Assertion helpers for domain types with more useful failure messages than
//! plain `assert_eq!`.

use rust_decimal::Decimal;

use core_kernel::Money;
use domain_claims::{Claim, ClaimStatus};
use domain_policy::Policy;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts the field/status invariants of a claim
pub fn assert_claim_consistent(claim: &Claim) {
    assert!(
        claim.is_consistent(),
        "Claim {} violates its invariants: status={}, approved={:?}, rejection={:?}",
        claim.claim_number,
        claim.status,
        claim.approved_amount,
        claim.rejection_reason
    );
}

/// Asserts a claim's status
pub fn assert_claim_status(claim: &Claim, expected: ClaimStatus) {
    assert_eq!(
        claim.status, expected,
        "Claim {} is {}, expected {}",
        claim.claim_number, claim.status, expected
    );
}

/// Asserts a policy's remaining coverage
pub fn assert_remaining_coverage(policy: &Policy, expected: Decimal) {
    assert_eq!(
        policy.remaining_coverage.amount(),
        expected,
        "Policy {} has {} remaining, expected {}",
        policy.policy_number,
        policy.remaining_coverage,
        expected
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_approx_eq_within_tolerance() {
        let a = Money::new(dec!(100.004), Currency::USD);
        let b = Money::new(dec!(100.00), Currency::USD);
        assert_money_approx_eq(&a, &b, dec!(0.01));
    }

    #[test]
    #[should_panic(expected = "Currency mismatch")]
    fn test_money_approx_eq_currency_mismatch() {
        let a = Money::new(dec!(100), Currency::USD);
        let b = Money::new(dec!(100), Currency::EUR);
        assert_money_approx_eq(&a, &b, dec!(0.01));
    }
}
