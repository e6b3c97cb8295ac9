//! Property-Based Test Generators
//!
//! Proptest strategies for claim amounts, roles and review decisions.

use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::{Currency, Money};
use domain_claims::{ClaimStatus, ReviewDecision, Role};

/// Strategy for valid positive amounts in minor units (up to 10M)
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000i64
}

/// Strategy for positive USD Money values
pub fn usd_money_strategy() -> impl Strategy<Value = Money> {
    positive_amount_minor_strategy().prop_map(|amount| Money::from_minor(amount, Currency::USD))
}

/// Strategy for positive decimal amounts with two decimal places
pub fn amount_decimal_strategy() -> impl Strategy<Value = Decimal> {
    positive_amount_minor_strategy().prop_map(|minor| Decimal::new(minor, 2))
}

/// Strategy for any role
pub fn role_strategy() -> impl Strategy<Value = Role> {
    proptest::sample::select(Role::ALL.to_vec())
}

/// Strategy for any claim status
pub fn claim_status_strategy() -> impl Strategy<Value = ClaimStatus> {
    proptest::sample::select(ClaimStatus::ALL.to_vec())
}

/// Strategy for review decisions, including invalid ones
///
/// Approvals range from zero to `max_minor` minor units; rejections may carry
/// a blank reason.
pub fn review_decision_strategy(max_minor: i64) -> impl Strategy<Value = ReviewDecision> {
    prop_oneof![
        (0i64..=max_minor).prop_map(|minor| ReviewDecision::Approve {
            amount: Money::from_minor(minor, Currency::USD),
        }),
        prop_oneof![
            Just(String::new()),
            Just("   ".to_string()),
            "[A-Za-z ]{1,40}".prop_map(String::from),
        ]
        .prop_map(|reason| ReviewDecision::Reject { reason }),
    ]
}
