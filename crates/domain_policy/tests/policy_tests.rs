//! Unit tests for plans, policies and coverage debits

use chrono::NaiveDate;
use core_kernel::{Currency, Money, UserId};
use domain_policy::{InsurancePlan, Policy, PolicyError, PolicyStatus};
use rust_decimal_macros::dec;

fn usd(amount: rust_decimal::Decimal) -> Money {
    Money::new(amount, Currency::USD)
}

fn create_test_plan() -> InsurancePlan {
    InsurancePlan::new("Gold Health", usd(dec!(20000)), usd(dec!(450)), 12).unwrap()
}

fn create_test_policy() -> Policy {
    let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    Policy::issue(&create_test_plan(), UserId::new(), start).unwrap()
}

mod plan_creation {
    use super::*;

    #[test]
    fn test_plan_requires_name() {
        let result = InsurancePlan::new("  ", usd(dec!(1000)), usd(dec!(10)), 12);
        assert!(matches!(result, Err(PolicyError::Validation(_))));
    }

    #[test]
    fn test_plan_requires_positive_coverage() {
        let result = InsurancePlan::new("Basic", usd(dec!(0)), usd(dec!(10)), 12);
        assert!(matches!(result, Err(PolicyError::Validation(_))));
    }

    #[test]
    fn test_plan_requires_duration() {
        let result = InsurancePlan::new("Basic", usd(dec!(1000)), usd(dec!(10)), 0);
        assert!(matches!(result, Err(PolicyError::Validation(_))));
    }

    #[test]
    fn test_retired_plan_cannot_issue() {
        let mut plan = create_test_plan();
        plan.retire();

        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let result = Policy::issue(&plan, UserId::new(), start);
        assert!(matches!(result, Err(PolicyError::PlanUnavailable(_))));
    }
}

mod coverage_debits {
    use super::*;

    #[test]
    fn test_debit_reduces_remaining() {
        let mut policy = create_test_policy();
        policy.debit_coverage(usd(dec!(15000))).unwrap();

        assert_eq!(policy.remaining_coverage.amount(), dec!(5000));
        assert_eq!(policy.coverage_amount.amount(), dec!(20000));
    }

    #[test]
    fn test_debit_of_exact_remaining_is_allowed() {
        let mut policy = create_test_policy();
        policy.debit_coverage(usd(dec!(20000))).unwrap();
        assert!(policy.remaining_coverage.is_zero());
    }

    #[test]
    fn test_debit_exceeding_remaining_fails_without_change() {
        let mut policy = create_test_policy();
        policy.debit_coverage(usd(dec!(15000))).unwrap();

        let result = policy.debit_coverage(usd(dec!(8000)));
        assert!(matches!(result, Err(PolicyError::CoverageExceeded { .. })));
        assert_eq!(policy.remaining_coverage.amount(), dec!(5000));
    }

    #[test]
    fn test_debit_rejects_currency_mismatch() {
        let mut policy = create_test_policy();
        let result = policy.debit_coverage(Money::new(dec!(10), Currency::EUR));
        assert!(matches!(result, Err(PolicyError::Financial(_))));
    }

    #[test]
    fn test_debit_on_suspended_policy_fails() {
        let mut policy = create_test_policy();
        policy.suspend().unwrap();

        let result = policy.debit_coverage(usd(dec!(10)));
        assert!(matches!(result, Err(PolicyError::NotActive(_))));
    }

    #[test]
    fn test_coverage_snapshot_reflects_policy() {
        let mut policy = create_test_policy();
        policy.debit_coverage(usd(dec!(1000))).unwrap();

        let coverage = policy.coverage();
        assert_eq!(coverage.policy_id, policy.id);
        assert_eq!(coverage.holder_id, policy.holder_id);
        assert_eq!(coverage.remaining.amount(), dec!(19000));
        assert!(coverage.is_active());
        assert!(coverage.covers(&usd(dec!(19000))).unwrap());
        assert!(!coverage.covers(&usd(dec!(19000.01))).unwrap());
    }
}

mod status_transitions {
    use super::*;

    #[test]
    fn test_suspend_and_reactivate() {
        let mut policy = create_test_policy();
        policy.suspend().unwrap();
        assert_eq!(policy.status, PolicyStatus::Suspended);

        policy.reactivate().unwrap();
        assert_eq!(policy.status, PolicyStatus::Active);
    }

    #[test]
    fn test_cancelled_is_final() {
        let mut policy = create_test_policy();
        policy.cancel().unwrap();

        assert!(policy.reactivate().is_err());
        assert!(policy.suspend().is_err());
        assert!(!policy.coverage().is_active());
    }

    #[test]
    fn test_expire_only_after_end_date() {
        let mut policy = create_test_policy();
        assert!(policy.expire(policy.end_date).is_err());

        let after = policy.end_date.succ_opt().unwrap();
        policy.expire(after).unwrap();
        assert_eq!(policy.status, PolicyStatus::Expired);
    }
}
