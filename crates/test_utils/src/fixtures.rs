//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for the claims platform. Values are fixed so that
//! expectations in tests stay readable.

use chrono::NaiveDate;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use core_kernel::{ClaimId, Currency, HospitalId, Money, PolicyId, UserId};
use domain_claims::{Actor, Role};
use domain_policy::{InsurancePlan, Policy};

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    pub fn usd(amount: Decimal) -> Money {
        Money::new(amount, Currency::USD)
    }

    /// A typical hospitalisation bill
    pub fn usd_claim() -> Money {
        Self::usd(dec!(1200.00))
    }

    /// Coverage of the standard test plan
    pub fn usd_coverage() -> Money {
        Self::usd(dec!(20000.00))
    }

    pub fn usd_premium() -> Money {
        Self::usd(dec!(450.00))
    }

    pub fn usd_zero() -> Money {
        Money::zero(Currency::USD)
    }

    /// A EUR amount for currency mismatch tests
    pub fn eur_100() -> Money {
        Money::new(dec!(100.00), Currency::EUR)
    }
}

/// Fixture for dates
pub struct DateFixtures;

impl DateFixtures {
    /// Standard policy start date (Jan 1, 2026)
    pub fn policy_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    pub fn policy_id() -> PolicyId {
        PolicyId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap())
    }

    pub fn claim_id() -> ClaimId {
        ClaimId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap())
    }

    pub fn holder_id() -> UserId {
        UserId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440003").unwrap())
    }

    pub fn hospital_id() -> HospitalId {
        HospitalId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440004").unwrap())
    }
}

/// Fixture for plans and policies
pub struct PolicyFixtures;

impl PolicyFixtures {
    /// A 12 month plan with USD 20,000 coverage
    pub fn standard_plan() -> InsurancePlan {
        InsurancePlan::new(
            "Standard Health",
            MoneyFixtures::usd_coverage(),
            MoneyFixtures::usd_premium(),
            12,
        )
        .unwrap()
    }

    /// A plan with custom coverage
    pub fn plan_with_coverage(coverage: Decimal) -> InsurancePlan {
        InsurancePlan::new(
            "Custom Health",
            MoneyFixtures::usd(coverage),
            MoneyFixtures::usd_premium(),
            12,
        )
        .unwrap()
    }

    /// An active policy on the standard plan
    pub fn active_policy(holder_id: UserId) -> Policy {
        Policy::issue(&Self::standard_plan(), holder_id, DateFixtures::policy_start()).unwrap()
    }

    /// An active policy with `remaining` coverage left out of `coverage`
    pub fn policy_with_remaining(holder_id: UserId, coverage: Decimal, remaining: Decimal) -> Policy {
        let mut policy =
            Policy::issue(&Self::plan_with_coverage(coverage), holder_id, DateFixtures::policy_start())
                .unwrap();
        policy.remaining_coverage = MoneyFixtures::usd(remaining);
        policy
    }
}

/// Fixture for actors, one per role
pub struct ActorFixtures;

impl ActorFixtures {
    pub fn holder() -> Actor {
        Actor::new(UserId::new(), Role::PolicyHolder)
    }

    pub fn staff_at(hospital_id: HospitalId) -> Actor {
        Actor::new(UserId::new(), Role::HospitalStaff).with_hospital(hospital_id)
    }

    pub fn officer() -> Actor {
        Actor::new(UserId::new(), Role::ClaimsOfficer)
    }

    pub fn agent() -> Actor {
        Actor::new(UserId::new(), Role::InsuranceAgent)
    }

    pub fn admin() -> Actor {
        Actor::new(UserId::new(), Role::Admin)
    }
}

/// Profile data for seeding a user account
#[derive(Debug, Clone)]
pub struct UserSeed {
    pub actor: Actor,
    pub full_name: String,
    pub email: String,
}

impl UserSeed {
    /// Random name and email for an actor
    pub fn for_actor(actor: Actor) -> Self {
        Self {
            actor,
            full_name: Name().fake(),
            email: format!("{}.{}", actor.user_id.as_uuid().simple(), SafeEmail().fake::<String>()),
        }
    }
}
