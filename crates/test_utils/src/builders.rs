//! Test Data Builders
//!
//! Builders for claims and seeded service stacks. Tests set the fields they
//! care about and take defaults for the rest. Claims are always driven through
//! their real transition methods, so a built claim satisfies every invariant.

use std::sync::Arc;

use rust_decimal::Decimal;

use core_kernel::{HospitalId, Money, UserId};
use domain_claims::{Claim, ClaimLifecycleService, ClaimStatus, MockClaimStore};
use domain_notification::MockNotificationFeed;
use domain_policy::Policy;

use crate::fixtures::{IdFixtures, MoneyFixtures, PolicyFixtures};

/// Builder for a claim in any lifecycle status
pub struct TestClaimBuilder {
    policy: Policy,
    hospital_id: HospitalId,
    claim_amount: Money,
    description: Option<String>,
    status: ClaimStatus,
    approved_amount: Option<Money>,
    rejection_reason: String,
}

impl TestClaimBuilder {
    /// Starts a Submitted claim against `policy`
    pub fn new(policy: &Policy) -> Self {
        Self {
            policy: policy.clone(),
            hospital_id: IdFixtures::hospital_id(),
            claim_amount: MoneyFixtures::usd_claim(),
            description: Some("Inpatient treatment".to_string()),
            status: ClaimStatus::Submitted,
            approved_amount: None,
            rejection_reason: "Not covered by plan".to_string(),
        }
    }

    /// Starts a claim on a fresh standard policy
    pub fn standard() -> Self {
        Self::new(&PolicyFixtures::active_policy(UserId::new()))
    }

    pub fn with_hospital(mut self, hospital_id: HospitalId) -> Self {
        self.hospital_id = hospital_id;
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.claim_amount = MoneyFixtures::usd(amount);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Medical notes attached
    pub fn in_review(mut self) -> Self {
        self.status = ClaimStatus::InReview;
        self
    }

    /// Approved for the full claim amount
    pub fn approved(mut self) -> Self {
        self.status = ClaimStatus::Approved;
        self
    }

    pub fn approved_for(mut self, amount: Decimal) -> Self {
        self.status = ClaimStatus::Approved;
        self.approved_amount = Some(MoneyFixtures::usd(amount));
        self
    }

    pub fn rejected(mut self, reason: impl Into<String>) -> Self {
        self.status = ClaimStatus::Rejected;
        self.rejection_reason = reason.into();
        self
    }

    pub fn paid(mut self) -> Self {
        self.status = ClaimStatus::Paid;
        self
    }

    /// Builds the claim
    ///
    /// # Panics
    ///
    /// Panics if the requested state is unreachable, e.g. an approval larger
    /// than the policy's remaining coverage.
    pub fn build(self) -> Claim {
        let mut claim = Claim::submit(
            self.policy.id,
            self.policy.holder_id,
            self.hospital_id,
            self.claim_amount,
            self.description,
        )
        .expect("valid claim");

        let reviewer = UserId::new();
        let approved = self.approved_amount.unwrap_or(self.claim_amount);
        match self.status {
            ClaimStatus::Submitted => {}
            ClaimStatus::InReview => {
                claim
                    .add_medical_notes(UserId::new(), "Patient admitted and treated")
                    .expect("notes accepted");
            }
            ClaimStatus::Approved => {
                claim
                    .approve(reviewer, approved, &self.policy.coverage())
                    .expect("approval within coverage");
            }
            ClaimStatus::Rejected => {
                claim
                    .reject(reviewer, &self.rejection_reason)
                    .expect("rejection accepted");
            }
            ClaimStatus::Paid => {
                claim
                    .approve(reviewer, approved, &self.policy.coverage())
                    .expect("approval within coverage");
                claim.mark_paid().expect("payment accepted");
            }
        }
        claim
    }
}

/// A lifecycle service wired to in-memory adapters
pub struct TestServiceStack {
    pub service: ClaimLifecycleService,
    pub store: MockClaimStore,
    pub notifications: MockNotificationFeed,
}

impl TestServiceStack {
    /// Builds a stack holding `policies`
    pub async fn with_policies(policies: Vec<Policy>) -> Self {
        let store = MockClaimStore::with_policies(policies).await;
        let notifications = MockNotificationFeed::new();
        let service = ClaimLifecycleService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(notifications.clone()),
        );
        Self {
            service,
            store,
            notifications,
        }
    }
}
