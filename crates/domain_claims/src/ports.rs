//! Claims Domain Ports
//!
//! The lifecycle service talks to three collaborators:
//!
//! - **`ClaimStore`**: loads and persists claims. `commit` is the transaction
//!   boundary of every transition.
//! - **`CoverageChecker`**: reports a policy's status and remaining coverage.
//! - **`NotificationDispatcher`**: receives an event after each committed
//!   transition.
//!
//! `infra_db` provides the PostgreSQL adapters. The `mock` feature enables an
//! in-memory implementation for tests.

use async_trait::async_trait;

use core_kernel::{
    ClaimId, DomainPort, HospitalId, Money, PolicyId, PortError, UserId,
};
use domain_policy::PolicyCoverage;

use crate::claim::{Claim, ClaimStatus};
use crate::events::ClaimEvent;
use crate::report::StatusTotals;

/// Filters for listing claims
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimQuery {
    pub status: Option<ClaimStatus>,
    pub policy_id: Option<PolicyId>,
    pub holder_id: Option<UserId>,
    pub hospital_id: Option<HospitalId>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ClaimQuery {
    /// Claims owned by one policy holder
    pub fn for_holder(holder_id: UserId) -> Self {
        Self {
            holder_id: Some(holder_id),
            ..Default::default()
        }
    }

    /// Claims treated at one hospital
    pub fn for_hospital(hospital_id: HospitalId) -> Self {
        Self {
            hospital_id: Some(hospital_id),
            ..Default::default()
        }
    }

    /// Adds pagination to the query
    pub fn paginate(mut self, limit: u32, offset: u32) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    /// Returns true if `claim` satisfies every filter
    pub fn matches(&self, claim: &Claim) -> bool {
        self.status.map_or(true, |s| claim.status == s)
            && self.policy_id.map_or(true, |p| claim.policy_id == p)
            && self.holder_id.map_or(true, |h| claim.holder_id == h)
            && self.hospital_id.map_or(true, |h| claim.hospital_id == h)
    }
}

/// Coverage to subtract from a policy in the same commit as a claim update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageDebit {
    pub policy_id: PolicyId,
    pub amount: Money,
}

/// A claim update to persist atomically
///
/// The store must re-read the stored status, compare it with
/// `expected_status` and fail with `PortError::Conflict` on mismatch. The
/// coverage debit, if any, must fail with a conflict when the policy no longer
/// has enough remaining coverage. Nothing is written unless everything succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimTransition {
    pub claim: Claim,
    pub expected_status: ClaimStatus,
    pub coverage_debit: Option<CoverageDebit>,
}

/// Persistence port for claims
#[async_trait]
pub trait ClaimStore: DomainPort {
    /// Loads a claim by ID
    async fn load(&self, id: ClaimId) -> Result<Claim, PortError>;

    /// Stores a newly submitted claim
    async fn insert(&self, claim: &Claim) -> Result<(), PortError>;

    /// Lists claims matching the query, newest first
    async fn list(&self, query: &ClaimQuery) -> Result<Vec<Claim>, PortError>;

    /// Applies a transition in one transaction and returns the stored claim
    async fn commit(&self, transition: ClaimTransition) -> Result<Claim, PortError>;

    /// Counts and sums every claim, grouped by status and currency
    async fn status_totals(&self) -> Result<Vec<StatusTotals>, PortError>;
}

/// Read access to policy coverage
#[async_trait]
pub trait CoverageChecker: DomainPort {
    /// Returns the current coverage snapshot for a policy
    async fn coverage(&self, policy_id: PolicyId) -> Result<PolicyCoverage, PortError>;
}

/// Delivery of lifecycle events to users
#[async_trait]
pub trait NotificationDispatcher: DomainPort {
    async fn dispatch(&self, event: &ClaimEvent) -> Result<(), PortError>;
}

/// In-memory implementations for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::{HealthCheckable, HealthCheckResult};
    use domain_policy::Policy;

    #[derive(Debug, Default)]
    struct State {
        claims: HashMap<ClaimId, Claim>,
        policies: HashMap<PolicyId, Policy>,
    }

    /// In-memory claim store that also answers coverage lookups
    ///
    /// Claims and policies share one lock so `commit` is atomic.
    #[derive(Debug, Default, Clone)]
    pub struct MockClaimStore {
        state: Arc<RwLock<State>>,
    }

    impl MockClaimStore {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with policies for testing
        pub async fn with_policies(policies: Vec<Policy>) -> Self {
            let store = Self::new();
            for policy in policies {
                store.put_policy(policy).await;
            }
            store
        }

        /// Inserts or replaces a policy
        pub async fn put_policy(&self, policy: Policy) {
            self.state.write().await.policies.insert(policy.id, policy);
        }

        /// Inserts or replaces a claim without any checks
        pub async fn put_claim(&self, claim: Claim) {
            self.state.write().await.claims.insert(claim.id, claim);
        }

        /// Returns the stored policy
        pub async fn policy(&self, id: PolicyId) -> Option<Policy> {
            self.state.read().await.policies.get(&id).cloned()
        }

        /// Returns the stored claim
        pub async fn claim(&self, id: ClaimId) -> Option<Claim> {
            self.state.read().await.claims.get(&id).cloned()
        }
    }

    impl DomainPort for MockClaimStore {}

    #[async_trait]
    impl HealthCheckable for MockClaimStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("mock-claim-store")
        }
    }

    #[async_trait]
    impl ClaimStore for MockClaimStore {
        async fn load(&self, id: ClaimId) -> Result<Claim, PortError> {
            self.state
                .read()
                .await
                .claims
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Claim", id))
        }

        async fn insert(&self, claim: &Claim) -> Result<(), PortError> {
            let mut state = self.state.write().await;
            if state.claims.values().any(|c| c.claim_number == claim.claim_number) {
                return Err(PortError::conflict(format!(
                    "Claim number {} already exists",
                    claim.claim_number
                )));
            }
            state.claims.insert(claim.id, claim.clone());
            Ok(())
        }

        async fn list(&self, query: &ClaimQuery) -> Result<Vec<Claim>, PortError> {
            let state = self.state.read().await;
            let mut claims: Vec<Claim> = state
                .claims
                .values()
                .filter(|c| query.matches(c))
                .cloned()
                .collect();
            claims.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));

            let offset = query.offset.unwrap_or(0) as usize;
            let limit = query.limit.unwrap_or(100) as usize;
            Ok(claims.into_iter().skip(offset).take(limit).collect())
        }

        async fn commit(&self, transition: ClaimTransition) -> Result<Claim, PortError> {
            let mut state = self.state.write().await;
            let claim_id = transition.claim.id;

            let current = state
                .claims
                .get(&claim_id)
                .ok_or_else(|| PortError::not_found("Claim", claim_id))?;
            if current.status != transition.expected_status {
                return Err(PortError::conflict(format!(
                    "Claim {} is {}, expected {}",
                    claim_id, current.status, transition.expected_status
                )));
            }

            if let Some(debit) = transition.coverage_debit {
                let policy = state
                    .policies
                    .get_mut(&debit.policy_id)
                    .ok_or_else(|| PortError::not_found("Policy", debit.policy_id))?;
                let mut updated = policy.clone();
                updated
                    .debit_coverage(debit.amount)
                    .map_err(|e| PortError::conflict(e.to_string()))?;
                *policy = updated;
            }

            state.claims.insert(claim_id, transition.claim.clone());
            Ok(transition.claim)
        }

        async fn status_totals(&self) -> Result<Vec<StatusTotals>, PortError> {
            let state = self.state.read().await;
            let claims: Vec<Claim> = state.claims.values().cloned().collect();
            Ok(StatusTotals::tally(&claims))
        }
    }

    #[async_trait]
    impl CoverageChecker for MockClaimStore {
        async fn coverage(&self, policy_id: PolicyId) -> Result<PolicyCoverage, PortError> {
            self.state
                .read()
                .await
                .policies
                .get(&policy_id)
                .map(Policy::coverage)
                .ok_or_else(|| PortError::not_found("Policy", policy_id))
        }
    }

    /// Dispatcher that records every event it receives
    #[derive(Debug, Default, Clone)]
    pub struct RecordingDispatcher {
        events: Arc<RwLock<Vec<ClaimEvent>>>,
    }

    impl RecordingDispatcher {
        pub fn new() -> Self {
            Self::default()
        }

        /// Events dispatched so far, oldest first
        pub async fn events(&self) -> Vec<ClaimEvent> {
            self.events.read().await.clone()
        }
    }

    impl DomainPort for RecordingDispatcher {}

    #[async_trait]
    impl NotificationDispatcher for RecordingDispatcher {
        async fn dispatch(&self, event: &ClaimEvent) -> Result<(), PortError> {
            self.events.write().await.push(event.clone());
            Ok(())
        }
    }

    /// Dispatcher whose transport is always down
    #[derive(Debug, Default, Clone, Copy)]
    pub struct FailingDispatcher;

    impl DomainPort for FailingDispatcher {}

    #[async_trait]
    impl NotificationDispatcher for FailingDispatcher {
        async fn dispatch(&self, _event: &ClaimEvent) -> Result<(), PortError> {
            Err(PortError::connection("notification transport unavailable"))
        }
    }
}
