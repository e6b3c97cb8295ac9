//! PostgreSQL Claim Store Adapter
//!
//! Implements `ClaimStore` and `CoverageChecker` on top of the claims and
//! policy repositories.
//!
//! # Transactions
//!
//! `commit` runs in a single transaction:
//!
//! 1. `SELECT status ... FOR UPDATE` on the claim row
//! 2. compare with the status the service loaded
//! 3. debit the policy's remaining coverage if the transition carries a debit
//! 4. write the claim
//!
//! Any failure rolls everything back when the transaction is dropped.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};

use core_kernel::{
    AdapterHealth, ClaimId, DomainPort, HealthCheckResult, HealthCheckable, PolicyId, PortError,
};
use domain_claims::{
    Claim, ClaimQuery, ClaimStore, ClaimTransition, CoverageChecker, StatusTotals,
};
use domain_policy::PolicyCoverage;

use crate::adapters::mapping::{
    claim_status_from_db, claim_status_to_db, claim_to_row, row_to_claim, row_to_policy,
    row_to_status_totals,
};
use crate::error::DatabaseError;
use crate::repositories::claims::{ClaimFilter, ClaimsRepository};
use crate::repositories::policy::PolicyRepository;

/// PostgreSQL-backed claim store and coverage checker
#[derive(Debug, Clone)]
pub struct PostgresClaimStore {
    claims: ClaimsRepository,
    policies: PolicyRepository,
    pool: PgPool,
}

impl PostgresClaimStore {
    /// Creates a new PostgreSQL claim store
    pub fn new(pool: PgPool) -> Self {
        Self {
            claims: ClaimsRepository::new(pool.clone()),
            policies: PolicyRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns the policy repository for seeding and policy administration
    pub fn policies(&self) -> &PolicyRepository {
        &self.policies
    }
}

impl DomainPort for PostgresClaimStore {}

#[async_trait]
impl HealthCheckable for PostgresClaimStore {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, "postgres-claim-store").await
    }
}

#[async_trait]
impl ClaimStore for PostgresClaimStore {
    #[instrument(skip(self), fields(claim_id = %id))]
    async fn load(&self, id: ClaimId) -> Result<Claim, PortError> {
        debug!("Loading claim");
        let row = self
            .claims
            .get_by_id(id.into())
            .await?
            .ok_or_else(|| PortError::not_found("Claim", id))?;
        row_to_claim(row)
    }

    #[instrument(skip(self, claim), fields(claim_id = %claim.id))]
    async fn insert(&self, claim: &Claim) -> Result<(), PortError> {
        self.claims.insert(&claim_to_row(claim)).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &ClaimQuery) -> Result<Vec<Claim>, PortError> {
        let mut filter = ClaimFilter {
            status: query.status.map(claim_status_to_db),
            policy_id: query.policy_id.map(Into::into),
            holder_id: query.holder_id.map(Into::into),
            hospital_id: query.hospital_id.map(Into::into),
            ..ClaimFilter::default()
        };
        if let Some(limit) = query.limit {
            filter.limit = i64::from(limit);
        }
        if let Some(offset) = query.offset {
            filter.offset = i64::from(offset);
        }

        self.claims
            .list(&filter)
            .await?
            .into_iter()
            .map(row_to_claim)
            .collect()
    }

    #[instrument(skip(self, transition), fields(claim_id = %transition.claim.id))]
    async fn commit(&self, transition: ClaimTransition) -> Result<Claim, PortError> {
        let claim_id = transition.claim.id;
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;

        let stored = ClaimsRepository::lock_status(&mut tx, claim_id.into())
            .await?
            .map(claim_status_from_db)
            .ok_or_else(|| PortError::not_found("Claim", claim_id))?;
        if stored != transition.expected_status {
            warn!(%stored, expected = %transition.expected_status, "Claim status changed concurrently");
            return Err(PortError::conflict(format!(
                "Claim {} is {}, expected {}",
                claim_id, stored, transition.expected_status
            )));
        }

        if let Some(debit) = transition.coverage_debit {
            let remaining =
                PolicyRepository::debit_coverage(&mut tx, debit.policy_id.into(), debit.amount.amount())
                    .await?
                    .ok_or_else(|| {
                        PortError::conflict(format!(
                            "Policy {} cannot cover {}",
                            debit.policy_id, debit.amount
                        ))
                    })?;
            debug!(policy_id = %debit.policy_id, %remaining, "Coverage debited");
        }

        let row = ClaimsRepository::update(&mut tx, &claim_to_row(&transition.claim)).await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        row_to_claim(row)
    }

    #[instrument(skip(self))]
    async fn status_totals(&self) -> Result<Vec<StatusTotals>, PortError> {
        self.claims
            .status_totals()
            .await?
            .into_iter()
            .map(row_to_status_totals)
            .collect()
    }
}

#[async_trait]
impl CoverageChecker for PostgresClaimStore {
    #[instrument(skip(self), fields(policy_id = %policy_id))]
    async fn coverage(&self, policy_id: PolicyId) -> Result<PolicyCoverage, PortError> {
        let row = self
            .policies
            .get_by_id(policy_id.into())
            .await?
            .ok_or_else(|| PortError::not_found("Policy", policy_id))?;
        Ok(row_to_policy(row)?.coverage())
    }
}

/// Runs `SELECT 1` and reports the latency
pub(crate) async fn ping(pool: &PgPool, adapter_id: &str) -> HealthCheckResult {
    let start = std::time::Instant::now();

    let result = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let (status, message) = match result {
        Ok(_) => (AdapterHealth::Healthy, None),
        Err(e) => (AdapterHealth::Unhealthy, Some(format!("Database error: {}", e))),
    };
    HealthCheckResult {
        adapter_id: adapter_id.to_string(),
        status,
        latency_ms,
        message,
        checked_at: Utc::now(),
    }
}
