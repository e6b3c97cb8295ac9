//! Policy and plan repository implementation
//!
//! Remaining coverage is only ever decremented through
//! [`PolicyRepository::debit_coverage`], whose `WHERE` clause refuses to take
//! the balance below zero.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for policies and the plans they are issued on
///
/// # Example
///
/// ```rust,ignore
/// use infra_db::repositories::PolicyRepository;
///
/// let repo = PolicyRepository::new(pool);
/// let policy = repo.get_by_id(policy_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct PolicyRepository {
    pool: PgPool,
}

impl PolicyRepository {
    /// Creates a new PolicyRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a policy by its identifier
    pub async fn get_by_id(&self, policy_id: Uuid) -> Result<Option<PolicyRow>, DatabaseError> {
        let row = sqlx::query_as::<_, PolicyRow>(
            r#"
            SELECT
                policy_id, policy_number, holder_id, plan_id, coverage_amount,
                remaining_coverage, currency, status, start_date, end_date,
                created_at, updated_at
            FROM policies
            WHERE policy_id = $1
            "#,
        )
        .bind(policy_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Inserts a newly issued policy
    pub async fn insert(&self, policy: &PolicyRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO policies (
                policy_id, policy_number, holder_id, plan_id, coverage_amount,
                remaining_coverage, currency, status, start_date, end_date,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(policy.policy_id)
        .bind(&policy.policy_number)
        .bind(policy.holder_id)
        .bind(policy.plan_id)
        .bind(policy.coverage_amount)
        .bind(policy.remaining_coverage)
        .bind(&policy.currency)
        .bind(policy.status)
        .bind(policy.start_date)
        .bind(policy.end_date)
        .bind(policy.created_at)
        .bind(policy.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Subtracts `amount` from the remaining coverage of an active policy
    ///
    /// Returns the new balance, or `None` when the policy is not active or
    /// the balance would go negative.
    pub async fn debit_coverage(
        conn: &mut PgConnection,
        policy_id: Uuid,
        amount: Decimal,
    ) -> Result<Option<Decimal>, DatabaseError> {
        let remaining = sqlx::query_scalar::<_, Decimal>(
            r#"
            UPDATE policies
            SET remaining_coverage = remaining_coverage - $2,
                updated_at = NOW()
            WHERE policy_id = $1
              AND status = 'active'
              AND remaining_coverage >= $2
            RETURNING remaining_coverage
            "#,
        )
        .bind(policy_id)
        .bind(amount)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(remaining)
    }

    /// Inserts a plan
    pub async fn insert_plan(&self, plan: &PlanRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO insurance_plans (
                plan_id, name, description, coverage_amount, premium_amount,
                currency, duration_months, is_active, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(plan.plan_id)
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(plan.coverage_amount)
        .bind(plan.premium_amount)
        .bind(&plan.currency)
        .bind(plan.duration_months)
        .bind(plan.is_active)
        .bind(plan.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Policy status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "policy_status", rename_all = "snake_case")]
pub enum PolicyStatus {
    Active,
    Expired,
    Suspended,
    Cancelled,
}

/// Database row for a policy
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PolicyRow {
    pub policy_id: Uuid,
    pub policy_number: String,
    pub holder_id: Uuid,
    pub plan_id: Uuid,
    pub coverage_amount: Decimal,
    pub remaining_coverage: Decimal,
    pub currency: String,
    pub status: PolicyStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database row for an insurance plan
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PlanRow {
    pub plan_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub coverage_amount: Decimal,
    pub premium_amount: Decimal,
    pub currency: String,
    pub duration_months: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
