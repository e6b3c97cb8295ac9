//! Claims repository implementation
//!
//! Plain row access for the `claims` table. Status checks and the coverage
//! debit of a review are composed into one transaction by the claim store
//! adapter, so the write methods here take a connection rather than the pool.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::DatabaseError;

const CLAIM_COLUMNS: &str = r#"
    claim_id, claim_number, policy_id, holder_id, hospital_id, status,
    claim_amount, approved_amount, currency, description, medical_notes,
    notes_added_by, rejection_reason, reviewed_by, submitted_at, reviewed_at,
    paid_at, updated_at
"#;

/// Repository for the claims table
#[derive(Debug, Clone)]
pub struct ClaimsRepository {
    pool: PgPool,
}

impl ClaimsRepository {
    /// Creates a new ClaimsRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a claim by its identifier
    pub async fn get_by_id(&self, claim_id: Uuid) -> Result<Option<ClaimRow>, DatabaseError> {
        let sql = format!("SELECT {} FROM claims WHERE claim_id = $1", CLAIM_COLUMNS);
        let row = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(claim_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Inserts a newly submitted claim
    pub async fn insert(&self, claim: &ClaimRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO claims (
                claim_id, claim_number, policy_id, holder_id, hospital_id, status,
                claim_amount, approved_amount, currency, description, medical_notes,
                notes_added_by, rejection_reason, reviewed_by, submitted_at, reviewed_at,
                paid_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18
            )
            "#,
        )
        .bind(claim.claim_id)
        .bind(&claim.claim_number)
        .bind(claim.policy_id)
        .bind(claim.holder_id)
        .bind(claim.hospital_id)
        .bind(claim.status)
        .bind(claim.claim_amount)
        .bind(claim.approved_amount)
        .bind(&claim.currency)
        .bind(&claim.description)
        .bind(&claim.medical_notes)
        .bind(claim.notes_added_by)
        .bind(&claim.rejection_reason)
        .bind(claim.reviewed_by)
        .bind(claim.submitted_at)
        .bind(claim.reviewed_at)
        .bind(claim.paid_at)
        .bind(claim.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Lists claims matching the filter, newest first
    pub async fn list(&self, filter: &ClaimFilter) -> Result<Vec<ClaimRow>, DatabaseError> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM claims WHERE TRUE", CLAIM_COLUMNS));

        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status);
        }
        if let Some(policy_id) = filter.policy_id {
            query.push(" AND policy_id = ").push_bind(policy_id);
        }
        if let Some(holder_id) = filter.holder_id {
            query.push(" AND holder_id = ").push_bind(holder_id);
        }
        if let Some(hospital_id) = filter.hospital_id {
            query.push(" AND hospital_id = ").push_bind(hospital_id);
        }
        query
            .push(" ORDER BY submitted_at DESC, claim_id DESC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let rows = query.build_query_as::<ClaimRow>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Counts and sums claims per status and currency
    pub async fn status_totals(&self) -> Result<Vec<ClaimTotalsRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, ClaimTotalsRow>(
            r#"
            SELECT
                status,
                currency,
                COUNT(*) AS claim_count,
                COALESCE(SUM(claim_amount), 0) AS claimed,
                COALESCE(SUM(approved_amount), 0) AS approved
            FROM claims
            GROUP BY status, currency
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Reads the current status and locks the row until the transaction ends
    pub async fn lock_status(
        conn: &mut PgConnection,
        claim_id: Uuid,
    ) -> Result<Option<ClaimStatus>, DatabaseError> {
        let status = sqlx::query_scalar::<_, ClaimStatus>(
            "SELECT status FROM claims WHERE claim_id = $1 FOR UPDATE",
        )
        .bind(claim_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(status)
    }

    /// Writes every mutable column of a claim
    pub async fn update(conn: &mut PgConnection, claim: &ClaimRow) -> Result<ClaimRow, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE claims
            SET status = $2,
                approved_amount = $3,
                medical_notes = $4,
                notes_added_by = $5,
                rejection_reason = $6,
                reviewed_by = $7,
                reviewed_at = $8,
                paid_at = $9,
                updated_at = $10
            WHERE claim_id = $1
            RETURNING {}
            "#,
            CLAIM_COLUMNS
        );
        let row = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(claim.claim_id)
            .bind(claim.status)
            .bind(claim.approved_amount)
            .bind(&claim.medical_notes)
            .bind(claim.notes_added_by)
            .bind(&claim.rejection_reason)
            .bind(claim.reviewed_by)
            .bind(claim.reviewed_at)
            .bind(claim.paid_at)
            .bind(claim.updated_at)
            .fetch_one(&mut *conn)
            .await?;
        Ok(row)
    }
}

/// Claim status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "claim_status", rename_all = "snake_case")]
pub enum ClaimStatus {
    Submitted,
    InReview,
    Approved,
    Rejected,
    Paid,
}

/// Database row for a claim
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ClaimRow {
    pub claim_id: Uuid,
    pub claim_number: String,
    pub policy_id: Uuid,
    pub holder_id: Uuid,
    pub hospital_id: Uuid,
    pub status: ClaimStatus,
    pub claim_amount: Decimal,
    pub approved_amount: Option<Decimal>,
    pub currency: String,
    pub description: Option<String>,
    pub medical_notes: Option<String>,
    pub notes_added_by: Option<Uuid>,
    pub rejection_reason: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// One `GROUP BY status, currency` row
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ClaimTotalsRow {
    pub status: ClaimStatus,
    pub currency: String,
    pub claim_count: i64,
    pub claimed: Decimal,
    pub approved: Decimal,
}

/// Filters for listing claims
#[derive(Debug, Clone)]
pub struct ClaimFilter {
    pub status: Option<ClaimStatus>,
    pub policy_id: Option<Uuid>,
    pub holder_id: Option<Uuid>,
    pub hospital_id: Option<Uuid>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for ClaimFilter {
    fn default() -> Self {
        Self {
            status: None,
            policy_id: None,
            holder_id: None,
            hospital_id: None,
            limit: 100,
            offset: 0,
        }
    }
}
