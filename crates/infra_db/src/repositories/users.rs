//! User and hospital directory
//!
//! Read mostly; the claims platform does not manage accounts. The insert
//! methods exist for seeding and tests.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for users and hospitals
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a user by its identifier
    pub async fn get_by_id(&self, user_id: Uuid) -> Result<Option<UserRow>, DatabaseError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, email, full_name, role, hospital_id, is_active, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Active users addressed by any of the given user IDs, roles or hospitals
    ///
    /// Hospital matches only apply to hospital staff.
    pub async fn find_recipients(
        conn: &mut PgConnection,
        user_ids: &[Uuid],
        roles: &[UserRole],
        hospital_ids: &[Uuid],
    ) -> Result<Vec<UserRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, email, full_name, role, hospital_id, is_active, created_at
            FROM users
            WHERE is_active
              AND (
                    user_id = ANY($1)
                 OR role = ANY($2)
                 OR (role = 'hospital_staff' AND hospital_id = ANY($3))
              )
            "#,
        )
        .bind(user_ids)
        .bind(roles)
        .bind(hospital_ids)
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows)
    }

    /// Inserts a user
    pub async fn insert(&self, user: &UserRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, email, full_name, role, hospital_id, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.user_id)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(user.role)
        .bind(user.hospital_id)
        .bind(user.is_active)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Inserts a hospital
    pub async fn insert_hospital(&self, hospital_id: Uuid, name: &str) -> Result<(), DatabaseError> {
        sqlx::query("INSERT INTO hospitals (hospital_id, name) VALUES ($1, $2)")
            .bind(hospital_id)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Role of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRole {
    PolicyHolder,
    HospitalStaff,
    ClaimsOfficer,
    InsuranceAgent,
    Admin,
}

/// Database row for a user
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub hospital_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
