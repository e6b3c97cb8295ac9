//! Notifications repository implementation

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for user notifications
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a batch of notifications
    pub async fn insert_many(
        conn: &mut PgConnection,
        rows: &[NotificationRow],
    ) -> Result<u64, DatabaseError> {
        let mut inserted = 0;
        for row in rows {
            inserted += sqlx::query(
                r#"
                INSERT INTO notifications (
                    notification_id, user_id, title, message, claim_id, is_read, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(row.notification_id)
            .bind(row.user_id)
            .bind(&row.title)
            .bind(&row.message)
            .bind(row.claim_id)
            .bind(row.is_read)
            .bind(row.created_at)
            .execute(&mut *conn)
            .await?
            .rows_affected();
        }
        Ok(inserted)
    }

    /// Notifications created at or after `since`, oldest first
    pub async fn fetch_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<NotificationRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT notification_id, user_id, title, message, claim_id, is_read, created_at
            FROM notifications
            WHERE user_id = $1 AND created_at >= $2
            ORDER BY created_at ASC, notification_id ASC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// The newest `limit` notifications, returned oldest first
    pub async fn fetch_latest(&self, user_id: Uuid, limit: i64) -> Result<Vec<NotificationRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT * FROM (
                SELECT notification_id, user_id, title, message, claim_id, is_read, created_at
                FROM notifications
                WHERE user_id = $1
                ORDER BY created_at DESC, notification_id DESC
                LIMIT $2
            ) latest
            ORDER BY created_at ASC, notification_id ASC
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Marks a notification read if it belongs to `user_id`
    pub async fn mark_read(
        &self,
        user_id: Uuid,
        notification_id: Uuid,
    ) -> Result<Option<NotificationRow>, DatabaseError> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE notification_id = $1 AND user_id = $2
            RETURNING notification_id, user_id, title, message, claim_id, is_read, created_at
            "#,
        )
        .bind(notification_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Counts unread notifications for a user
    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT is_read",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

/// Database row for a notification
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct NotificationRow {
    pub notification_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub claim_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
