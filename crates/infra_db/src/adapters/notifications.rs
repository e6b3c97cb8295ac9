//! PostgreSQL Notification Adapter
//!
//! Both sides of the inbox: `NotificationDispatcher` resolves an event's
//! recipients against the `users` table and writes one row per user;
//! `NotificationFeed` serves those rows back to polling clients.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, NotificationId, PortError, UserId};
use domain_claims::{ClaimEvent, NotificationDispatcher, Recipient};
use domain_notification::{fan_out, Notification, NotificationFeed};

use crate::adapters::claims::ping;
use crate::adapters::mapping::{notification_to_row, role_to_db, row_to_notification, user_to_actor};
use crate::error::DatabaseError;
use crate::repositories::notifications::NotificationRepository;
use crate::repositories::users::UserRepository;

/// PostgreSQL-backed notification dispatcher and feed
#[derive(Debug, Clone)]
pub struct PostgresNotificationAdapter {
    repository: NotificationRepository,
    pool: PgPool,
}

impl PostgresNotificationAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: NotificationRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresNotificationAdapter {}

#[async_trait]
impl HealthCheckable for PostgresNotificationAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, "postgres-notification-adapter").await
    }
}

#[async_trait]
impl NotificationDispatcher for PostgresNotificationAdapter {
    #[instrument(skip(self, event), fields(claim_id = %event.claim_id, kind = ?event.kind))]
    async fn dispatch(&self, event: &ClaimEvent) -> Result<(), PortError> {
        let mut user_ids: Vec<Uuid> = Vec::new();
        let mut roles = Vec::new();
        let mut hospital_ids: Vec<Uuid> = Vec::new();
        for recipient in &event.recipients {
            match recipient {
                Recipient::User(user_id) => user_ids.push((*user_id).into()),
                Recipient::Role(role) => roles.push(role_to_db(*role)),
                Recipient::HospitalStaff(hospital_id) => hospital_ids.push((*hospital_id).into()),
            }
        }

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        let users = UserRepository::find_recipients(&mut tx, &user_ids, &roles, &hospital_ids).await?;
        let actors: Vec<_> = users.iter().map(user_to_actor).collect();

        let rows: Vec<_> = fan_out(event, &actors).iter().map(notification_to_row).collect();
        let inserted = NotificationRepository::insert_many(&mut tx, &rows).await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        debug!(inserted, "Notifications stored");
        Ok(())
    }
}

#[async_trait]
impl NotificationFeed for PostgresNotificationAdapter {
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn fetch_since(
        &self,
        user_id: UserId,
        since: Option<DateTime<Utc>>,
        limit: u32,
    ) -> Result<Vec<Notification>, PortError> {
        let limit = i64::from(limit);
        let rows = match since {
            Some(since) => self.repository.fetch_since(user_id.into(), since, limit).await?,
            None => self.repository.fetch_latest(user_id.into(), limit).await?,
        };
        Ok(rows.into_iter().map(row_to_notification).collect())
    }

    #[instrument(skip(self), fields(user_id = %user_id, notification_id = %id))]
    async fn mark_read(&self, user_id: UserId, id: NotificationId) -> Result<Notification, PortError> {
        self.repository
            .mark_read(user_id.into(), id.into())
            .await?
            .map(row_to_notification)
            .ok_or_else(|| PortError::not_found("Notification", id))
    }

    async fn unread_count(&self, user_id: UserId) -> Result<u64, PortError> {
        let count = self.repository.unread_count(user_id.into()).await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}
