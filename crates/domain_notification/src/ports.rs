//! Notification Ports
//!
//! `NotificationFeed` is the read side of a user's inbox. Clients poll it with
//! the timestamp of the newest notification they hold; the feed answers the
//! same rows for the same cursor, so a repeated poll is harmless.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{DomainPort, NotificationId, PortError, UserId};

use crate::notification::Notification;

/// Default page size for a single poll
pub const DEFAULT_FEED_LIMIT: u32 = 50;

/// Read and acknowledge access to user inboxes
#[async_trait]
pub trait NotificationFeed: DomainPort {
    /// Notifications for `user_id` created at or after `since`, oldest first
    ///
    /// `None` returns the newest `limit` notifications.
    async fn fetch_since(
        &self,
        user_id: UserId,
        since: Option<DateTime<Utc>>,
        limit: u32,
    ) -> Result<Vec<Notification>, PortError>;

    /// Marks one of the user's notifications as read
    ///
    /// A notification belonging to another user is reported as not found.
    async fn mark_read(&self, user_id: UserId, id: NotificationId) -> Result<Notification, PortError>;

    /// Number of unread notifications for the user
    async fn unread_count(&self, user_id: UserId) -> Result<u64, PortError>;
}

/// Orders a poll result: oldest first, then by ID
pub fn sort_for_feed(items: &mut [Notification]) {
    items.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
    });
}

/// In-memory implementations for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::{HealthCheckResult, HealthCheckable};
    use domain_claims::{Actor, ClaimEvent, NotificationDispatcher};

    use crate::notification::fan_out;

    #[derive(Debug, Default)]
    struct Inbox {
        users: Vec<Actor>,
        notifications: Vec<Notification>,
    }

    /// In-memory inbox usable as both dispatcher and feed
    ///
    /// Role and hospital recipients are resolved against the users added with
    /// [`MockNotificationFeed::register`].
    #[derive(Debug, Default, Clone)]
    pub struct MockNotificationFeed {
        inbox: Arc<RwLock<Inbox>>,
    }

    impl MockNotificationFeed {
        pub fn new() -> Self {
            Self::default()
        }

        /// Adds a user to the recipient directory
        pub async fn register(&self, actor: Actor) {
            self.inbox.write().await.users.push(actor);
        }

        /// Stores a notification directly
        pub async fn push(&self, notification: Notification) {
            self.inbox.write().await.notifications.push(notification);
        }

        /// Every stored notification for one user
        pub async fn all_for(&self, user_id: UserId) -> Vec<Notification> {
            self.inbox
                .read()
                .await
                .notifications
                .iter()
                .filter(|n| n.user_id == user_id)
                .cloned()
                .collect()
        }
    }

    impl DomainPort for MockNotificationFeed {}

    #[async_trait]
    impl HealthCheckable for MockNotificationFeed {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("mock-notification-feed")
        }
    }

    #[async_trait]
    impl NotificationDispatcher for MockNotificationFeed {
        async fn dispatch(&self, event: &ClaimEvent) -> Result<(), PortError> {
            let mut inbox = self.inbox.write().await;
            let delivered = fan_out(event, &inbox.users);
            inbox.notifications.extend(delivered);
            Ok(())
        }
    }

    #[async_trait]
    impl NotificationFeed for MockNotificationFeed {
        async fn fetch_since(
            &self,
            user_id: UserId,
            since: Option<DateTime<Utc>>,
            limit: u32,
        ) -> Result<Vec<Notification>, PortError> {
            let inbox = self.inbox.read().await;
            let mut items: Vec<Notification> = inbox
                .notifications
                .iter()
                .filter(|n| n.user_id == user_id)
                .filter(|n| since.map_or(true, |s| n.created_at >= s))
                .cloned()
                .collect();
            sort_for_feed(&mut items);

            let limit = limit as usize;
            let items = match since {
                Some(_) => items.into_iter().take(limit).collect(),
                None => {
                    let skip = items.len().saturating_sub(limit);
                    items.into_iter().skip(skip).collect()
                }
            };
            Ok(items)
        }

        async fn mark_read(&self, user_id: UserId, id: NotificationId) -> Result<Notification, PortError> {
            let mut inbox = self.inbox.write().await;
            let notification = inbox
                .notifications
                .iter_mut()
                .find(|n| n.id == id && n.user_id == user_id)
                .ok_or_else(|| PortError::not_found("Notification", id))?;
            notification.mark_read();
            Ok(notification.clone())
        }

        async fn unread_count(&self, user_id: UserId) -> Result<u64, PortError> {
            let inbox = self.inbox.read().await;
            Ok(inbox
                .notifications
                .iter()
                .filter(|n| n.user_id == user_id && !n.is_read)
                .count() as u64)
        }
    }
}
