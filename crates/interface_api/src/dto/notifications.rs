//! Notification DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_notification::{Notification, DEFAULT_FEED_LIMIT};

const MAX_FEED_LIMIT: u32 = 200;

#[derive(Debug, Default, Deserialize)]
pub struct FeedParams {
    /// Cursor returned by the previous poll
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
}

impl FeedParams {
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_FEED_LIMIT).clamp(1, MAX_FEED_LIMIT)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub claim_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id.into(),
            title: notification.title,
            message: notification.message,
            claim_id: notification.claim_id.map(Into::into),
            is_read: notification.is_read,
            created_at: notification.created_at,
        }
    }
}

/// One page of the notification feed
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedResponse {
    pub items: Vec<NotificationResponse>,
    /// Pass back as `since` on the next poll
    pub next_cursor: Option<DateTime<Utc>>,
    pub poll_interval_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    pub unread: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_limit_is_clamped() {
        assert_eq!(FeedParams::default().limit(), DEFAULT_FEED_LIMIT);
        let params = FeedParams {
            since: None,
            limit: Some(0),
        };
        assert_eq!(params.limit(), 1);
        let params = FeedParams {
            since: None,
            limit: Some(5000),
        };
        assert_eq!(params.limit(), MAX_FEED_LIMIT);
    }
}
