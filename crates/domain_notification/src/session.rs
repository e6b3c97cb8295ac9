//! Per-session notification state
//!
//! Each authenticated session owns one [`NotificationSession`]. It remembers
//! the poll cursor, the notifications fetched so far and the unread count, and
//! is refreshed every [`POLL_INTERVAL`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use core_kernel::{NotificationId, UserId};

use crate::error::NotificationError;
use crate::notification::Notification;
use crate::ports::{sort_for_feed, NotificationFeed, DEFAULT_FEED_LIMIT};

/// How often clients pull new notifications
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Inbox state for one logged-in user
#[derive(Debug, Clone)]
pub struct NotificationSession {
    user_id: UserId,
    cursor: Option<DateTime<Utc>>,
    items: Vec<Notification>,
    unread: u64,
}

impl NotificationSession {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            cursor: None,
            items: Vec::new(),
            unread: 0,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Timestamp of the newest notification seen
    pub fn cursor(&self) -> Option<DateTime<Utc>> {
        self.cursor
    }

    /// Cached notifications, oldest first
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn unread_count(&self) -> u64 {
        self.unread
    }

    /// Pulls new notifications and the unread count
    ///
    /// Rows already cached are replaced rather than duplicated. Returns how
    /// many notifications were new to this session.
    #[instrument(skip(self, feed), fields(user_id = %self.user_id))]
    pub async fn refresh(&mut self, feed: &dyn NotificationFeed) -> Result<usize, NotificationError> {
        let fetched = feed
            .fetch_since(self.user_id, self.cursor, DEFAULT_FEED_LIMIT)
            .await?;

        let mut added = 0;
        for notification in fetched {
            if let Some(cursor) = self.cursor {
                if notification.created_at < cursor {
                    continue;
                }
            }
            match self.items.iter_mut().find(|n| n.id == notification.id) {
                Some(existing) => *existing = notification,
                None => {
                    self.items.push(notification);
                    added += 1;
                }
            }
        }
        sort_for_feed(&mut self.items);
        self.cursor = self.items.last().map(|n| n.created_at).or(self.cursor);
        self.unread = feed.unread_count(self.user_id).await?;

        debug!(added, unread = self.unread, "Notification session refreshed");
        Ok(added)
    }

    /// Marks one notification as read in the feed and in the cache
    pub async fn mark_read(
        &mut self,
        feed: &dyn NotificationFeed,
        id: NotificationId,
    ) -> Result<(), NotificationError> {
        let updated = feed.mark_read(self.user_id, id).await?;
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(cached) => {
                if !cached.is_read {
                    self.unread = self.unread.saturating_sub(1);
                }
                *cached = updated;
            }
            None => {
                self.unread = feed.unread_count(self.user_id).await?;
            }
        }
        Ok(())
    }

    /// Marks every cached unread notification as read, one call per item
    ///
    /// Stops at the first failure; items handled before it stay read.
    pub async fn mark_all_read(&mut self, feed: &dyn NotificationFeed) -> Result<usize, NotificationError> {
        let unread: Vec<NotificationId> = self
            .items
            .iter()
            .filter(|n| !n.is_read)
            .map(|n| n.id)
            .collect();

        for id in &unread {
            self.mark_read(feed, *id).await?;
        }
        Ok(unread.len())
    }
}
