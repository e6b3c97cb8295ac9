//! Notifications Domain
//!
//! In-app notifications produced from claim lifecycle events. The dispatcher
//! side fans an event out to user inboxes; the feed side is polled by clients,
//! each of which keeps a [`NotificationSession`].

pub mod notification;
pub mod ports;
pub mod session;
pub mod error;

pub use notification::{addresses, fan_out, Notification};
pub use ports::{NotificationFeed, DEFAULT_FEED_LIMIT};
pub use session::{NotificationSession, POLL_INTERVAL};
pub use error::NotificationError;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockNotificationFeed;
