//! In-app notification entity and recipient resolution

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, NotificationId, UserId};
use domain_claims::{Actor, ClaimEvent, Recipient};

/// A message in one user's inbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    /// Recipient
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub claim_id: Option<ClaimId>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates an unread notification
    pub fn new(
        user_id: UserId,
        title: impl Into<String>,
        message: impl Into<String>,
        claim_id: Option<ClaimId>,
    ) -> Self {
        Self {
            id: NotificationId::new_v7(),
            user_id,
            title: title.into(),
            message: message.into(),
            claim_id,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    /// Builds the notification a single user receives for `event`
    pub fn from_event(user_id: UserId, event: &ClaimEvent) -> Self {
        let mut notification = Self::new(
            user_id,
            event.title.clone(),
            event.message.clone(),
            Some(event.claim_id),
        );
        notification.created_at = event.occurred_at;
        notification
    }

    pub fn mark_read(&mut self) {
        self.is_read = true;
    }
}

/// Returns true if `actor` is addressed by `recipient`
pub fn addresses(recipient: &Recipient, actor: &Actor) -> bool {
    match recipient {
        Recipient::User(user_id) => *user_id == actor.user_id,
        Recipient::Role(role) => *role == actor.role,
        Recipient::HospitalStaff(hospital_id) => {
            actor.role == domain_claims::Role::HospitalStaff && actor.hospital_id == Some(*hospital_id)
        }
    }
}

/// Expands an event into one notification per addressed user
///
/// `users` is the directory of known accounts. A user matched by several
/// recipients still gets a single notification.
pub fn fan_out(event: &ClaimEvent, users: &[Actor]) -> Vec<Notification> {
    let mut delivered: Vec<UserId> = Vec::new();
    for user in users {
        if delivered.contains(&user.user_id) {
            continue;
        }
        if event.recipients.iter().any(|r| addresses(r, user)) {
            delivered.push(user.user_id);
        }
    }
    delivered
        .into_iter()
        .map(|user_id| Notification::from_event(user_id, event))
        .collect()
}
