//! Lifecycle events handed to the notification dispatcher

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, HospitalId, UserId};

use crate::capability::Role;
use crate::claim::{Claim, ClaimStatus};

/// Kind of lifecycle transition that produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimEventKind {
    ClaimSubmitted,
    MedicalNotesAdded,
    ClaimApproved,
    ClaimRejected,
    ClaimPaid,
}

/// Who should hear about an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Recipient {
    /// A single user
    User(UserId),
    /// Every user holding a role
    Role(Role),
    /// Staff of one hospital
    HospitalStaff(HospitalId),
}

/// Event emitted after a transition has been committed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimEvent {
    pub kind: ClaimEventKind,
    pub claim_id: ClaimId,
    pub claim_number: String,
    pub status: ClaimStatus,
    pub recipients: Vec<Recipient>,
    pub title: String,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

impl ClaimEvent {
    /// Builds the event for a committed claim
    pub fn for_claim(kind: ClaimEventKind, claim: &Claim) -> Self {
        let holder = Recipient::User(claim.holder_id);
        let hospital = Recipient::HospitalStaff(claim.hospital_id);
        let officers = Recipient::Role(Role::ClaimsOfficer);

        let (recipients, title, message) = match kind {
            ClaimEventKind::ClaimSubmitted => (
                vec![officers, hospital],
                "Claim submitted",
                format!("Claim {} was submitted for {}", claim.claim_number, claim.claim_amount),
            ),
            ClaimEventKind::MedicalNotesAdded => (
                vec![holder, officers],
                "Medical notes added",
                format!("Medical notes were added to claim {}", claim.claim_number),
            ),
            ClaimEventKind::ClaimApproved => (
                vec![holder, hospital],
                "Claim approved",
                match claim.approved_amount {
                    Some(amount) => format!("Claim {} was approved for {}", claim.claim_number, amount),
                    None => format!("Claim {} was approved", claim.claim_number),
                },
            ),
            ClaimEventKind::ClaimRejected => (
                vec![holder, hospital],
                "Claim rejected",
                format!(
                    "Claim {} was rejected: {}",
                    claim.claim_number,
                    claim.rejection_reason.as_deref().unwrap_or_default()
                ),
            ),
            ClaimEventKind::ClaimPaid => (
                vec![holder],
                "Claim paid",
                format!("Claim {} has been paid", claim.claim_number),
            ),
        };

        Self {
            kind,
            claim_id: claim.id,
            claim_number: claim.claim_number.clone(),
            status: claim.status,
            recipients,
            title: title.to_string(),
            message,
            occurred_at: Utc::now(),
        }
    }
}
