//! Claim aggregate
//!
//! A claim only changes through the transition methods below; each one checks
//! the current status first and leaves the claim untouched when it fails.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ClaimId, HospitalId, Money, PolicyId, UserId};
use domain_policy::PolicyCoverage;

use crate::error::ClaimError;

/// Claim status
///
/// JSON, query strings and the database all use the snake_case form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Filed by the policy holder
    Submitted,
    /// Medical notes attached, awaiting a decision
    InReview,
    /// Approved for payment
    Approved,
    /// Rejected by a claims officer
    Rejected,
    /// Paid out
    Paid,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 5] = [
        ClaimStatus::Submitted,
        ClaimStatus::InReview,
        ClaimStatus::Approved,
        ClaimStatus::Rejected,
        ClaimStatus::Paid,
    ];

    /// Rejected and Paid claims never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimStatus::Rejected | ClaimStatus::Paid)
    }

    /// Statuses in which notes may be attached or a decision made
    pub fn is_open(&self) -> bool {
        matches!(self, ClaimStatus::Submitted | ClaimStatus::InReview)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Submitted => "submitted",
            ClaimStatus::InReview => "in_review",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
            ClaimStatus::Paid => "paid",
        }
    }

    /// Checks if transition is valid
    pub fn can_transition_to(&self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (*self, target),
            (Submitted, InReview)
                | (Submitted, Approved)
                | (Submitted, Rejected)
                | (InReview, Approved)
                | (InReview, Rejected)
                | (Approved, Paid)
        )
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClaimStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ClaimError::validation(format!("Unknown claim status: {}", s)))
    }
}

/// A claim against a policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    /// Human-facing claim number, unique
    pub claim_number: String,
    pub policy_id: PolicyId,
    /// Policy holder who owns the claim
    pub holder_id: UserId,
    /// Hospital where treatment took place
    pub hospital_id: HospitalId,
    pub status: ClaimStatus,
    pub claim_amount: Money,
    /// Present iff status is Approved or Paid
    pub approved_amount: Option<Money>,
    pub description: Option<String>,
    pub medical_notes: Option<String>,
    pub notes_added_by: Option<UserId>,
    /// Present iff status is Rejected
    pub rejection_reason: Option<String>,
    pub reviewed_by: Option<UserId>,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Claim {
    /// Creates a new claim in Submitted status
    pub fn submit(
        policy_id: PolicyId,
        holder_id: UserId,
        hospital_id: HospitalId,
        claim_amount: Money,
        description: Option<String>,
    ) -> Result<Self, ClaimError> {
        if !claim_amount.is_positive() {
            return Err(ClaimError::validation("Claim amount must be greater than zero"));
        }

        let now = Utc::now();
        let id = ClaimId::new_v7();

        Ok(Self {
            id,
            claim_number: generate_claim_number(now, &id),
            policy_id,
            holder_id,
            hospital_id,
            status: ClaimStatus::Submitted,
            claim_amount,
            approved_amount: None,
            description: description.filter(|d| !d.trim().is_empty()),
            medical_notes: None,
            notes_added_by: None,
            rejection_reason: None,
            reviewed_by: None,
            submitted_at: now,
            reviewed_at: None,
            paid_at: None,
            updated_at: now,
        })
    }

    /// Attaches medical notes, moving a Submitted claim into review
    pub fn add_medical_notes(&mut self, author: UserId, notes: &str) -> Result<(), ClaimError> {
        if !self.status.is_open() {
            return Err(self.invalid_state("add medical notes to"));
        }
        let notes = notes.trim();
        if notes.is_empty() {
            return Err(ClaimError::validation("Medical notes must not be empty"));
        }

        self.medical_notes = Some(notes.to_string());
        self.notes_added_by = Some(author);
        if self.status == ClaimStatus::Submitted {
            self.status = ClaimStatus::InReview;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Approves the claim for `amount`
    ///
    /// The amount must fit within both the claimed amount and the policy's
    /// remaining coverage as seen in `coverage`.
    pub fn approve(
        &mut self,
        reviewer: UserId,
        amount: Money,
        coverage: &PolicyCoverage,
    ) -> Result<(), ClaimError> {
        self.ensure_can_move_to(ClaimStatus::Approved, "approve")?;
        if amount.is_negative() {
            return Err(ClaimError::validation("Approved amount must not be negative"));
        }
        if amount.currency() != self.claim_amount.currency() {
            return Err(ClaimError::validation(format!(
                "Approved amount must be in the claim currency {}",
                self.claim_amount.currency()
            )));
        }
        if coverage.policy_id != self.policy_id {
            return Err(ClaimError::validation("Coverage belongs to a different policy"));
        }
        if !coverage.is_active() {
            return Err(ClaimError::PolicyInactive(coverage.policy_id.to_string()));
        }
        if amount.exceeds(&self.claim_amount)? {
            return Err(ClaimError::InsufficientCoverage {
                requested: amount.to_string(),
                available: self.claim_amount.to_string(),
            });
        }
        if !coverage.covers(&amount)? {
            return Err(ClaimError::InsufficientCoverage {
                requested: amount.to_string(),
                available: coverage.remaining.to_string(),
            });
        }

        let now = Utc::now();
        self.approved_amount = Some(amount);
        self.status = ClaimStatus::Approved;
        self.reviewed_by = Some(reviewer);
        self.reviewed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Rejects the claim with a non-empty reason
    pub fn reject(&mut self, reviewer: UserId, reason: &str) -> Result<(), ClaimError> {
        self.ensure_can_move_to(ClaimStatus::Rejected, "reject")?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ClaimError::validation("Rejection reason is required"));
        }

        let now = Utc::now();
        self.rejection_reason = Some(reason.to_string());
        self.status = ClaimStatus::Rejected;
        self.reviewed_by = Some(reviewer);
        self.reviewed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Marks an approved claim as paid
    pub fn mark_paid(&mut self) -> Result<(), ClaimError> {
        self.ensure_can_move_to(ClaimStatus::Paid, "pay")?;

        let now = Utc::now();
        self.status = ClaimStatus::Paid;
        self.paid_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Returns true if the field/status invariants hold
    pub fn is_consistent(&self) -> bool {
        let approved_ok = self.approved_amount.is_some()
            == matches!(self.status, ClaimStatus::Approved | ClaimStatus::Paid);
        let rejected_ok = match (&self.rejection_reason, self.status) {
            (Some(reason), ClaimStatus::Rejected) => !reason.trim().is_empty(),
            (None, status) => status != ClaimStatus::Rejected,
            (Some(_), _) => false,
        };
        approved_ok && rejected_ok
    }

    fn ensure_can_move_to(&self, target: ClaimStatus, action: &'static str) -> Result<(), ClaimError> {
        if self.status.can_transition_to(target) {
            Ok(())
        } else {
            Err(self.invalid_state(action))
        }
    }

    fn invalid_state(&self, action: &'static str) -> ClaimError {
        ClaimError::InvalidState {
            action,
            status: self.status,
        }
    }
}

/// Claim numbers look like `CLM-20260119-1A2B3C4D`
fn generate_claim_number(now: DateTime<Utc>, id: &ClaimId) -> String {
    let simple = id.as_uuid().simple().to_string();
    format!(
        "CLM-{}-{}",
        now.format("%Y%m%d"),
        simple[simple.len() - 8..].to_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses_have_no_exits() {
        for from in [ClaimStatus::Rejected, ClaimStatus::Paid] {
            for to in ClaimStatus::ALL {
                assert!(!from.can_transition_to(to), "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("in_review".parse::<ClaimStatus>().unwrap(), ClaimStatus::InReview);
        assert_eq!("PAID".parse::<ClaimStatus>().unwrap(), ClaimStatus::Paid);
        assert!("InReview".parse::<ClaimStatus>().is_err());
        assert!("Closed".parse::<ClaimStatus>().is_err());
    }

    #[test]
    fn test_status_json_matches_query_form() {
        for status in ClaimStatus::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, status.as_str());
            assert_eq!(json.as_str().unwrap().parse::<ClaimStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_claim_number_format() {
        let id = ClaimId::new_v7();
        let number = generate_claim_number(Utc::now(), &id);
        assert!(number.starts_with("CLM-"));
        assert_eq!(number.len(), "CLM-YYYYMMDD-XXXXXXXX".len());
    }
}
