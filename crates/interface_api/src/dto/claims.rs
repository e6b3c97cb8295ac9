//! Claims DTOs

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{Currency, HospitalId, Money, PolicyId};
use domain_claims::{Claim, ClaimQuery, ClaimStatus, NewClaimRequest, ReviewDecision};

use super::{default_currency, non_negative};
use crate::error::ApiError;

const DEFAULT_PAGE_SIZE: u32 = 100;
const MAX_PAGE_SIZE: u32 = 500;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SubmitClaimRequest {
    pub policy_id: Uuid,
    pub hospital_id: Uuid,
    #[validate(custom(function = "non_negative"))]
    pub claim_amount: Decimal,
    #[serde(default = "default_currency")]
    #[validate(length(equal = 3))]
    pub currency: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

impl SubmitClaimRequest {
    pub fn into_domain(self) -> Result<NewClaimRequest, ApiError> {
        Ok(NewClaimRequest {
            policy_id: PolicyId::from_uuid(self.policy_id),
            hospital_id: HospitalId::from_uuid(self.hospital_id),
            claim_amount: Money::new(self.claim_amount, parse_currency(&self.currency)?),
            description: self.description,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct MedicalNotesRequest {
    #[validate(length(min = 1, max = 10000))]
    pub notes: String,
    /// Status the caller last saw; a mismatch is a conflict
    pub expected_status: Option<ClaimStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Approve,
    Reject,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ReviewClaimRequest {
    pub decision: ReviewAction,
    #[validate(custom(function = "non_negative"))]
    pub approved_amount: Option<Decimal>,
    #[serde(default = "default_currency")]
    #[validate(length(equal = 3))]
    pub currency: String,
    #[validate(length(max = 2000))]
    pub rejection_reason: Option<String>,
    pub expected_status: Option<ClaimStatus>,
}

impl ReviewClaimRequest {
    /// An approval needs an amount; a rejection needs a reason
    pub fn to_decision(&self) -> Result<ReviewDecision, ApiError> {
        match self.decision {
            ReviewAction::Approve => {
                let amount = self.approved_amount.ok_or_else(|| {
                    ApiError::Validation("approved_amount is required to approve".to_string())
                })?;
                Ok(ReviewDecision::approve(amount, parse_currency(&self.currency)?))
            }
            ReviewAction::Reject => {
                let reason = self.rejection_reason.clone().ok_or_else(|| {
                    ApiError::Validation("rejection_reason is required to reject".to_string())
                })?;
                Ok(ReviewDecision::reject(reason))
            }
        }
    }
}

/// Optional guard for `POST /claims/:id/pay`, read from the query string
///
/// The endpoint takes no body.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PayClaimParams {
    pub expected_status: Option<ClaimStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListClaimsParams {
    pub status: Option<String>,
    pub policy_id: Option<Uuid>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ListClaimsParams {
    pub fn to_query(&self) -> Result<ClaimQuery, ApiError> {
        let status = self
            .status
            .as_deref()
            .map(ClaimStatus::from_str)
            .transpose()?;
        let query = ClaimQuery {
            status,
            policy_id: self.policy_id.map(PolicyId::from_uuid),
            ..Default::default()
        };
        Ok(query.paginate(
            self.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE),
            self.offset.unwrap_or(0),
        ))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimResponse {
    pub id: Uuid,
    pub claim_number: String,
    pub policy_id: Uuid,
    pub holder_id: Uuid,
    pub hospital_id: Uuid,
    pub status: ClaimStatus,
    pub claim_amount: Decimal,
    pub currency: Currency,
    pub approved_amount: Option<Decimal>,
    pub description: Option<String>,
    pub medical_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<Claim> for ClaimResponse {
    fn from(claim: Claim) -> Self {
        Self {
            id: claim.id.into(),
            claim_number: claim.claim_number,
            policy_id: claim.policy_id.into(),
            holder_id: claim.holder_id.into(),
            hospital_id: claim.hospital_id.into(),
            status: claim.status,
            claim_amount: claim.claim_amount.amount(),
            currency: claim.claim_amount.currency(),
            approved_amount: claim.approved_amount.map(|m| m.amount()),
            description: claim.description,
            medical_notes: claim.medical_notes,
            rejection_reason: claim.rejection_reason,
            reviewed_by: claim.reviewed_by.map(Into::into),
            submitted_at: claim.submitted_at,
            reviewed_at: claim.reviewed_at,
            paid_at: claim.paid_at,
            updated_at: claim.updated_at,
        }
    }
}

fn parse_currency(code: &str) -> Result<Currency, ApiError> {
    Currency::from_str(code).map_err(|e| ApiError::Validation(e.to_string()))
}
