//! Review decisions made by claims officers

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, Money};
use crate::error::ClaimError;

/// Outcome of a claim review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ReviewDecision {
    /// Approve for the given amount
    Approve { amount: Money },
    /// Reject with a reason shown to the policy holder
    Reject { reason: String },
}

impl ReviewDecision {
    pub fn approve(amount: Decimal, currency: Currency) -> Self {
        ReviewDecision::Approve {
            amount: Money::new(amount, currency),
        }
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        ReviewDecision::Reject {
            reason: reason.into(),
        }
    }

    /// Input checks that do not need the claim
    pub fn validate(&self) -> Result<(), ClaimError> {
        match self {
            ReviewDecision::Approve { amount } if amount.is_negative() => {
                Err(ClaimError::validation("Approved amount must not be negative"))
            }
            ReviewDecision::Reject { reason } if reason.trim().is_empty() => {
                Err(ClaimError::validation("Rejection reason is required"))
            }
            _ => Ok(()),
        }
    }
}
