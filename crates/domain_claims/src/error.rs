//! Claims domain errors

use thiserror::Error;

use core_kernel::{MoneyError, PortError};
use crate::claim::ClaimStatus;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Cannot {action} a claim in {status} status")]
    InvalidState {
        action: &'static str,
        status: ClaimStatus,
    },

    #[error("Insufficient coverage: requested {requested}, available {available}")]
    InsufficientCoverage {
        requested: String,
        available: String,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Policy {0} is not active")]
    PolicyInactive(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[source] PortError),
}

impl ClaimError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClaimError::Validation(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ClaimError::Forbidden(message.into())
    }
}

impl From<PortError> for ClaimError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } => {
                ClaimError::NotFound(format!("{} {}", entity_type, id))
            }
            PortError::Conflict { message } => ClaimError::Conflict(message),
            PortError::Validation { message } => ClaimError::Validation(message),
            other => ClaimError::Storage(other),
        }
    }
}

impl From<MoneyError> for ClaimError {
    fn from(err: MoneyError) -> Self {
        ClaimError::Validation(err.to_string())
    }
}
