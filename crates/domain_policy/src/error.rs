//! Policy domain errors

use thiserror::Error;

use core_kernel::MoneyError;

/// Errors that can occur in the policy domain
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Invalid state transition attempted
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        from: String,
        to: String,
    },

    /// Policy is not active
    #[error("Policy {0} is not active")]
    NotActive(String),

    /// Plan cannot be used for new policies
    #[error("Plan {0} is not available")]
    PlanUnavailable(String),

    /// Debit larger than the remaining coverage
    #[error("Requested {requested} exceeds remaining coverage {remaining}")]
    CoverageExceeded {
        requested: String,
        remaining: String,
    },

    /// Invalid plan or policy data
    #[error("Validation error: {0}")]
    Validation(String),

    /// Financial calculation error
    #[error("Financial error: {0}")]
    Financial(#[from] MoneyError),
}
