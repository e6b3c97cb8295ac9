//! Coverage snapshot shared with the claims domain

use serde::{Deserialize, Serialize};

use core_kernel::{Money, MoneyError, PolicyId, UserId};
use crate::aggregate::PolicyStatus;

/// Point-in-time view of a policy's coverage
///
/// This is what the claims lifecycle reads before approving a claim. It is a
/// copy; debits go through the claim store so they commit together with the
/// claim update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyCoverage {
    pub policy_id: PolicyId,
    pub holder_id: UserId,
    pub remaining: Money,
    pub status: PolicyStatus,
}

impl PolicyCoverage {
    /// Returns true if claims can be submitted or approved against the policy
    pub fn is_active(&self) -> bool {
        self.status == PolicyStatus::Active
    }

    /// Returns true if `amount` fits within the remaining coverage
    pub fn covers(&self, amount: &Money) -> Result<bool, MoneyError> {
        Ok(!amount.exceeds(&self.remaining)?)
    }
}
