//! Policy DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::Currency;
use domain_policy::{PolicyCoverage, PolicyStatus};

#[derive(Debug, Serialize, Deserialize)]
pub struct CoverageResponse {
    pub policy_id: Uuid,
    pub holder_id: Uuid,
    pub status: PolicyStatus,
    pub remaining_coverage: Decimal,
    pub currency: Currency,
    pub is_active: bool,
}

impl From<PolicyCoverage> for CoverageResponse {
    fn from(coverage: PolicyCoverage) -> Self {
        Self {
            policy_id: coverage.policy_id.into(),
            holder_id: coverage.holder_id.into(),
            status: coverage.status,
            remaining_coverage: coverage.remaining.amount(),
            currency: coverage.remaining.currency(),
            is_active: coverage.is_active(),
        }
    }
}
