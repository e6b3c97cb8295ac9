//! Insurance plans offered to policy holders

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Money, PlanId};
use crate::error::PolicyError;

/// A purchasable insurance plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsurancePlan {
    pub id: PlanId,
    pub name: String,
    pub description: Option<String>,
    /// Total coverage granted to each policy issued on this plan
    pub coverage_amount: Money,
    pub premium_amount: Money,
    pub duration_months: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl InsurancePlan {
    /// Creates a new active plan
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::Validation` when the name is blank, the coverage
    /// is not positive, the premium is negative or the duration is zero.
    pub fn new(
        name: impl Into<String>,
        coverage_amount: Money,
        premium_amount: Money,
        duration_months: u32,
    ) -> Result<Self, PolicyError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PolicyError::Validation("Plan name is required".to_string()));
        }
        if !coverage_amount.is_positive() {
            return Err(PolicyError::Validation("Coverage amount must be positive".to_string()));
        }
        if premium_amount.is_negative() {
            return Err(PolicyError::Validation("Premium must not be negative".to_string()));
        }
        if duration_months == 0 {
            return Err(PolicyError::Validation("Duration must be at least one month".to_string()));
        }

        Ok(Self {
            id: PlanId::new_v7(),
            name,
            description: None,
            coverage_amount,
            premium_amount,
            duration_months,
            is_active: true,
            created_at: Utc::now(),
        })
    }

    /// Stops the plan from being sold; existing policies are unaffected
    pub fn retire(&mut self) {
        self.is_active = false;
    }
}
