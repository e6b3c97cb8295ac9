//! Policy aggregate
//!
//! # Invariants
//!
//! - `remaining_coverage` is never negative and never exceeds `coverage_amount`
//! - Coverage can only be debited while the policy is Active

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use core_kernel::{Money, PlanId, PolicyId, UserId};

use crate::coverage::PolicyCoverage;
use crate::error::PolicyError;
use crate::plan::InsurancePlan;

/// Policy status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyStatus {
    Active,
    Expired,
    Suspended,
    Cancelled,
}

impl PolicyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStatus::Active => "Active",
            PolicyStatus::Expired => "Expired",
            PolicyStatus::Suspended => "Suspended",
            PolicyStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyStatus {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(PolicyStatus::Active),
            "Expired" => Ok(PolicyStatus::Expired),
            "Suspended" => Ok(PolicyStatus::Suspended),
            "Cancelled" => Ok(PolicyStatus::Cancelled),
            other => Err(PolicyError::Validation(format!("Unknown policy status: {}", other))),
        }
    }
}

/// An insurance policy held by a policy holder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: PolicyId,
    pub policy_number: String,
    pub holder_id: UserId,
    pub plan_id: PlanId,
    pub coverage_amount: Money,
    pub remaining_coverage: Money,
    pub status: PolicyStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Policy {
    /// Issues a new policy on a plan
    ///
    /// The policy starts Active with its full plan coverage remaining and runs
    /// for the plan's duration from `start_date`.
    pub fn issue(
        plan: &InsurancePlan,
        holder_id: UserId,
        start_date: NaiveDate,
    ) -> Result<Self, PolicyError> {
        if !plan.is_active {
            return Err(PolicyError::PlanUnavailable(plan.id.to_string()));
        }

        let end_date = start_date
            .checked_add_months(Months::new(plan.duration_months))
            .ok_or_else(|| PolicyError::Validation("Policy end date out of range".to_string()))?;
        let now = Utc::now();
        let id = PolicyId::new_v7();

        Ok(Self {
            id,
            policy_number: generate_policy_number(start_date, &id),
            holder_id,
            plan_id: plan.id,
            coverage_amount: plan.coverage_amount,
            remaining_coverage: plan.coverage_amount,
            status: PolicyStatus::Active,
            start_date,
            end_date,
            created_at: now,
            updated_at: now,
        })
    }

    /// Snapshot consumed by claim eligibility checks
    pub fn coverage(&self) -> PolicyCoverage {
        PolicyCoverage {
            policy_id: self.id,
            holder_id: self.holder_id,
            remaining: self.remaining_coverage,
            status: self.status,
        }
    }

    /// Reduces the remaining coverage by an approved claim amount
    pub fn debit_coverage(&mut self, amount: Money) -> Result<(), PolicyError> {
        if self.status != PolicyStatus::Active {
            return Err(PolicyError::NotActive(self.id.to_string()));
        }
        if amount.is_negative() {
            return Err(PolicyError::Validation("Debit must not be negative".to_string()));
        }
        if amount.exceeds(&self.remaining_coverage)? {
            return Err(PolicyError::CoverageExceeded {
                requested: amount.to_string(),
                remaining: self.remaining_coverage.to_string(),
            });
        }

        self.remaining_coverage = self.remaining_coverage.checked_sub(&amount)?;
        self.updated_at = Utc::now();
        debug!(policy_id = %self.id, remaining = %self.remaining_coverage, "Coverage debited");
        Ok(())
    }

    /// Suspends an active policy
    pub fn suspend(&mut self) -> Result<(), PolicyError> {
        self.transition(PolicyStatus::Suspended)
    }

    /// Returns a suspended policy to Active
    pub fn reactivate(&mut self) -> Result<(), PolicyError> {
        self.transition(PolicyStatus::Active)
    }

    /// Cancels the policy
    pub fn cancel(&mut self) -> Result<(), PolicyError> {
        self.transition(PolicyStatus::Cancelled)
    }

    /// Marks the policy expired once its term has ended
    pub fn expire(&mut self, today: NaiveDate) -> Result<(), PolicyError> {
        if today <= self.end_date {
            return Err(PolicyError::Validation(format!(
                "Policy runs until {}",
                self.end_date
            )));
        }
        self.transition(PolicyStatus::Expired)
    }

    fn transition(&mut self, target: PolicyStatus) -> Result<(), PolicyError> {
        use PolicyStatus::*;
        let allowed = matches!(
            (self.status, target),
            (Active, Suspended)
                | (Suspended, Active)
                | (Active, Cancelled)
                | (Suspended, Cancelled)
                | (Active, Expired)
                | (Suspended, Expired)
        );
        if !allowed {
            return Err(PolicyError::InvalidStateTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }
        self.status = target;
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn generate_policy_number(start_date: NaiveDate, id: &PolicyId) -> String {
    let suffix = id.as_uuid().simple().to_string();
    format!(
        "POL-{}-{}",
        start_date.format("%Y"),
        suffix[suffix.len() - 8..].to_uppercase()
    )
}
