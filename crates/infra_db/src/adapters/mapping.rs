//! Row <-> domain conversions shared by the adapters

use core_kernel::{
    ClaimId, Currency, HospitalId, Money, NotificationId, PlanId, PolicyId, PortError, UserId,
};
use domain_claims::{Actor, Claim, ClaimStatus, Role, StatusTotals};
use domain_notification::Notification;
use domain_policy::{InsurancePlan, Policy, PolicyStatus};

use crate::repositories::claims::{ClaimRow, ClaimStatus as DbClaimStatus, ClaimTotalsRow};
use crate::repositories::notifications::NotificationRow;
use crate::repositories::policy::{PlanRow, PolicyRow, PolicyStatus as DbPolicyStatus};
use crate::repositories::users::{UserRole, UserRow};

pub(crate) fn parse_currency(code: &str) -> Result<Currency, PortError> {
    code.parse::<Currency>()
        .map_err(|e| PortError::internal(format!("Stored currency is invalid: {}", e)))
}

pub fn claim_status_to_db(status: ClaimStatus) -> DbClaimStatus {
    match status {
        ClaimStatus::Submitted => DbClaimStatus::Submitted,
        ClaimStatus::InReview => DbClaimStatus::InReview,
        ClaimStatus::Approved => DbClaimStatus::Approved,
        ClaimStatus::Rejected => DbClaimStatus::Rejected,
        ClaimStatus::Paid => DbClaimStatus::Paid,
    }
}

pub fn claim_status_from_db(status: DbClaimStatus) -> ClaimStatus {
    match status {
        DbClaimStatus::Submitted => ClaimStatus::Submitted,
        DbClaimStatus::InReview => ClaimStatus::InReview,
        DbClaimStatus::Approved => ClaimStatus::Approved,
        DbClaimStatus::Rejected => ClaimStatus::Rejected,
        DbClaimStatus::Paid => ClaimStatus::Paid,
    }
}

pub fn row_to_status_totals(row: ClaimTotalsRow) -> Result<StatusTotals, PortError> {
    Ok(StatusTotals {
        status: claim_status_from_db(row.status),
        currency: parse_currency(&row.currency)?,
        count: u64::try_from(row.claim_count)
            .map_err(|_| PortError::internal(format!("Negative claim count {}", row.claim_count)))?,
        claimed: row.claimed,
        approved: row.approved,
    })
}

pub fn claim_to_row(claim: &Claim) -> ClaimRow {
    ClaimRow {
        claim_id: claim.id.into(),
        claim_number: claim.claim_number.clone(),
        policy_id: claim.policy_id.into(),
        holder_id: claim.holder_id.into(),
        hospital_id: claim.hospital_id.into(),
        status: claim_status_to_db(claim.status),
        claim_amount: claim.claim_amount.amount(),
        approved_amount: claim.approved_amount.map(|m| m.amount()),
        currency: claim.claim_amount.currency().code().to_string(),
        description: claim.description.clone(),
        medical_notes: claim.medical_notes.clone(),
        notes_added_by: claim.notes_added_by.map(Into::into),
        rejection_reason: claim.rejection_reason.clone(),
        reviewed_by: claim.reviewed_by.map(Into::into),
        submitted_at: claim.submitted_at,
        reviewed_at: claim.reviewed_at,
        paid_at: claim.paid_at,
        updated_at: claim.updated_at,
    }
}

pub fn row_to_claim(row: ClaimRow) -> Result<Claim, PortError> {
    let currency = parse_currency(&row.currency)?;
    Ok(Claim {
        id: ClaimId::from_uuid(row.claim_id),
        claim_number: row.claim_number,
        policy_id: PolicyId::from_uuid(row.policy_id),
        holder_id: UserId::from_uuid(row.holder_id),
        hospital_id: HospitalId::from_uuid(row.hospital_id),
        status: claim_status_from_db(row.status),
        claim_amount: Money::new(row.claim_amount, currency),
        approved_amount: row.approved_amount.map(|a| Money::new(a, currency)),
        description: row.description,
        medical_notes: row.medical_notes,
        notes_added_by: row.notes_added_by.map(UserId::from_uuid),
        rejection_reason: row.rejection_reason,
        reviewed_by: row.reviewed_by.map(UserId::from_uuid),
        submitted_at: row.submitted_at,
        reviewed_at: row.reviewed_at,
        paid_at: row.paid_at,
        updated_at: row.updated_at,
    })
}

pub fn policy_status_to_db(status: PolicyStatus) -> DbPolicyStatus {
    match status {
        PolicyStatus::Active => DbPolicyStatus::Active,
        PolicyStatus::Expired => DbPolicyStatus::Expired,
        PolicyStatus::Suspended => DbPolicyStatus::Suspended,
        PolicyStatus::Cancelled => DbPolicyStatus::Cancelled,
    }
}

pub fn policy_status_from_db(status: DbPolicyStatus) -> PolicyStatus {
    match status {
        DbPolicyStatus::Active => PolicyStatus::Active,
        DbPolicyStatus::Expired => PolicyStatus::Expired,
        DbPolicyStatus::Suspended => PolicyStatus::Suspended,
        DbPolicyStatus::Cancelled => PolicyStatus::Cancelled,
    }
}

pub fn policy_to_row(policy: &Policy) -> PolicyRow {
    PolicyRow {
        policy_id: policy.id.into(),
        policy_number: policy.policy_number.clone(),
        holder_id: policy.holder_id.into(),
        plan_id: policy.plan_id.into(),
        coverage_amount: policy.coverage_amount.amount(),
        remaining_coverage: policy.remaining_coverage.amount(),
        currency: policy.coverage_amount.currency().code().to_string(),
        status: policy_status_to_db(policy.status),
        start_date: policy.start_date,
        end_date: policy.end_date,
        created_at: policy.created_at,
        updated_at: policy.updated_at,
    }
}

pub fn row_to_policy(row: PolicyRow) -> Result<Policy, PortError> {
    let currency = parse_currency(&row.currency)?;
    Ok(Policy {
        id: PolicyId::from_uuid(row.policy_id),
        policy_number: row.policy_number,
        holder_id: UserId::from_uuid(row.holder_id),
        plan_id: PlanId::from_uuid(row.plan_id),
        coverage_amount: Money::new(row.coverage_amount, currency),
        remaining_coverage: Money::new(row.remaining_coverage, currency),
        status: policy_status_from_db(row.status),
        start_date: row.start_date,
        end_date: row.end_date,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub fn plan_to_row(plan: &InsurancePlan) -> PlanRow {
    PlanRow {
        plan_id: plan.id.into(),
        name: plan.name.clone(),
        description: plan.description.clone(),
        coverage_amount: plan.coverage_amount.amount(),
        premium_amount: plan.premium_amount.amount(),
        currency: plan.coverage_amount.currency().code().to_string(),
        duration_months: i32::try_from(plan.duration_months).unwrap_or(i32::MAX),
        is_active: plan.is_active,
        created_at: plan.created_at,
    }
}

pub fn role_to_db(role: Role) -> UserRole {
    match role {
        Role::PolicyHolder => UserRole::PolicyHolder,
        Role::HospitalStaff => UserRole::HospitalStaff,
        Role::ClaimsOfficer => UserRole::ClaimsOfficer,
        Role::InsuranceAgent => UserRole::InsuranceAgent,
        Role::Admin => UserRole::Admin,
    }
}

pub fn role_from_db(role: UserRole) -> Role {
    match role {
        UserRole::PolicyHolder => Role::PolicyHolder,
        UserRole::HospitalStaff => Role::HospitalStaff,
        UserRole::ClaimsOfficer => Role::ClaimsOfficer,
        UserRole::InsuranceAgent => Role::InsuranceAgent,
        UserRole::Admin => Role::Admin,
    }
}

pub fn user_to_actor(row: &UserRow) -> Actor {
    let actor = Actor::new(UserId::from_uuid(row.user_id), role_from_db(row.role));
    match row.hospital_id {
        Some(hospital_id) => actor.with_hospital(HospitalId::from_uuid(hospital_id)),
        None => actor,
    }
}

pub fn notification_to_row(notification: &Notification) -> NotificationRow {
    NotificationRow {
        notification_id: notification.id.into(),
        user_id: notification.user_id.into(),
        title: notification.title.clone(),
        message: notification.message.clone(),
        claim_id: notification.claim_id.map(Into::into),
        is_read: notification.is_read,
        created_at: notification.created_at,
    }
}

pub fn row_to_notification(row: NotificationRow) -> Notification {
    Notification {
        id: NotificationId::from_uuid(row.notification_id),
        user_id: UserId::from_uuid(row.user_id),
        title: row.title,
        message: row.message,
        claim_id: row.claim_id.map(ClaimId::from_uuid),
        is_read: row.is_read,
        created_at: row.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn policy() -> Policy {
        let usd = |a| Money::new(a, Currency::USD);
        let plan = InsurancePlan::new("Bronze", usd(dec!(1000)), usd(dec!(10)), 6).unwrap();
        Policy::issue(&plan, UserId::new(), NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()).unwrap()
    }

    #[test]
    fn test_claim_row_roundtrip() {
        let policy = policy();
        let mut claim = Claim::submit(
            policy.id,
            policy.holder_id,
            HospitalId::new(),
            Money::new(dec!(250.50), Currency::USD),
            Some("Outpatient visit".to_string()),
        )
        .unwrap();
        claim.reject(UserId::new(), "Not covered").unwrap();

        let row = claim_to_row(&claim);
        assert_eq!(row.status, DbClaimStatus::Rejected);
        assert_eq!(row.currency, "USD");
        assert_eq!(row_to_claim(row).unwrap(), claim);
    }

    #[test]
    fn test_policy_row_roundtrip() {
        let policy = policy();
        assert_eq!(row_to_policy(policy_to_row(&policy)).unwrap(), policy);
    }

    #[test]
    fn test_invalid_currency_is_reported() {
        let mut row = policy_to_row(&policy());
        row.currency = "XXX".to_string();
        assert!(row_to_policy(row).is_err());
    }

    #[test]
    fn test_role_mapping_is_total() {
        for role in Role::ALL {
            assert_eq!(role_from_db(role_to_db(role)), role);
        }
    }
}
