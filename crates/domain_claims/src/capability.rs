//! Roles, capabilities and the per-operation authorization check
//!
//! Every service operation names the capability it needs and calls
//! [`authorize`]; nothing branches on the role directly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{HospitalId, UserId};

use crate::claim::Claim;
use crate::error::ClaimError;

/// User role as carried in the access token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    PolicyHolder,
    HospitalStaff,
    ClaimsOfficer,
    InsuranceAgent,
    Admin,
}

/// An action an actor may be permitted to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    SubmitClaim,
    AddMedicalNotes,
    ReviewClaim,
    ProcessPayment,
    ViewOwnClaims,
    ViewHospitalClaims,
    ViewAllClaims,
    ViewReports,
    ViewNotifications,
}

impl Capability {
    pub const ALL: [Capability; 9] = [
        Capability::SubmitClaim,
        Capability::AddMedicalNotes,
        Capability::ReviewClaim,
        Capability::ProcessPayment,
        Capability::ViewOwnClaims,
        Capability::ViewHospitalClaims,
        Capability::ViewAllClaims,
        Capability::ViewReports,
        Capability::ViewNotifications,
    ];
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::PolicyHolder,
        Role::HospitalStaff,
        Role::ClaimsOfficer,
        Role::InsuranceAgent,
        Role::Admin,
    ];

    /// Returns the capabilities granted to this role
    pub fn capabilities(&self) -> &'static [Capability] {
        use Capability::*;
        match self {
            Role::PolicyHolder => &[SubmitClaim, ViewOwnClaims, ViewNotifications],
            Role::HospitalStaff => &[AddMedicalNotes, ViewHospitalClaims, ViewNotifications],
            Role::ClaimsOfficer => &[
                ReviewClaim,
                ProcessPayment,
                ViewAllClaims,
                ViewReports,
                ViewNotifications,
            ],
            Role::InsuranceAgent => &[SubmitClaim, ViewAllClaims, ViewReports, ViewNotifications],
            Role::Admin => &Capability::ALL,
        }
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::PolicyHolder => "policy_holder",
            Role::HospitalStaff => "hospital_staff",
            Role::ClaimsOfficer => "claims_officer",
            Role::InsuranceAgent => "insurance_agent",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ClaimError::validation(format!("Unknown role: {}", s)))
    }
}

/// The authenticated user performing an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
    /// Set for hospital staff
    pub hospital_id: Option<HospitalId>,
}

impl Actor {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self {
            user_id,
            role,
            hospital_id: None,
        }
    }

    pub fn with_hospital(mut self, hospital_id: HospitalId) -> Self {
        self.hospital_id = Some(hospital_id);
        self
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.role.has(capability)
    }

    /// Returns true if the actor may read `claim`
    pub fn can_view(&self, claim: &Claim) -> bool {
        if self.can(Capability::ViewAllClaims) {
            return true;
        }
        if self.can(Capability::ViewHospitalClaims) && self.hospital_id == Some(claim.hospital_id) {
            return true;
        }
        self.can(Capability::ViewOwnClaims) && claim.holder_id == self.user_id
    }

    /// Returns true if the actor acts for the hospital that treated `claim`
    ///
    /// Staff without a hospital assignment are not bound to one hospital.
    pub fn works_at(&self, claim: &Claim) -> bool {
        match self.hospital_id {
            Some(hospital_id) => hospital_id == claim.hospital_id,
            None => true,
        }
    }
}

/// Fails with `Forbidden` unless the actor holds `capability`
pub fn authorize(actor: &Actor, capability: Capability) -> Result<(), ClaimError> {
    if actor.can(capability) {
        Ok(())
    } else {
        Err(ClaimError::forbidden(format!(
            "{} lacks {:?}",
            actor.role, capability
        )))
    }
}
