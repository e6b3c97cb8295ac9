//! Claim lifecycle service
//!
//! Runs every operation as: authorize, load, check the caller's view, apply
//! the transition on a copy, commit through the store, then notify. A failure
//! at any step before the commit leaves the stored claim untouched.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use core_kernel::{ClaimId, HospitalId, Money, PolicyId};

use crate::capability::{authorize, Actor, Capability};
use crate::claim::{Claim, ClaimStatus};
use crate::decision::ReviewDecision;
use crate::error::ClaimError;
use crate::events::{ClaimEvent, ClaimEventKind};
use crate::ports::{
    ClaimQuery, ClaimStore, ClaimTransition, CoverageChecker, CoverageDebit,
    NotificationDispatcher,
};
use crate::report::ClaimsSummary;

/// Data a policy holder (or an agent on their behalf) files a claim with
#[derive(Debug, Clone, PartialEq)]
pub struct NewClaimRequest {
    pub policy_id: PolicyId,
    pub hospital_id: HospitalId,
    pub claim_amount: Money,
    pub description: Option<String>,
}

/// Applies claim lifecycle transitions
#[derive(Clone)]
pub struct ClaimLifecycleService {
    store: Arc<dyn ClaimStore>,
    coverage: Arc<dyn CoverageChecker>,
    dispatcher: Arc<dyn NotificationDispatcher>,
}

impl ClaimLifecycleService {
    /// Creates a new lifecycle service
    pub fn new(
        store: Arc<dyn ClaimStore>,
        coverage: Arc<dyn CoverageChecker>,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            store,
            coverage,
            dispatcher,
        }
    }

    /// Files a new claim in Submitted status
    ///
    /// The claim belongs to the policy's holder. Policy holders can only file
    /// against their own policies; agents and admins may file for anyone.
    #[instrument(skip(self, request), fields(actor = %actor.user_id, policy_id = %request.policy_id))]
    pub async fn submit(&self, actor: &Actor, request: NewClaimRequest) -> Result<Claim, ClaimError> {
        authorize(actor, Capability::SubmitClaim)?;

        let coverage = self.coverage.coverage(request.policy_id).await?;
        if !actor.can(Capability::ViewAllClaims) && coverage.holder_id != actor.user_id {
            return Err(ClaimError::forbidden("Policy belongs to another holder"));
        }
        if !coverage.is_active() {
            return Err(ClaimError::PolicyInactive(request.policy_id.to_string()));
        }
        if request.claim_amount.currency() != coverage.remaining.currency() {
            return Err(ClaimError::validation(format!(
                "Claim currency {} does not match policy currency {}",
                request.claim_amount.currency(),
                coverage.remaining.currency()
            )));
        }

        let claim = Claim::submit(
            request.policy_id,
            coverage.holder_id,
            request.hospital_id,
            request.claim_amount,
            request.description,
        )?;
        self.store.insert(&claim).await?;

        info!(claim_id = %claim.id, claim_number = %claim.claim_number, "Claim submitted");
        self.notify(ClaimEvent::for_claim(ClaimEventKind::ClaimSubmitted, &claim)).await;
        Ok(claim)
    }

    /// Attaches medical notes; a Submitted claim moves to InReview
    #[instrument(skip(self, notes), fields(actor = %actor.user_id))]
    pub async fn add_medical_notes(
        &self,
        claim_id: ClaimId,
        actor: &Actor,
        notes: &str,
        expected_status: Option<ClaimStatus>,
    ) -> Result<Claim, ClaimError> {
        authorize(actor, Capability::AddMedicalNotes)?;

        let current = self.load_for_transition(claim_id, expected_status).await?;
        if !actor.works_at(&current) {
            return Err(ClaimError::forbidden("Claim belongs to another hospital"));
        }

        let mut updated = current.clone();
        updated.add_medical_notes(actor.user_id, notes)?;

        let claim = self.commit(&current, updated, None).await?;
        info!(claim_id = %claim.id, status = %claim.status, "Medical notes added");
        self.notify(ClaimEvent::for_claim(ClaimEventKind::MedicalNotesAdded, &claim)).await;
        Ok(claim)
    }

    /// Approves or rejects an open claim
    ///
    /// Approval debits the policy's remaining coverage in the same commit.
    #[instrument(skip(self, decision), fields(actor = %reviewer.user_id))]
    pub async fn review(
        &self,
        claim_id: ClaimId,
        reviewer: &Actor,
        decision: ReviewDecision,
        expected_status: Option<ClaimStatus>,
    ) -> Result<Claim, ClaimError> {
        authorize(reviewer, Capability::ReviewClaim)?;
        decision.validate()?;

        let current = self.load_for_transition(claim_id, expected_status).await?;
        let mut updated = current.clone();

        let (claim, kind) = match decision {
            ReviewDecision::Approve { amount } => {
                if !current.status.can_transition_to(ClaimStatus::Approved) {
                    return Err(ClaimError::InvalidState {
                        action: "approve",
                        status: current.status,
                    });
                }
                let coverage = self.coverage.coverage(current.policy_id).await?;
                updated.approve(reviewer.user_id, amount, &coverage)?;

                let debit = CoverageDebit {
                    policy_id: current.policy_id,
                    amount,
                };
                let claim = self.commit(&current, updated, Some(debit)).await?;
                info!(claim_id = %claim.id, approved = %amount, "Claim approved");
                (claim, ClaimEventKind::ClaimApproved)
            }
            ReviewDecision::Reject { reason } => {
                updated.reject(reviewer.user_id, &reason)?;
                let claim = self.commit(&current, updated, None).await?;
                info!(claim_id = %claim.id, "Claim rejected");
                (claim, ClaimEventKind::ClaimRejected)
            }
        };

        self.notify(ClaimEvent::for_claim(kind, &claim)).await;
        Ok(claim)
    }

    /// Marks an approved claim as paid
    #[instrument(skip(self), fields(actor = %actor.user_id))]
    pub async fn mark_paid(
        &self,
        claim_id: ClaimId,
        actor: &Actor,
        expected_status: Option<ClaimStatus>,
    ) -> Result<Claim, ClaimError> {
        authorize(actor, Capability::ProcessPayment)?;

        let current = self.load_for_transition(claim_id, expected_status).await?;
        let mut updated = current.clone();
        updated.mark_paid()?;

        let claim = self.commit(&current, updated, None).await?;
        info!(claim_id = %claim.id, "Claim paid");
        self.notify(ClaimEvent::for_claim(ClaimEventKind::ClaimPaid, &claim)).await;
        Ok(claim)
    }

    /// Returns a claim the actor is allowed to see
    pub async fn get(&self, claim_id: ClaimId, actor: &Actor) -> Result<Claim, ClaimError> {
        let claim = self.store.load(claim_id).await?;
        if !actor.can_view(&claim) {
            return Err(ClaimError::forbidden("Not allowed to view this claim"));
        }
        Ok(claim)
    }

    /// Lists claims, narrowed to what the actor may see
    pub async fn list(&self, actor: &Actor, query: ClaimQuery) -> Result<Vec<Claim>, ClaimError> {
        let query = scope_query(actor, query)?;
        Ok(self.store.list(&query).await?)
    }

    /// Summarises all claims from the store's per-status totals
    pub async fn summary(&self, actor: &Actor) -> Result<ClaimsSummary, ClaimError> {
        authorize(actor, Capability::ViewReports)?;
        let totals = self.store.status_totals().await?;
        Ok(ClaimsSummary::from_totals(&totals))
    }

    async fn load_for_transition(
        &self,
        claim_id: ClaimId,
        expected_status: Option<ClaimStatus>,
    ) -> Result<Claim, ClaimError> {
        let claim = self.store.load(claim_id).await?;
        match expected_status {
            Some(expected) if expected != claim.status => Err(ClaimError::Conflict(format!(
                "Claim {} is {}, caller expected {}",
                claim_id, claim.status, expected
            ))),
            _ => Ok(claim),
        }
    }

    async fn commit(
        &self,
        current: &Claim,
        updated: Claim,
        coverage_debit: Option<CoverageDebit>,
    ) -> Result<Claim, ClaimError> {
        let transition = ClaimTransition {
            claim: updated,
            expected_status: current.status,
            coverage_debit,
        };
        self.store.commit(transition).await.map_err(|e| {
            if e.is_conflict() {
                warn!(claim_id = %current.id, error = %e, "Concurrent claim update detected");
            }
            ClaimError::from(e)
        })
    }

    /// Dispatch failures are logged only; the transition is already durable
    async fn notify(&self, event: ClaimEvent) {
        if let Err(e) = self.dispatcher.dispatch(&event).await {
            warn!(
                claim_id = %event.claim_id,
                kind = ?event.kind,
                error = %e,
                "Failed to dispatch claim notification"
            );
        }
    }
}

/// Restricts a query to the claims the actor can see
fn scope_query(actor: &Actor, mut query: ClaimQuery) -> Result<ClaimQuery, ClaimError> {
    if actor.can(Capability::ViewAllClaims) {
        return Ok(query);
    }
    if actor.can(Capability::ViewHospitalClaims) {
        let hospital_id = actor
            .hospital_id
            .ok_or_else(|| ClaimError::forbidden("Staff account has no hospital"))?;
        query.hospital_id = Some(hospital_id);
        return Ok(query);
    }
    if actor.can(Capability::ViewOwnClaims) {
        query.holder_id = Some(actor.user_id);
        return Ok(query);
    }
    Err(ClaimError::forbidden("Not allowed to list claims"))
}
