//! Claims handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use core_kernel::ClaimId;
use domain_claims::Actor;

use crate::dto::claims::*;
use crate::dto::ValidatedJson;
use crate::{error::ApiError, AppState};

/// Files a new claim
pub async fn submit_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ValidatedJson(request): ValidatedJson<SubmitClaimRequest>,
) -> Result<(StatusCode, Json<ClaimResponse>), ApiError> {
    let claim = state.claims.submit(&actor, request.into_domain()?).await?;
    Ok((StatusCode::CREATED, Json(claim.into())))
}

/// Lists the claims visible to the caller
pub async fn list_claims(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(params): Query<ListClaimsParams>,
) -> Result<Json<Vec<ClaimResponse>>, ApiError> {
    let claims = state.claims.list(&actor, params.to_query()?).await?;
    Ok(Json(claims.into_iter().map(Into::into).collect()))
}

/// Gets a claim by ID
pub async fn get_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let claim = state.claims.get(ClaimId::from_uuid(id), &actor).await?;
    Ok(Json(claim.into()))
}

/// Attaches medical notes
pub async fn add_medical_notes(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<MedicalNotesRequest>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let claim = state
        .claims
        .add_medical_notes(ClaimId::from_uuid(id), &actor, &request.notes, request.expected_status)
        .await?;
    Ok(Json(claim.into()))
}

/// Approves or rejects a claim
pub async fn review_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<ReviewClaimRequest>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let decision = request.to_decision()?;
    let claim = state
        .claims
        .review(ClaimId::from_uuid(id), &actor, decision, request.expected_status)
        .await?;
    Ok(Json(claim.into()))
}

/// Marks an approved claim as paid
pub async fn mark_paid(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Query(params): Query<PayClaimParams>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let claim = state
        .claims
        .mark_paid(ClaimId::from_uuid(id), &actor, params.expected_status)
        .await?;
    Ok(Json(claim.into()))
}
