//! Report handlers

use axum::{extract::State, Extension, Json};

use domain_claims::{Actor, ClaimsSummary};

use crate::{error::ApiError, AppState};

/// Claim counts and totals across all claims
pub async fn claims_summary(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ClaimsSummary>, ApiError> {
    Ok(Json(state.claims.summary(&actor).await?))
}
