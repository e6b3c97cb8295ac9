//! Policy handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use core_kernel::PolicyId;
use domain_claims::{Actor, Capability, ClaimError, CoverageChecker};

use crate::dto::policy::CoverageResponse;
use crate::{error::ApiError, AppState};

/// Remaining coverage of a policy
///
/// Holders see their own policies; roles that see all claims see any policy.
pub async fn get_coverage(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<CoverageResponse>, ApiError> {
    let coverage = state
        .coverage
        .coverage(PolicyId::from_uuid(id))
        .await
        .map_err(ClaimError::from)?;

    if coverage.holder_id != actor.user_id && !actor.can(Capability::ViewAllClaims) {
        return Err(ApiError::Forbidden("Not allowed to view this policy".to_string()));
    }
    Ok(Json(coverage.into()))
}
