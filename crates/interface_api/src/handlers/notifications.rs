//! Notification feed handlers
//!
//! Clients poll `GET /notifications` with the `next_cursor` of their previous
//! poll. Repeating a poll with the same cursor returns the same rows.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;

use core_kernel::NotificationId;
use domain_claims::{authorize, Actor, Capability};
use domain_notification::{NotificationError, NotificationFeed};

use crate::dto::notifications::*;
use crate::{error::ApiError, AppState};

/// Fetches notifications created since the cursor
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(params): Query<FeedParams>,
) -> Result<Json<FeedResponse>, ApiError> {
    authorize(&actor, Capability::ViewNotifications)?;

    let items = state
        .notifications
        .fetch_since(actor.user_id, params.since, params.limit())
        .await
        .map_err(NotificationError::from)?;

    let next_cursor = items.last().map(|n| n.created_at).or(params.since);
    Ok(Json(FeedResponse {
        items: items.into_iter().map(Into::into).collect(),
        next_cursor,
        poll_interval_secs: state.config.notification_poll_secs,
    }))
}

/// Number of unread notifications
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<UnreadCountResponse>, ApiError> {
    authorize(&actor, Capability::ViewNotifications)?;

    let unread = state
        .notifications
        .unread_count(actor.user_id)
        .await
        .map_err(NotificationError::from)?;
    Ok(Json(UnreadCountResponse { unread }))
}

/// Marks one notification as read
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<NotificationResponse>, ApiError> {
    authorize(&actor, Capability::ViewNotifications)?;

    let notification = state
        .notifications
        .mark_read(actor.user_id, NotificationId::from_uuid(id))
        .await
        .map_err(NotificationError::from)?;
    Ok(Json(notification.into()))
}
