//! HTTP API Layer
//!
//! REST API for the claims platform using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for claims, policies, notifications and reports
//! - **Middleware**: Bearer authentication and audit logging
//! - **DTOs**: Request/Response bodies, validated before the service runs
//! - **Error Handling**: Domain errors mapped to status codes in one place
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(pool, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use core_kernel::HealthCheckable;
use domain_claims::{ClaimLifecycleService, CoverageChecker};
use domain_notification::NotificationFeed;
use infra_db::{PostgresClaimStore, PostgresNotificationAdapter};

use crate::config::ApiConfig;
use crate::handlers::{claims, health, notifications, policy, reports};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub claims: ClaimLifecycleService,
    pub coverage: Arc<dyn CoverageChecker>,
    pub notifications: Arc<dyn NotificationFeed>,
    /// Adapters probed by the readiness check
    pub health: Arc<[Arc<dyn HealthCheckable>]>,
    pub config: ApiConfig,
}

impl AppState {
    /// Wires the PostgreSQL adapters around `pool`
    pub fn postgres(pool: PgPool, config: ApiConfig) -> Self {
        let store = Arc::new(PostgresClaimStore::new(pool.clone()));
        let notifications = Arc::new(PostgresNotificationAdapter::new(pool));

        Self {
            claims: ClaimLifecycleService::new(store.clone(), store.clone(), notifications.clone()),
            coverage: store.clone(),
            notifications: notifications.clone(),
            health: Arc::new([
                store as Arc<dyn HealthCheckable>,
                notifications as Arc<dyn HealthCheckable>,
            ]),
            config,
        }
    }
}

/// Creates the main API router backed by PostgreSQL
pub fn create_router(pool: PgPool, config: ApiConfig) -> Router {
    create_router_with_state(AppState::postgres(pool, config))
}

/// Creates the main API router around prepared state
pub fn create_router_with_state(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let claims_routes = Router::new()
        .route("/", post(claims::submit_claim).get(claims::list_claims))
        .route("/:id", get(claims::get_claim))
        .route("/:id/medical-notes", put(claims::add_medical_notes))
        .route("/:id/review", post(claims::review_claim))
        .route("/:id/pay", post(claims::mark_paid));

    let policy_routes = Router::new().route("/:id/coverage", get(policy::get_coverage));

    let notification_routes = Router::new()
        .route("/", get(notifications::list_notifications))
        .route("/unread-count", get(notifications::unread_count))
        .route("/:id/read", put(notifications::mark_read));

    let report_routes = Router::new().route("/claims-summary", get(reports::claims_summary));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/claims", claims_routes)
        .nest("/policies", policy_routes)
        .nest("/notifications", notification_routes)
        .nest("/reports", report_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
