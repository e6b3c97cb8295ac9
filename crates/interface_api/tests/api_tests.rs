//! HTTP API tests
//!
//! The router runs against the in-memory claim store and notification feed.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::SecondsFormat;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use uuid::Uuid;

use core_kernel::{Currency, HealthCheckable, HospitalId};
use domain_claims::{Actor, ClaimStatus, ClaimsSummary};
use domain_policy::Policy;
use interface_api::auth::create_token;
use interface_api::config::ApiConfig;
use interface_api::dto::claims::ClaimResponse;
use interface_api::dto::notifications::{FeedResponse, NotificationResponse, UnreadCountResponse};
use interface_api::dto::policy::CoverageResponse;
use interface_api::error::ErrorResponse;
use interface_api::handlers::health::HealthResponse;
use interface_api::{create_router_with_state, AppState};
use test_utils::{ActorFixtures, PolicyFixtures, TestServiceStack};

const SECRET: &str = "api-test-secret";

struct TestApp {
    server: TestServer,
    stack: TestServiceStack,
    policy: Policy,
    holder: Actor,
    staff: Actor,
    officer: Actor,
    hospital_id: HospitalId,
}

impl TestApp {
    async fn new(coverage: Decimal) -> Self {
        let hospital_id = HospitalId::new();
        let holder = ActorFixtures::holder();
        let staff = ActorFixtures::staff_at(hospital_id);
        let officer = ActorFixtures::officer();
        let policy = PolicyFixtures::policy_with_remaining(holder.user_id, coverage, coverage);

        let stack = TestServiceStack::with_policies(vec![policy.clone()]).await;
        for actor in [holder, staff, officer] {
            stack.notifications.register(actor).await;
        }

        let state = AppState {
            claims: stack.service.clone(),
            coverage: Arc::new(stack.store.clone()),
            notifications: Arc::new(stack.notifications.clone()),
            health: Arc::new([
                Arc::new(stack.store.clone()) as Arc<dyn HealthCheckable>,
                Arc::new(stack.notifications.clone()) as Arc<dyn HealthCheckable>,
            ]),
            config: ApiConfig {
                jwt_secret: SECRET.to_string(),
                ..ApiConfig::default()
            },
        };
        let server = TestServer::new(create_router_with_state(state)).unwrap();

        Self {
            server,
            stack,
            policy,
            holder,
            staff,
            officer,
            hospital_id,
        }
    }

    fn token(actor: &Actor) -> String {
        create_token(actor, SECRET, 3600).unwrap()
    }

    async fn submit(&self, amount: Decimal) -> ClaimResponse {
        let response = self
            .server
            .post("/api/v1/claims")
            .authorization_bearer(Self::token(&self.holder))
            .json(&json!({
                "policy_id": Uuid::from(self.policy.id),
                "hospital_id": Uuid::from(self.hospital_id),
                "claim_amount": amount,
                "description": "Appendectomy"
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<ClaimResponse>()
    }

    async fn approve(&self, claim_id: Uuid, amount: Decimal) -> axum_test::TestResponse {
        self.server
            .post(&format!("/api/v1/claims/{}/review", claim_id))
            .authorization_bearer(Self::token(&self.officer))
            .json(&json!({ "decision": "approve", "approved_amount": amount }))
            .await
    }
}

// ============================================================================
// Health and authentication
// ============================================================================

mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_is_public() {
        let app = TestApp::new(dec!(20000)).await;

        let response = app.server.get("/health").await;
        response.assert_status_ok();

        let response = app.server.get("/health/ready").await;
        response.assert_status_ok();
        let body = response.json::<HealthResponse>();
        assert_eq!(body.status, "ready");
        assert_eq!(body.adapters.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let app = TestApp::new(dec!(20000)).await;
        let response = app.server.get("/api/v1/claims").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<ErrorResponse>().error, "unauthorized");
    }

    #[tokio::test]
    async fn test_foreign_signature_is_unauthorized() {
        let app = TestApp::new(dec!(20000)).await;
        let token = create_token(&app.holder, "another-secret", 3600).unwrap();
        let response = app
            .server
            .get("/api/v1/claims")
            .authorization_bearer(token)
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}

// ============================================================================
// Claim lifecycle
// ============================================================================

mod claim_tests {
    use super::*;

    #[tokio::test]
    async fn test_full_lifecycle() {
        let app = TestApp::new(dec!(20000)).await;
        let claim = app.submit(dec!(15000)).await;
        assert_eq!(claim.status, ClaimStatus::Submitted);

        let response = app
            .server
            .put(&format!("/api/v1/claims/{}/medical-notes", claim.id))
            .authorization_bearer(TestApp::token(&app.staff))
            .json(&json!({ "notes": "Laparoscopic surgery, no complications", "expected_status": "submitted" }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<ClaimResponse>().status, ClaimStatus::InReview);

        let response = app.approve(claim.id, dec!(15000)).await;
        response.assert_status_ok();
        let approved = response.json::<ClaimResponse>();
        assert_eq!(approved.status, ClaimStatus::Approved);
        assert_eq!(approved.approved_amount, Some(dec!(15000)));

        let response = app
            .server
            .get(&format!("/api/v1/policies/{}/coverage", Uuid::from(app.policy.id)))
            .authorization_bearer(TestApp::token(&app.holder))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<CoverageResponse>().remaining_coverage, dec!(5000));

        let pay = |token: String| {
            app.server
                .post(&format!("/api/v1/claims/{}/pay", claim.id))
                .authorization_bearer(token)
        };
        let response = pay(TestApp::token(&app.officer)).await;
        response.assert_status_ok();
        assert_eq!(response.json::<ClaimResponse>().status, ClaimStatus::Paid);

        let response = pay(TestApp::token(&app.officer)).await;
        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_insufficient_coverage_is_bad_request() {
        let app = TestApp::new(dec!(5000)).await;
        let claim = app.submit(dec!(10000)).await;

        let response = app.approve(claim.id, dec!(8000)).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = app
            .server
            .get(&format!("/api/v1/claims/{}", claim.id))
            .authorization_bearer(TestApp::token(&app.officer))
            .await;
        response.assert_status_ok();
        let unchanged = response.json::<ClaimResponse>();
        assert_eq!(unchanged.status, ClaimStatus::Submitted);
        assert_eq!(unchanged.approved_amount, None);
    }

    #[tokio::test]
    async fn test_reject_with_reason() {
        let app = TestApp::new(dec!(20000)).await;
        let claim = app.submit(dec!(900)).await;

        let response = app
            .server
            .post(&format!("/api/v1/claims/{}/review", claim.id))
            .authorization_bearer(TestApp::token(&app.officer))
            .json(&json!({ "decision": "reject", "rejection_reason": "Pre-existing condition" }))
            .await;
        response.assert_status_ok();
        let rejected = response.json::<ClaimResponse>();
        assert_eq!(rejected.status, ClaimStatus::Rejected);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("Pre-existing condition"));

        // Terminal
        app.approve(claim.id, dec!(900)).await.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_blank_rejection_reason_is_bad_request() {
        let app = TestApp::new(dec!(20000)).await;
        let claim = app.submit(dec!(900)).await;

        let response = app
            .server
            .post(&format!("/api/v1/claims/{}/review", claim.id))
            .authorization_bearer(TestApp::token(&app.officer))
            .json(&json!({ "decision": "reject", "rejection_reason": "   " }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stale_expected_status_is_conflict() {
        let app = TestApp::new(dec!(20000)).await;
        let claim = app.submit(dec!(1200)).await;

        let response = app
            .server
            .post(&format!("/api/v1/claims/{}/review", claim.id))
            .authorization_bearer(TestApp::token(&app.officer))
            .json(&json!({
                "decision": "approve",
                "approved_amount": 1200,
                "expected_status": "in_review"
            }))
            .await;
        response.assert_status(StatusCode::CONFLICT);

        let stored = app.stack.store.claim(core_kernel::ClaimId::from_uuid(claim.id)).await.unwrap();
        assert_eq!(stored.status, ClaimStatus::Submitted);
    }

    #[tokio::test]
    async fn test_holder_cannot_review() {
        let app = TestApp::new(dec!(20000)).await;
        let claim = app.submit(dec!(1200)).await;

        let response = app
            .server
            .post(&format!("/api/v1/claims/{}/review", claim.id))
            .authorization_bearer(TestApp::token(&app.holder))
            .json(&json!({ "decision": "approve", "approved_amount": 1200 }))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_staff_of_other_hospital_cannot_add_notes() {
        let app = TestApp::new(dec!(20000)).await;
        let claim = app.submit(dec!(1200)).await;
        let outsider = ActorFixtures::staff_at(HospitalId::new());

        let response = app
            .server
            .put(&format!("/api/v1/claims/{}/medical-notes", claim.id))
            .authorization_bearer(TestApp::token(&outsider))
            .json(&json!({ "notes": "Treated" }))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_claim_is_not_found() {
        let app = TestApp::new(dec!(20000)).await;
        let response = app
            .server
            .get(&format!("/api/v1/claims/{}", Uuid::new_v4()))
            .authorization_bearer(TestApp::token(&app.officer))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_suspended_policy_rejects_submission() {
        let app = TestApp::new(dec!(20000)).await;
        let mut policy = app.policy.clone();
        policy.suspend().unwrap();
        app.stack.store.put_policy(policy).await;

        let response = app
            .server
            .post("/api/v1/claims")
            .authorization_bearer(TestApp::token(&app.holder))
            .json(&json!({
                "policy_id": Uuid::from(app.policy.id),
                "hospital_id": Uuid::from(app.hospital_id),
                "claim_amount": 500
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_claim_in_foreign_currency_is_rejected() {
        let app = TestApp::new(dec!(20000)).await;

        let response = app
            .server
            .post("/api/v1/claims")
            .authorization_bearer(TestApp::token(&app.holder))
            .json(&json!({
                "policy_id": Uuid::from(app.policy.id),
                "hospital_id": Uuid::from(app.hospital_id),
                "claim_amount": 1000,
                "currency": "EUR"
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        use domain_claims::{ClaimQuery, ClaimStore};
        assert!(app.stack.store.list(&ClaimQuery::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pay_takes_no_body() {
        let app = TestApp::new(dec!(20000)).await;
        let claim = app.submit(dec!(800)).await;
        app.approve(claim.id, dec!(800)).await.assert_status_ok();

        let response = app
            .server
            .post(&format!("/api/v1/claims/{}/pay", claim.id))
            .authorization_bearer(TestApp::token(&app.officer))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<ClaimResponse>().status, ClaimStatus::Paid);
    }

    #[tokio::test]
    async fn test_pay_checks_expected_status_from_query() {
        let app = TestApp::new(dec!(20000)).await;
        let claim = app.submit(dec!(800)).await;
        app.approve(claim.id, dec!(800)).await.assert_status_ok();

        let response = app
            .server
            .post(&format!("/api/v1/claims/{}/pay", claim.id))
            .authorization_bearer(TestApp::token(&app.officer))
            .add_query_param("expected_status", "in_review")
            .await;
        response.assert_status(StatusCode::CONFLICT);

        let response = app
            .server
            .post(&format!("/api/v1/claims/{}/pay", claim.id))
            .authorization_bearer(TestApp::token(&app.officer))
            .add_query_param("expected_status", "approved")
            .await;
        response.assert_status_ok();
    }

    #[tokio::test]
    async fn test_status_is_snake_case_on_the_wire() {
        let app = TestApp::new(dec!(20000)).await;
        let claim = app.submit(dec!(400)).await;

        let response = app
            .server
            .put(&format!("/api/v1/claims/{}/medical-notes", claim.id))
            .authorization_bearer(TestApp::token(&app.staff))
            .json(&json!({ "notes": "Observation overnight" }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<serde_json::Value>()["status"], "in_review");

        let response = app
            .server
            .get("/api/v1/claims")
            .authorization_bearer(TestApp::token(&app.officer))
            .add_query_param("status", "in_review")
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Vec<ClaimResponse>>().len(), 1);
    }
}

// ============================================================================
// Request validation
// ============================================================================

mod validation_tests {
    use super::*;

    #[tokio::test]
    async fn test_negative_amount_is_unprocessable() {
        let app = TestApp::new(dec!(20000)).await;
        let response = app
            .server
            .post("/api/v1/claims")
            .authorization_bearer(TestApp::token(&app.holder))
            .json(&json!({
                "policy_id": Uuid::from(app.policy.id),
                "hospital_id": Uuid::from(app.hospital_id),
                "claim_amount": -50
            }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body = response.json::<ErrorResponse>();
        assert!(body.details.unwrap().iter().any(|d| d.starts_with("claim_amount")));
    }

    #[tokio::test]
    async fn test_empty_notes_are_unprocessable() {
        let app = TestApp::new(dec!(20000)).await;
        let claim = app.submit(dec!(100)).await;
        let response = app
            .server
            .put(&format!("/api/v1/claims/{}/medical-notes", claim.id))
            .authorization_bearer(TestApp::token(&app.staff))
            .json(&json!({ "notes": "" }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_approve_without_amount_is_unprocessable() {
        let app = TestApp::new(dec!(20000)).await;
        let claim = app.submit(dec!(100)).await;
        let response = app
            .server
            .post(&format!("/api/v1/claims/{}/review", claim.id))
            .authorization_bearer(TestApp::token(&app.officer))
            .json(&json!({ "decision": "approve" }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_unknown_status_filter_is_bad_request() {
        let app = TestApp::new(dec!(20000)).await;
        let response = app
            .server
            .get("/api/v1/claims")
            .add_query_param("status", "lost")
            .authorization_bearer(TestApp::token(&app.officer))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

// ============================================================================
// Listing and reports
// ============================================================================

mod query_tests {
    use super::*;

    #[tokio::test]
    async fn test_holder_lists_only_own_claims() {
        let app = TestApp::new(dec!(20000)).await;
        app.submit(dec!(100)).await;
        app.submit(dec!(200)).await;

        let stranger = ActorFixtures::holder();
        let response = app
            .server
            .get("/api/v1/claims")
            .authorization_bearer(TestApp::token(&stranger))
            .await;
        response.assert_status_ok();
        assert!(response.json::<Vec<ClaimResponse>>().is_empty());

        let response = app
            .server
            .get("/api/v1/claims")
            .authorization_bearer(TestApp::token(&app.holder))
            .await;
        assert_eq!(response.json::<Vec<ClaimResponse>>().len(), 2);
    }

    #[tokio::test]
    async fn test_status_filter() {
        let app = TestApp::new(dec!(20000)).await;
        let first = app.submit(dec!(100)).await;
        app.submit(dec!(200)).await;
        app.approve(first.id, dec!(100)).await.assert_status_ok();

        let response = app
            .server
            .get("/api/v1/claims")
            .add_query_param("status", "approved")
            .authorization_bearer(TestApp::token(&app.officer))
            .await;
        let claims = response.json::<Vec<ClaimResponse>>();
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].id, first.id);
    }

    #[tokio::test]
    async fn test_claims_summary_requires_reports_capability() {
        let app = TestApp::new(dec!(20000)).await;
        let first = app.submit(dec!(1000)).await;
        app.submit(dec!(400)).await;
        app.approve(first.id, dec!(800)).await.assert_status_ok();

        let response = app
            .server
            .get("/api/v1/reports/claims-summary")
            .authorization_bearer(TestApp::token(&app.holder))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);

        let response = app
            .server
            .get("/api/v1/reports/claims-summary")
            .authorization_bearer(TestApp::token(&app.officer))
            .await;
        response.assert_status_ok();
        let summary = response.json::<ClaimsSummary>();
        assert_eq!(summary.total_claims, 2);
        assert_eq!(summary.approved, 1);
        let usd_totals = summary.totals_in(Currency::USD).unwrap();
        assert_eq!(usd_totals.claimed, dec!(1400));
        assert_eq!(usd_totals.approved, dec!(800));
    }

    #[tokio::test]
    async fn test_other_holder_cannot_see_coverage() {
        let app = TestApp::new(dec!(20000)).await;
        let response = app
            .server
            .get(&format!("/api/v1/policies/{}/coverage", Uuid::from(app.policy.id)))
            .authorization_bearer(TestApp::token(&ActorFixtures::holder()))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }
}

// ============================================================================
// Notification feed
// ============================================================================

mod notification_tests {
    use super::*;

    async fn feed(app: &TestApp, actor: &Actor, since: Option<&str>) -> FeedResponse {
        let mut request = app
            .server
            .get("/api/v1/notifications")
            .authorization_bearer(TestApp::token(actor));
        if let Some(since) = since {
            request = request.add_query_param("since", since);
        }
        let response = request.await;
        response.assert_status_ok();
        response.json::<FeedResponse>()
    }

    async fn unread(app: &TestApp, actor: &Actor) -> u64 {
        let response = app
            .server
            .get("/api/v1/notifications/unread-count")
            .authorization_bearer(TestApp::token(actor))
            .await;
        response.assert_status_ok();
        response.json::<UnreadCountResponse>().unread
    }

    #[tokio::test]
    async fn test_poll_and_mark_read() {
        let app = TestApp::new(dec!(20000)).await;
        let claim = app.submit(dec!(2500)).await;
        app.approve(claim.id, dec!(2500)).await.assert_status_ok();

        let page = feed(&app, &app.holder, None).await;
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].claim_id, Some(claim.id));
        assert_eq!(page.poll_interval_secs, 30);
        assert_eq!(unread(&app, &app.holder).await, 1);

        let cursor = page
            .next_cursor
            .unwrap()
            .to_rfc3339_opts(SecondsFormat::Micros, true);
        let again = feed(&app, &app.holder, Some(&cursor)).await;
        assert_eq!(again.items.len(), 1);
        assert_eq!(again.items[0].id, page.items[0].id);

        let response = app
            .server
            .put(&format!("/api/v1/notifications/{}/read", page.items[0].id))
            .authorization_bearer(TestApp::token(&app.holder))
            .await;
        response.assert_status_ok();
        assert!(response.json::<NotificationResponse>().is_read);
        assert_eq!(unread(&app, &app.holder).await, 0);
    }

    #[tokio::test]
    async fn test_staff_hears_about_submissions_and_decisions() {
        let app = TestApp::new(dec!(20000)).await;
        let claim = app.submit(dec!(2500)).await;
        app.approve(claim.id, dec!(2500)).await.assert_status_ok();

        assert_eq!(unread(&app, &app.staff).await, 2);
        assert_eq!(unread(&app, &app.officer).await, 1);
    }

    #[tokio::test]
    async fn test_cannot_mark_another_users_notification() {
        let app = TestApp::new(dec!(20000)).await;
        app.submit(dec!(2500)).await;

        let officer_page = feed(&app, &app.officer, None).await;
        let response = app
            .server
            .put(&format!("/api/v1/notifications/{}/read", officer_page.items[0].id))
            .authorization_bearer(TestApp::token(&app.holder))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(unread(&app, &app.officer).await, 1);
    }
}
