//! PostgreSQL adapter tests
//!
//! These start a PostgreSQL container and need a running Docker daemon:
//! `cargo test -p infra_db -- --ignored`

use std::sync::Arc;

use chrono::Utc;
use rust_decimal_macros::dec;
use sqlx::PgPool;

use core_kernel::{Currency, HospitalId, HealthCheckable, UserId};
use domain_claims::{
    Actor, ClaimError, ClaimLifecycleService, ClaimQuery, ClaimStatus, ClaimStore, ClaimTransition,
    ClaimsSummary, CoverageChecker, NewClaimRequest, ReviewDecision,
};
use domain_notification::{NotificationFeed, NotificationSession};
use domain_policy::Policy;
use infra_db::adapters::mapping::{plan_to_row, policy_to_row, role_to_db};
use infra_db::repositories::users::UserRow;
use infra_db::repositories::{PolicyRepository, UserRepository};
use infra_db::{PostgresClaimStore, PostgresNotificationAdapter};
use test_utils::{
    create_isolated_test_database, ActorFixtures, MoneyFixtures, PolicyFixtures, UserSeed,
};

struct Seeded {
    policy: Policy,
    holder: Actor,
    staff: Actor,
    officer: Actor,
    hospital_id: HospitalId,
}

async fn seed_user(users: &UserRepository, actor: Actor) {
    let seed = UserSeed::for_actor(actor);
    users
        .insert(&UserRow {
            user_id: actor.user_id.into(),
            email: seed.email,
            full_name: seed.full_name,
            role: role_to_db(actor.role),
            hospital_id: actor.hospital_id.map(Into::into),
            is_active: true,
            created_at: Utc::now(),
        })
        .await
        .unwrap();
}

async fn seed(pool: &PgPool, coverage: rust_decimal::Decimal) -> Seeded {
    let users = UserRepository::new(pool.clone());
    let policies = PolicyRepository::new(pool.clone());

    let hospital_id = HospitalId::new();
    users.insert_hospital(hospital_id.into(), "City General").await.unwrap();

    let holder = ActorFixtures::holder();
    let staff = ActorFixtures::staff_at(hospital_id);
    let officer = ActorFixtures::officer();
    for actor in [holder, staff, officer] {
        seed_user(&users, actor).await;
    }

    let plan = PolicyFixtures::plan_with_coverage(coverage);
    policies.insert_plan(&plan_to_row(&plan)).await.unwrap();
    let policy = Policy::issue(&plan, holder.user_id, test_utils::DateFixtures::policy_start()).unwrap();
    policies.insert(&policy_to_row(&policy)).await.unwrap();

    Seeded {
        policy,
        holder,
        staff,
        officer,
        hospital_id,
    }
}

fn service(pool: &PgPool) -> ClaimLifecycleService {
    let store = Arc::new(PostgresClaimStore::new(pool.clone()));
    ClaimLifecycleService::new(
        store.clone(),
        store,
        Arc::new(PostgresNotificationAdapter::new(pool.clone())),
    )
}

fn request(seeded: &Seeded, amount: rust_decimal::Decimal) -> NewClaimRequest {
    NewClaimRequest {
        policy_id: seeded.policy.id,
        hospital_id: seeded.hospital_id,
        claim_amount: MoneyFixtures::usd(amount),
        description: Some("Emergency admission".to_string()),
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_full_lifecycle_persists() {
    let db = create_isolated_test_database().await.unwrap();
    let seeded = seed(db.pool(), dec!(20000)).await;
    let service = service(db.pool());

    let claim = service.submit(&seeded.holder, request(&seeded, dec!(15000))).await.unwrap();
    service
        .add_medical_notes(claim.id, &seeded.staff, "Surgery performed", Some(ClaimStatus::Submitted))
        .await
        .unwrap();
    let approved = service
        .review(
            claim.id,
            &seeded.officer,
            ReviewDecision::approve(dec!(15000), Currency::USD),
            Some(ClaimStatus::InReview),
        )
        .await
        .unwrap();
    assert_eq!(approved.status, ClaimStatus::Approved);

    let store = PostgresClaimStore::new(db.pool().clone());
    let coverage = store.coverage(seeded.policy.id).await.unwrap();
    assert_eq!(coverage.remaining.amount(), dec!(5000));

    let paid = service.mark_paid(claim.id, &seeded.officer, None).await.unwrap();
    assert_eq!(paid.status, ClaimStatus::Paid);
    assert_eq!(store.load(claim.id).await.unwrap(), paid);

    let summary = ClaimsSummary::from_totals(&store.status_totals().await.unwrap());
    assert_eq!(summary.total_claims, 1);
    assert_eq!(summary.paid, 1);
    assert_eq!(summary.totals_in(Currency::USD).unwrap().paid, dec!(15000));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_insufficient_coverage_leaves_rows_untouched() {
    let db = create_isolated_test_database().await.unwrap();
    let seeded = seed(db.pool(), dec!(5000)).await;
    let service = service(db.pool());

    let claim = service.submit(&seeded.holder, request(&seeded, dec!(10000))).await.unwrap();
    let result = service
        .review(claim.id, &seeded.officer, ReviewDecision::approve(dec!(8000), Currency::USD), None)
        .await;
    assert!(matches!(result, Err(ClaimError::InsufficientCoverage { .. })));

    let store = PostgresClaimStore::new(db.pool().clone());
    assert_eq!(store.load(claim.id).await.unwrap().status, ClaimStatus::Submitted);
    assert_eq!(store.coverage(seeded.policy.id).await.unwrap().remaining.amount(), dec!(5000));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_commit_rejects_stale_status() {
    let db = create_isolated_test_database().await.unwrap();
    let seeded = seed(db.pool(), dec!(20000)).await;
    let service = service(db.pool());
    let store = PostgresClaimStore::new(db.pool().clone());

    let claim = service.submit(&seeded.holder, request(&seeded, dec!(1000))).await.unwrap();
    let mut rejected = claim.clone();
    rejected.reject(seeded.officer.user_id, "Duplicate").unwrap();

    let result = store
        .commit(ClaimTransition {
            claim: rejected,
            expected_status: ClaimStatus::InReview,
            coverage_debit: None,
        })
        .await;
    assert!(result.unwrap_err().is_conflict());
    assert_eq!(store.load(claim.id).await.unwrap().status, ClaimStatus::Submitted);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_list_filters_by_holder() {
    let db = create_isolated_test_database().await.unwrap();
    let seeded = seed(db.pool(), dec!(20000)).await;
    let service = service(db.pool());

    service.submit(&seeded.holder, request(&seeded, dec!(100))).await.unwrap();
    service.submit(&seeded.holder, request(&seeded, dec!(200))).await.unwrap();

    let store = PostgresClaimStore::new(db.pool().clone());
    let own = store.list(&ClaimQuery::for_holder(seeded.holder.user_id)).await.unwrap();
    assert_eq!(own.len(), 2);
    let none = store.list(&ClaimQuery::for_holder(UserId::new())).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_notifications_are_fanned_out_and_polled() {
    let db = create_isolated_test_database().await.unwrap();
    let seeded = seed(db.pool(), dec!(20000)).await;
    let service = service(db.pool());
    let feed = PostgresNotificationAdapter::new(db.pool().clone());

    let claim = service.submit(&seeded.holder, request(&seeded, dec!(700))).await.unwrap();
    service
        .review(claim.id, &seeded.officer, ReviewDecision::reject("Waiting period"), None)
        .await
        .unwrap();

    // Submission reaches officers and staff; the decision reaches holder and staff
    assert_eq!(feed.unread_count(seeded.officer.user_id).await.unwrap(), 1);
    assert_eq!(feed.unread_count(seeded.staff.user_id).await.unwrap(), 2);
    assert_eq!(feed.unread_count(seeded.holder.user_id).await.unwrap(), 1);

    let mut session = NotificationSession::new(seeded.staff.user_id);
    assert_eq!(session.refresh(&feed).await.unwrap(), 2);
    assert_eq!(session.refresh(&feed).await.unwrap(), 0);
    assert_eq!(session.mark_all_read(&feed).await.unwrap(), 2);
    assert_eq!(feed.unread_count(seeded.staff.user_id).await.unwrap(), 0);

    let holder_items = feed.fetch_since(seeded.holder.user_id, None, 10).await.unwrap();
    assert!(holder_items[0].message.contains("Waiting period"));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_health_check_reports_healthy() {
    let db = create_isolated_test_database().await.unwrap();
    let store = PostgresClaimStore::new(db.pool().clone());
    assert!(store.health_check().await.is_ready());
}
