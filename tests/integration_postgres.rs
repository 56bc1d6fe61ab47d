//! PostgreSQL repository tests
//!
//! These tests require a database connection.
//! Run with: cargo test --test integration_postgres -- --ignored --test-threads=1

use chrono::Days;
use uuid::Uuid;

use subscription_service::aggregate::SubscriptionStatus;
use subscription_service::handlers::{SubscribeCommand, SubscribeHandler, SubscriptionHandler};
use subscription_service::repository::{Entity, PgRepository, Repository, RepositoryError};
use subscription_service::domain::{Discount, FixedClock, OperationContext};
use subscription_service::{AppError, AppState};

mod common;

use common::{today, BASIC_PLAN_ID, JOHN_ID, PREMIUM_PLAN_ID};

async fn state() -> (AppState, PgRepository) {
    let repo = PgRepository::new(common::setup_test_db().await);
    let state = AppState::new(std::sync::Arc::new(repo.clone()))
        .with_clock(std::sync::Arc::new(FixedClock(today())));
    (state, repo)
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_seed_catalog() {
    let (_, repo) = state().await;

    let products = repo.get_products().await.unwrap();
    assert_eq!(products.len(), 4);
    let durations: Vec<u32> = products.iter().map(|p| p.duration_days).collect();
    assert_eq!(durations, vec![30, 60, 90, 365]);

    let premium = repo.get_product(PREMIUM_PLAN_ID.parse().unwrap()).await.unwrap();
    assert_eq!(premium.duration_days, 90);
    assert_eq!(premium.total_price.to_string(), "27.50");

    let voucher = repo.get_voucher_by_code("summer25").await.unwrap();
    assert!(matches!(voucher.discount, Discount::Percentage(_)));

    let voucher = repo.get_voucher_by_code("fixed5").await.unwrap();
    assert!(matches!(voucher.discount, Discount::Fixed(amount) if amount.to_string() == "5.00"));

    let err = repo.get_voucher_by_code("missing").await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { entity: Entity::Voucher, .. }));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_subscription_roundtrip_and_lifecycle() {
    let (state, repo) = state().await;
    let ctx = OperationContext::new();

    let command = SubscribeCommand::new(JOHN_ID.parse().unwrap(), BASIC_PLAN_ID.parse().unwrap())
        .with_voucher("discount10")
        .with_trial(true);
    let result = SubscribeHandler::new(&state).execute(command, &ctx).await.unwrap();

    let stored = repo.get_subscription(result.subscription_id).await.unwrap();
    assert_eq!(stored.price().to_string(), "9.00");
    assert_eq!(stored.tax().to_string(), "0.90");
    assert_eq!(stored.total_price().to_string(), "9.90");
    assert_eq!(stored.trial_end_date(), Some(today() + Days::new(30)));
    assert_eq!(stored.version(), 0);

    let canceled = SubscriptionHandler::new(&state)
        .cancel(result.subscription_id, &ctx)
        .await
        .unwrap();
    assert_eq!(canceled.status(), SubscriptionStatus::Canceled);

    let stored = repo.get_subscription(result.subscription_id).await.unwrap();
    assert_eq!(stored, canceled);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_stale_update_conflicts() {
    let (state, repo) = state().await;
    let ctx = OperationContext::new();

    let command = SubscribeCommand::new(JOHN_ID.parse().unwrap(), BASIC_PLAN_ID.parse().unwrap());
    let id = SubscribeHandler::new(&state)
        .execute(command, &ctx)
        .await
        .unwrap()
        .subscription_id;

    let mut stale = repo.get_subscription(id).await.unwrap();
    SubscriptionHandler::new(&state).pause(id, &ctx).await.unwrap();

    stale.cancel(today()).unwrap();
    let err = repo.update_subscription(&stale).await.unwrap_err();
    assert!(matches!(err, RepositoryError::VersionConflict { expected: 0, .. }));

    let err = SubscriptionHandler::new(&state).find(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { entity: Entity::Subscription, .. }));
}
