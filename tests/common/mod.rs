//! Common test utilities
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use tower::util::ServiceExt;
use uuid::Uuid;

use subscription_service::api;
use subscription_service::domain::{Discount, FixedClock, Money, Product, User, Voucher};
use subscription_service::repository::InMemoryRepository;
use subscription_service::AppState;

pub const JOHN_ID: &str = "b5d2f6ec-5eac-4e62-8ac0-3c45e1b9f3b5";
pub const BASIC_PLAN_ID: &str = "a72d8c5c-cb57-42d2-b3b2-13e9ed06403b";
pub const PREMIUM_PLAN_ID: &str = "ab97234d-6b4a-4a70-823e-68b7a80ef6d4";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn money(value: &str) -> Money {
    value.parse().unwrap()
}

fn product(id: &str, name: &str, duration_days: u32, price: &str, tax: &str, total: &str) -> Product {
    Product {
        id: id.parse().unwrap(),
        name: name.to_string(),
        duration_days,
        price: money(price),
        tax: money(tax),
        total_price: money(total),
    }
}

/// In-memory repository holding the same seed data as the SQL migration
pub fn seeded_repository() -> InMemoryRepository {
    InMemoryRepository::new()
        .with_user(User {
            id: JOHN_ID.parse().unwrap(),
            first_name: "john".to_string(),
            second_name: "doe".to_string(),
            email: "john.doe@example.com".to_string(),
        })
        .with_product(product(BASIC_PLAN_ID, "basic plan", 30, "10.00", "1.00", "11.00"))
        .with_product(product(
            "9b1e0b0b-3c34-4cfa-8f63-5d12b3feff34",
            "standard plan",
            60,
            "15.00",
            "1.50",
            "16.50",
        ))
        .with_product(product(PREMIUM_PLAN_ID, "premium plan", 90, "25.00", "2.50", "27.50"))
        .with_product(product(
            "29fdcb93-b52f-48a9-9e7e-b3e60d63d8a3",
            "enterprise plan",
            365,
            "80.00",
            "8.00",
            "88.00",
        ))
        .with_voucher(Voucher::new("discount10", Discount::Percentage(Decimal::new(10, 2))))
        .with_voucher(Voucher::new("fixed5", Discount::Fixed(money("5.00"))))
        .with_voucher(Voucher::new("summer25", Discount::Percentage(Decimal::new(25, 2))))
        .with_voucher(Voucher::new("fixed100", Discount::Fixed(money("100.00"))))
}

/// Full application over a seeded in-memory store, pinned to `day`
pub fn test_app_on(day: NaiveDate) -> (Router, Arc<InMemoryRepository>) {
    let repo = Arc::new(seeded_repository());
    (app_over(repo.clone(), day), repo)
}

/// Application over an existing store, pinned to `day`
pub fn app_over(repo: Arc<InMemoryRepository>, day: NaiveDate) -> Router {
    let state = AppState::new(repo).with_clock(Arc::new(FixedClock(day)));
    api::build_app(state)
}

pub fn test_app() -> (Router, Arc<InMemoryRepository>) {
    test_app_on(today())
}

/// Send a request and decode the JSON body (`Value::Null` when empty)
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}

/// Setup test database - recreate the schema and seed data
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    pool.execute("DROP TABLE IF EXISTS subscriptions, vouchers, products, users CASCADE")
        .await
        .expect("Failed to clean up DB");
    pool.execute(include_str!("../../migrations/0001_init.sql"))
        .await
        .expect("Failed to run migration");

    pool
}

pub fn parse_uuid(value: &Value) -> Uuid {
    value.as_str().unwrap().parse().unwrap()
}
