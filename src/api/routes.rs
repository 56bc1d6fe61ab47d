//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::{Subscription, SubscriptionStatus};
use crate::domain::{OperationContext, Product};
use crate::error::{AppError, AppResult};
use crate::handlers::{
    LifecycleAction, ProductHandler, SubscribeCommand, SubscribeHandler, SubscriptionHandler,
};
use crate::state::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub user_id: Uuid,
    pub product_id: Uuid,
    #[serde(default)]
    pub voucher_code: Option<String>,
    #[serde(default)]
    pub trial_period: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubscribeResponse {
    pub subscription_id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ManageSubscriptionRequest {
    pub action: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ManageSubscriptionResponse {
    pub subscription_id: Uuid,
    pub status: SubscriptionStatus,
    pub message: String,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/products", get(get_products))
        .route("/products/:voucher_code", get(get_products_with_voucher))
        .route("/product/subscribe", post(subscribe))
        .route("/product/:product_id", get(get_product))
        // Subscriptions
        .route("/subscription/:subscription_id", get(get_subscription))
        .route("/subscription/:subscription_id/manage", post(manage_subscription))
}

fn parse_id(raw: &str, what: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidRequest(format!("invalid {} id '{}'", what, raw)))
}

// =========================================================================
// GET /products
// =========================================================================

async fn get_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let products = ProductHandler::new(&state).find_products().await?;
    Ok(Json(products))
}

// =========================================================================
// GET /products/:voucher_code
// =========================================================================

/// Catalog priced with a voucher
async fn get_products_with_voucher(
    State(state): State<AppState>,
    Path(voucher_code): Path<String>,
) -> AppResult<Json<Vec<Product>>> {
    let products = ProductHandler::new(&state)
        .find_products_with_voucher(&voucher_code)
        .await?;
    Ok(Json(products))
}

// =========================================================================
// GET /product/:product_id
// =========================================================================

async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> AppResult<Json<Product>> {
    let product_id = parse_id(&product_id, "product")?;
    let product = ProductHandler::new(&state).find_product(product_id).await?;
    Ok(Json(product))
}

// =========================================================================
// POST /product/subscribe
// =========================================================================

async fn subscribe(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<SubscribeRequest>,
) -> AppResult<(StatusCode, Json<SubscribeResponse>)> {
    let mut command =
        SubscribeCommand::new(request.user_id, request.product_id).with_trial(request.trial_period);
    if let Some(code) = request.voucher_code {
        command = command.with_voucher(code);
    }

    let result = SubscribeHandler::new(&state).execute(command, &context).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubscribeResponse {
            subscription_id: result.subscription_id,
            message: "subscription created".to_string(),
        }),
    ))
}

// =========================================================================
// GET /subscription/:subscription_id
// =========================================================================

async fn get_subscription(
    State(state): State<AppState>,
    Path(subscription_id): Path<String>,
) -> AppResult<Json<Subscription>> {
    let subscription_id = parse_id(&subscription_id, "subscription")?;
    let subscription = SubscriptionHandler::new(&state).find(subscription_id).await?;
    Ok(Json(subscription))
}

// =========================================================================
// POST /subscription/:subscription_id/manage
// =========================================================================

/// Pause, unpause or cancel a subscription
async fn manage_subscription(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(subscription_id): Path<String>,
    Json(request): Json<ManageSubscriptionRequest>,
) -> AppResult<Json<ManageSubscriptionResponse>> {
    let subscription_id = parse_id(&subscription_id, "subscription")?;
    let action: LifecycleAction = request.action.parse().map_err(AppError::InvalidRequest)?;

    let subscription = SubscriptionHandler::new(&state)
        .execute(subscription_id, action, &context)
        .await?;

    Ok(Json(ManageSubscriptionResponse {
        subscription_id,
        status: subscription.status(),
        message: format!("subscription {} succeeded", action),
    }))
}
