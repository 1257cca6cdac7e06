//! Subscription handlers

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use subsman_types::{ProductId, Subscription, SubscriptionId, SubscriptionView, UserId};

use super::shared::{parse_id, record_op_duration, ApiResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// Default look-ahead for the expiring listing
const DEFAULT_EXPIRING_DAYS: i64 = 7;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub user_id: String,
    pub product_id: String,
    pub start_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ExpiringQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RenewalResponse {
    pub renewed: bool,
    pub subscription: Subscription,
}

type ViewList = Json<ApiResponse<Vec<SubscriptionView>>>;

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/subscriptions
pub async fn list_subscriptions(State(state): State<AppState>) -> ApiResult<ViewList> {
    let start = Instant::now();
    let result = state.subscriptions.list_subscriptions().await;
    record_op_duration("list_subscriptions", start, result.is_ok());

    Ok(Json(ApiResponse::list(
        "Subscriptions retrieved successfully",
        result?,
    )))
}

/// GET /api/v1/subscriptions/active
pub async fn list_active_subscriptions(State(state): State<AppState>) -> ApiResult<ViewList> {
    let start = Instant::now();
    let result = state.subscriptions.list_active_subscriptions().await;
    record_op_duration("list_active_subscriptions", start, result.is_ok());

    Ok(Json(ApiResponse::list(
        "Active subscriptions retrieved successfully",
        result?,
    )))
}

/// GET /api/v1/subscriptions/expiring?days=N
pub async fn list_expiring_subscriptions(
    State(state): State<AppState>,
    Query(query): Query<ExpiringQuery>,
) -> ApiResult<ViewList> {
    let start = Instant::now();
    let days = query.days.unwrap_or(DEFAULT_EXPIRING_DAYS);
    let result = state.subscriptions.list_expiring_subscriptions(days).await;
    record_op_duration("list_expiring_subscriptions", start, result.is_ok());

    Ok(Json(ApiResponse::list(
        "Expiring subscriptions retrieved successfully",
        result?,
    )))
}

/// GET /api/v1/users/{id}/subscriptions
pub async fn list_user_subscriptions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<ViewList> {
    let user_id: UserId = parse_id(&user_id, "user id")?;

    let start = Instant::now();
    let result = state.subscriptions.list_user_subscriptions(user_id).await;
    record_op_duration("list_user_subscriptions", start, result.is_ok());

    Ok(Json(ApiResponse::list(
        "User subscriptions retrieved successfully",
        result?,
    )))
}

/// GET /api/v1/subscriptions/{id}
pub async fn get_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Subscription>>> {
    let id: SubscriptionId = parse_id(&id, "subscription id")?;
    let subscription = state.subscriptions.get_subscription(id).await?;

    Ok(Json(ApiResponse::new(
        "Subscription retrieved successfully",
        subscription,
    )))
}

/// POST /api/v1/subscriptions
pub async fn create_subscription(
    State(state): State<AppState>,
    Json(req): Json<CreateSubscriptionRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Subscription>>)> {
    let user_id: UserId = parse_id(&req.user_id, "user_id")?;
    let product_id: ProductId = parse_id(&req.product_id, "product_id")?;

    let start = Instant::now();
    let result = state
        .subscriptions
        .create_subscription(user_id, product_id, req.start_date)
        .await;
    record_op_duration("create_subscription", start, result.is_ok());
    let subscription = result?;

    metrics::counter!("subsman_subscriptions_created_total").increment(1);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "Subscription created successfully",
            subscription,
        )),
    ))
}

/// POST /api/v1/subscriptions/{id}/cancel
pub async fn cancel_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Subscription>>> {
    let id: SubscriptionId = parse_id(&id, "subscription id")?;

    let start = Instant::now();
    let result = state.subscriptions.cancel_subscription(id).await;
    record_op_duration("cancel_subscription", start, result.is_ok());
    let subscription = result?;

    metrics::counter!("subsman_subscriptions_cancelled_total").increment(1);

    Ok(Json(ApiResponse::new(
        "Subscription cancelled successfully",
        subscription,
    )))
}

/// POST /api/v1/subscriptions/{id}/renew
pub async fn renew_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<RenewalResponse>>> {
    let id: SubscriptionId = parse_id(&id, "subscription id")?;

    let start = Instant::now();
    let result = state.subscriptions.renew_subscription(id).await;
    record_op_duration("renew_subscription", start, result.is_ok());
    let renewal = result?;

    let message = if renewal.renewed {
        metrics::counter!("subsman_subscriptions_renewed_total").increment(1);
        "Subscription renewed successfully"
    } else {
        "Subscription is not active; nothing renewed"
    };

    Ok(Json(ApiResponse::new(
        message,
        RenewalResponse {
            renewed: renewal.renewed,
            subscription: renewal.subscription,
        },
    )))
}

/// DELETE /api/v1/subscriptions/{id}
pub async fn delete_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id: SubscriptionId = parse_id(&id, "subscription id")?;
    state.subscriptions.delete_subscription(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
