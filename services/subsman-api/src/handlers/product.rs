//! Product catalog handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use subsman_types::{Product, ProductId, Subscription};

use super::shared::{parse_id, validate_string, ApiResponse};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub billing_type: String,
    pub category: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    #[serde(default)]
    pub active: bool,
}

/// GET /api/v1/products
///
/// `?category=` filters by category, `?active=true` keeps active products only.
/// Both filters combine.
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Product>>>> {
    let mut products = match &query.category {
        Some(category) => state.products.list_products_by_category(category).await?,
        None if query.active => state.products.list_active_products().await?,
        None => state.products.list_products().await?,
    };
    if query.active {
        products.retain(Product::is_active);
    }

    Ok(Json(ApiResponse::list(
        "Products retrieved successfully",
        products,
    )))
}

/// GET /api/v1/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Product>>> {
    let id: ProductId = parse_id(&id, "product id")?;
    let product = state.products.get_product(id).await?;
    Ok(Json(ApiResponse::new("Product retrieved successfully", product)))
}

/// GET /api/v1/products/{id}/subscriptions
pub async fn list_product_subscriptions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<Subscription>>>> {
    let id: ProductId = parse_id(&id, "product id")?;
    let subscriptions = state.subscriptions.list_product_subscriptions(id).await?;
    Ok(Json(ApiResponse::list(
        "Product subscriptions retrieved successfully",
        subscriptions,
    )))
}

/// POST /api/v1/products
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Product>>)> {
    validate_string(&req.name, "name")?;
    validate_string(&req.category, "category")?;
    if req.billing_type.trim().is_empty() {
        return Err(ApiError::BadRequest("billing_type cannot be empty".into()));
    }

    let product = Product::new(
        req.name,
        req.description,
        req.price,
        req.billing_type,
        req.category,
    );
    let product = state.products.create_product(product).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Product created successfully", product)),
    ))
}

/// POST /api/v1/products/{id}/deactivate
pub async fn deactivate_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Product>>> {
    let id: ProductId = parse_id(&id, "product id")?;
    let product = state.products.deactivate_product(id).await?;
    Ok(Json(ApiResponse::new(
        "Product deactivated successfully",
        product,
    )))
}

/// DELETE /api/v1/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id: ProductId = parse_id(&id, "product id")?;
    state.products.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
