//! User handlers

use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use subsman_types::{User, UserId};

use super::shared::{parse_id, record_op_duration, validate_string, ApiResponse};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// GET /api/v1/users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<Vec<User>>>> {
    let users = state.users.list_users().await?;
    Ok(Json(ApiResponse::list("Users retrieved successfully", users)))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let id: UserId = parse_id(&id, "user id")?;
    let user = state.users.get_user(id).await?;
    Ok(Json(ApiResponse::new("User retrieved successfully", user)))
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<User>>)> {
    validate_string(&req.username, "username")?;
    validate_string(&req.password, "password")?;

    let start = Instant::now();
    let result = state
        .users
        .create_user(User::new(req.username, req.email, req.password))
        .await;
    record_op_duration("create_user", start, result.is_ok());

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("User created successfully", result?)),
    ))
}

/// POST /api/v1/users/{id}/deactivate
pub async fn deactivate_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let id: UserId = parse_id(&id, "user id")?;
    let user = state.users.deactivate_user(id).await?;
    Ok(Json(ApiResponse::new("User deactivated successfully", user)))
}

/// DELETE /api/v1/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id: UserId = parse_id(&id, "user id")?;
    state.users.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
