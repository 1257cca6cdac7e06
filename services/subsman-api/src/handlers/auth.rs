//! Login handler

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use subsman_core::ServiceError;
use subsman_types::User;

use super::shared::{record_op_duration, ApiResponse};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/v1/auth/login
///
/// Checks the credential pair and returns the account. No session or token
/// is issued.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let start = Instant::now();
    let result = state.users.authenticate_user(&req.email, &req.password).await;
    record_op_duration("login", start, result.is_ok());

    if let Err(ServiceError::InvalidCredentials | ServiceError::InactiveAccount) = &result {
        metrics::counter!("subsman_login_failures_total").increment(1);
    }

    Ok(Json(ApiResponse::new("Login successful", result?)))
}
