//! Shared handler utilities
//!
//! Response envelope, path parsing, input bounds and metrics helpers used
//! across handlers.

use std::str::FromStr;
use std::time::Instant;

use serde::Serialize;

use crate::error::ApiError;

// ============================================================================
// Response Envelope
// ============================================================================

/// Success body: `{"message": ..., "data": ...}`, plus `count` for lists
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: &'static str,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> ApiResponse<T> {
    pub fn new(message: &'static str, data: T) -> Self {
        Self {
            message,
            data,
            count: None,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn list(message: &'static str, data: Vec<T>) -> Self {
        let count = Some(data.len());
        Self {
            message,
            data,
            count,
        }
    }
}

// ============================================================================
// Input Validation
// ============================================================================

/// Maximum length for user-provided strings
const MAX_STRING_LEN: usize = 256;

/// Parse a path or body identifier, naming the field on failure
pub fn parse_id<T: FromStr>(raw: &str, field: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {field}")))
}

/// Reject empty or oversized strings
pub fn validate_string(value: &str, field_name: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{field_name} cannot be empty")));
    }
    if value.chars().count() > MAX_STRING_LEN {
        return Err(ApiError::BadRequest(format!(
            "{field_name} too long (max {MAX_STRING_LEN} chars)"
        )));
    }
    Ok(())
}

// ============================================================================
// Metrics Helpers
// ============================================================================

/// Record operation duration with result label.
///
/// Labels: operation, result (ok/err)
#[inline]
pub fn record_op_duration(operation: &'static str, start: Instant, success: bool) {
    let result = if success { "ok" } else { "err" };
    metrics::histogram!(
        "subsman_operation_duration_seconds",
        "operation" => operation,
        "result" => result
    )
    .record(start.elapsed().as_secs_f64());
}

// ============================================================================
// Tests
// ============================================================================
