//! Use-case errors

use subsman_db::DbError;
use thiserror::Error;

/// Use-case errors
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Requested entity does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Input violates a domain rule
    #[error("validation failed: {0}")]
    Validation(String),

    /// A unique field is already taken
    #[error("conflict: {0}")]
    Conflict(String),

    /// Email/password pair did not match
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Account exists but is deactivated
    #[error("user account is inactive")]
    InactiveAccount,

    /// Storage failure
    #[error("storage error: {0}")]
    Storage(#[source] DbError),
}

impl ServiceError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::InvalidCredentials => 401,
            Self::InactiveAccount => 403,
            Self::Storage(DbError::Timeout) => 504,
            Self::Storage(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Conflict(_) => "CONFLICT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InactiveAccount => "ACCOUNT_INACTIVE",
            Self::Storage(DbError::Timeout) => "STORAGE_TIMEOUT",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Map a repository error, naming the entity for `NotFound`
    pub(crate) fn from_db(entity: &'static str, err: DbError) -> Self {
        match err {
            DbError::NotFound => Self::NotFound(entity),
            other => other.into(),
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => Self::NotFound("record"),
            DbError::Conflict(constraint) => {
                Self::Conflict(format!("duplicate value violates {constraint}"))
            }
            other => {
                tracing::error!(error = %other, "Storage error");
                Self::Storage(other)
            }
        }
    }
}

/// Result type for use cases
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Turn a lookup result into "does it exist", keeping real failures
pub(crate) fn exists<T>(result: Result<T, DbError>) -> ServiceResult<bool> {
    match result {
        Ok(_) => Ok(true),
        Err(DbError::NotFound) => Ok(false),
        Err(err) => Err(err.into()),
    }
}
