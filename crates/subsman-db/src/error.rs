//! Database errors

use thiserror::Error;

/// Opaque underlying storage failure
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Database errors
///
/// Driver-specific errors never appear in a variant's type; they are either
/// classified (`NotFound`, `Conflict`, `Timeout`) or boxed into `Storage`.
#[derive(Error, Debug)]
pub enum DbError {
    /// Record not found
    #[error("record not found")]
    NotFound,

    /// A unique index rejected the write
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// The storage call exceeded its deadline
    #[error("storage operation timed out")]
    Timeout,

    /// A stored value could not be mapped back to the domain model
    #[error("invalid stored value: {0}")]
    Decode(String),

    /// Any other storage failure
    #[error("storage error: {0}")]
    Storage(#[source] BoxError),
}

/// Database result type
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Wrap an arbitrary storage failure
    pub fn storage(err: impl Into<BoxError>) -> Self {
        Self::Storage(err.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::PoolTimedOut => Self::Timeout,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                Self::Conflict(db.constraint().unwrap_or("unique").to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                Self::Decode(err.to_string())
            }
            other => Self::Storage(Box::new(other)),
        }
    }
}

impl From<subsman_types::StatusParseError> for DbError {
    fn from(err: subsman_types::StatusParseError) -> Self {
        Self::Decode(err.to_string())
    }
}
