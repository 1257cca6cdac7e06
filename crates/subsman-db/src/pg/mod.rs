//! PostgreSQL repository implementations

mod product;
mod subscription;
mod user;

pub use product::PgProductRepository;
pub use subscription::PgSubscriptionRepository;
pub use user::PgUserRepository;

use std::future::Future;
use std::time::Duration;

use crate::error::{DbError, DbResult};
use crate::DbPool;

/// Default deadline for a single storage call
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(10);

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub users: PgUserRepository,
    pub products: PgProductRepository,
    pub subscriptions: PgSubscriptionRepository,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self::with_timeout(pool, DEFAULT_OPERATION_TIMEOUT)
    }

    /// Create all repositories with a per-operation deadline
    pub fn with_timeout(pool: DbPool, timeout: Duration) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()).with_timeout(timeout),
            products: PgProductRepository::new(pool.clone()).with_timeout(timeout),
            subscriptions: PgSubscriptionRepository::new(pool).with_timeout(timeout),
        }
    }
}

/// Run a query under a deadline, classifying its error
pub(crate) async fn timed<T, F>(limit: Duration, fut: F) -> DbResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(DbError::from),
        Err(_) => {
            tracing::warn!(timeout_ms = limit.as_millis() as u64, "Storage operation timed out");
            Err(DbError::Timeout)
        }
    }
}

/// Map "no row touched" to `NotFound`
pub(crate) fn affected_one(rows_affected: u64) -> DbResult<()> {
    if rows_affected == 0 {
        Err(DbError::NotFound)
    } else {
        Ok(())
    }
}
