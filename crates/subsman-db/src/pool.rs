//! Database connection pool

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::error::{DbError, DbResult};

/// Database connection pool type alias
pub type DbPool = PgPool;

/// Pool tuning
#[derive(Debug, Clone)]
pub struct PoolOptions {
    /// Maximum open connections
    pub max_connections: u32,
    /// How long to wait for a free connection before failing with a timeout
    pub acquire_timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

/// Create a new database connection pool with default options
pub async fn create_pool(database_url: &str) -> DbResult<DbPool> {
    create_pool_with_options(database_url, PoolOptions::default()).await
}

/// Create a new database connection pool
pub async fn create_pool_with_options(database_url: &str, options: PoolOptions) -> DbResult<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(options.max_connections)
        .acquire_timeout(options.acquire_timeout)
        .connect(database_url)
        .await?;

    tracing::info!(
        max_connections = options.max_connections,
        "Database pool created"
    );
    Ok(pool)
}

/// Apply the embedded schema migrations
pub async fn run_migrations(pool: &DbPool) -> DbResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(DbError::storage)?;

    tracing::info!("Database migrations applied");
    Ok(())
}
