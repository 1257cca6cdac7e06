//! PostgreSQL user repository implementation

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use subsman_types::{User, UserId};

use super::{affected_one, timed, DEFAULT_OPERATION_TIMEOUT};
use crate::error::DbResult;
use crate::models::{convert_all, UserRow};
use crate::repo::UserRepository;

/// PostgreSQL user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Set the per-operation deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn fetch_one_by(&self, sql: &str, value: &str) -> DbResult<User> {
        let row = timed(
            self.timeout,
            sqlx::query_as::<_, UserRow>(sql)
                .bind(value)
                .fetch_one(&self.pool),
        )
        .await?;

        row.try_into()
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User) -> DbResult<User> {
        let row = timed(
            self.timeout,
            sqlx::query_as::<_, UserRow>(
                r#"
                INSERT INTO users (id, username, password, email, status, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, username, password, email, status, created_at, updated_at
                "#,
            )
            .bind(user.id.0)
            .bind(&user.username)
            .bind(&user.password)
            .bind(&user.email)
            .bind(user.status.as_str())
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool),
        )
        .await?;

        row.try_into()
    }

    async fn get_by_id(&self, id: UserId) -> DbResult<User> {
        let row = timed(
            self.timeout,
            sqlx::query_as::<_, UserRow>(
                r#"
                SELECT id, username, password, email, status, created_at, updated_at
                FROM users
                WHERE id = $1
                "#,
            )
            .bind(id.0)
            .fetch_one(&self.pool),
        )
        .await?;

        row.try_into()
    }

    async fn get_by_email(&self, email: &str) -> DbResult<User> {
        self.fetch_one_by(
            r#"
            SELECT id, username, password, email, status, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
            email,
        )
        .await
    }

    async fn get_by_username(&self, username: &str) -> DbResult<User> {
        self.fetch_one_by(
            r#"
            SELECT id, username, password, email, status, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
            username,
        )
        .await
    }

    async fn get_all(&self) -> DbResult<Vec<User>> {
        let rows = timed(
            self.timeout,
            sqlx::query_as::<_, UserRow>(
                r#"
                SELECT id, username, password, email, status, created_at, updated_at
                FROM users
                ORDER BY created_at
                "#,
            )
            .fetch_all(&self.pool),
        )
        .await?;

        convert_all(rows)
    }

    async fn update(&self, user: &User) -> DbResult<()> {
        let result = timed(
            self.timeout,
            sqlx::query(
                r#"
                UPDATE users
                SET username = $2, password = $3, email = $4, status = $5, updated_at = $6
                WHERE id = $1
                "#,
            )
            .bind(user.id.0)
            .bind(&user.username)
            .bind(&user.password)
            .bind(&user.email)
            .bind(user.status.as_str())
            .bind(user.updated_at)
            .execute(&self.pool),
        )
        .await?;

        affected_one(result.rows_affected())
    }

    async fn delete(&self, id: UserId) -> DbResult<()> {
        let result = timed(
            self.timeout,
            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id.0)
                .execute(&self.pool),
        )
        .await?;

        affected_one(result.rows_affected())
    }

    async fn count(&self) -> DbResult<i64> {
        timed(
            self.timeout,
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users").fetch_one(&self.pool),
        )
        .await
    }

    async fn clear(&self) -> DbResult<u64> {
        let result = timed(
            self.timeout,
            sqlx::query("DELETE FROM users").execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected())
    }
}
