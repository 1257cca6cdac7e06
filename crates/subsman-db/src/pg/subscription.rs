//! PostgreSQL subscription repository implementation
//!
//! Every list query except `get_by_product_id` runs the same
//! `subscriptions INNER JOIN products` projection; only the `WHERE` clause
//! differs per [`SubscriptionFilter`].

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use subsman_types::{ProductId, Subscription, SubscriptionId, SubscriptionView, UserId};

use super::{affected_one, timed, DEFAULT_OPERATION_TIMEOUT};
use crate::error::DbResult;
use crate::models::{convert_all, SubscriptionRow, SubscriptionViewRow};
use crate::query::SubscriptionFilter;
use crate::repo::SubscriptionRepository;

const SUBSCRIPTION_COLUMNS: &str = "id, user_id, product_id, status, start_date, end_date, \
     next_billing, price_at_start, created_at, updated_at";

const VIEW_SELECT: &str = r#"
    SELECT s.id, s.user_id, s.product_id,
           p.name AS product_name, p.description, p.price,
           s.status, s.start_date, s.end_date, s.next_billing, s.created_at
    FROM subscriptions s
    INNER JOIN products p ON p.id = s.product_id
"#;

/// `WHERE` clause for a filter. Placeholders are bound by [`PgSubscriptionRepository::fetch_views`].
fn filter_clause(filter: &SubscriptionFilter) -> &'static str {
    match filter {
        SubscriptionFilter::All => "",
        SubscriptionFilter::User(_) => "WHERE s.user_id = $1",
        SubscriptionFilter::Active => "WHERE s.status = 'active'",
        SubscriptionFilter::DueBy(_) => "WHERE s.status = 'active' AND s.next_billing <= $1",
    }
}

/// PostgreSQL subscription repository
#[derive(Clone)]
pub struct PgSubscriptionRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PgSubscriptionRepository {
    /// Create a new subscription repository
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

    /// Filter, inner-join and project in one statement
    async fn fetch_views(&self, filter: SubscriptionFilter) -> DbResult<Vec<SubscriptionView>> {
        let sql = format!(
            "{VIEW_SELECT} {} ORDER BY s.created_at, s.id",
            filter_clause(&filter)
        );
        let query = sqlx::query_as::<_, SubscriptionViewRow>(&sql);
        let query = match filter {
            SubscriptionFilter::All | SubscriptionFilter::Active => query,
            SubscriptionFilter::User(user_id) => query.bind(user_id.0),
            SubscriptionFilter::DueBy(threshold) => query.bind(threshold),
        };

        let rows = timed(self.timeout, query.fetch_all(&self.pool)).await?;
        tracing::debug!(?filter, rows = rows.len(), "Fetched subscription views");
        convert_all(rows)
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn create(&self, subscription: Subscription) -> DbResult<Subscription> {
        let sql = format!(
            "INSERT INTO subscriptions ({SUBSCRIPTION_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {SUBSCRIPTION_COLUMNS}"
        );
        let row = timed(
            self.timeout,
            sqlx::query_as::<_, SubscriptionRow>(&sql)
                .bind(subscription.id.0)
                .bind(subscription.user_id.0)
                .bind(subscription.product_id.0)
                .bind(subscription.status.as_str())
                .bind(subscription.start_date)
                .bind(subscription.end_date)
                .bind(subscription.next_billing)
                .bind(subscription.price_at_start)
                .bind(subscription.created_at)
                .bind(subscription.updated_at)
                .fetch_one(&self.pool),
        )
        .await?;

        row.try_into()
    }

    async fn get_by_id(&self, id: SubscriptionId) -> DbResult<Subscription> {
        let sql = format!("SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE id = $1");
        let row = timed(
            self.timeout,
            sqlx::query_as::<_, SubscriptionRow>(&sql)
                .bind(id.0)
                .fetch_one(&self.pool),
        )
        .await?;

        row.try_into()
    }

    async fn get_by_user_id(&self, user_id: UserId) -> DbResult<Vec<SubscriptionView>> {
        self.fetch_views(SubscriptionFilter::User(user_id)).await
    }

    async fn get_by_product_id(&self, product_id: ProductId) -> DbResult<Vec<Subscription>> {
        let sql = format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions \
             WHERE product_id = $1 ORDER BY created_at, id"
        );
        let rows = timed(
            self.timeout,
            sqlx::query_as::<_, SubscriptionRow>(&sql)
                .bind(product_id.0)
                .fetch_all(&self.pool),
        )
        .await?;

        convert_all(rows)
    }

    async fn get_all(&self) -> DbResult<Vec<SubscriptionView>> {
        self.fetch_views(SubscriptionFilter::All).await
    }

    async fn get_active(&self) -> DbResult<Vec<SubscriptionView>> {
        self.fetch_views(SubscriptionFilter::Active).await
    }

    async fn get_expiring(&self, days: i64) -> DbResult<Vec<SubscriptionView>> {
        self.fetch_views(SubscriptionFilter::expiring(days, Utc::now()))
            .await
    }

    async fn update(&self, subscription: &Subscription) -> DbResult<()> {
        let result = timed(
            self.timeout,
            sqlx::query(
                r#"
                UPDATE subscriptions
                SET user_id = $2, product_id = $3, status = $4, start_date = $5,
                    end_date = $6, next_billing = $7, updated_at = $8
                WHERE id = $1
                "#,
            )
            .bind(subscription.id.0)
            .bind(subscription.user_id.0)
            .bind(subscription.product_id.0)
            .bind(subscription.status.as_str())
            .bind(subscription.start_date)
            .bind(subscription.end_date)
            .bind(subscription.next_billing)
            .bind(subscription.updated_at)
            .execute(&self.pool),
        )
        .await?;

        affected_one(result.rows_affected())
    }

    async fn delete(&self, id: SubscriptionId) -> DbResult<()> {
        let result = timed(
            self.timeout,
            sqlx::query("DELETE FROM subscriptions WHERE id = $1")
                .bind(id.0)
                .execute(&self.pool),
        )
        .await?;

        affected_one(result.rows_affected())
    }

    async fn count(&self) -> DbResult<i64> {
        timed(
            self.timeout,
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subscriptions")
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn clear(&self) -> DbResult<u64> {
        let result = timed(
            self.timeout,
            sqlx::query("DELETE FROM subscriptions").execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected())
    }
}
