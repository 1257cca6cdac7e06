//! PostgreSQL product repository implementation

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use subsman_types::{Product, ProductId};

use super::{affected_one, timed, DEFAULT_OPERATION_TIMEOUT};
use crate::error::DbResult;
use crate::models::{convert_all, ProductRow};
use crate::repo::ProductRepository;

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, billing_type, category, status, created_at, updated_at";

/// PostgreSQL product repository
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PgProductRepository {
    /// Create a new product repository
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

    async fn fetch_list(&self, where_clause: &str, value: Option<&str>) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products {where_clause} ORDER BY created_at");
        let mut query = sqlx::query_as::<_, ProductRow>(&sql);
        if let Some(value) = value {
            query = query.bind(value);
        }

        let rows = timed(self.timeout, query.fetch_all(&self.pool)).await?;
        convert_all(rows)
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, product: Product) -> DbResult<Product> {
        let sql = format!(
            "INSERT INTO products ({PRODUCT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {PRODUCT_COLUMNS}"
        );
        let row = timed(
            self.timeout,
            sqlx::query_as::<_, ProductRow>(&sql)
                .bind(product.id.0)
                .bind(&product.name)
                .bind(&product.description)
                .bind(product.price)
                .bind(product.billing_type.as_str())
                .bind(&product.category)
                .bind(product.status.as_str())
                .bind(product.created_at)
                .bind(product.updated_at)
                .fetch_one(&self.pool),
        )
        .await?;

        row.try_into()
    }

    async fn get_by_id(&self, id: ProductId) -> DbResult<Product> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let row = timed(
            self.timeout,
            sqlx::query_as::<_, ProductRow>(&sql)
                .bind(id.0)
                .fetch_one(&self.pool),
        )
        .await?;

        row.try_into()
    }

    async fn get_by_name(&self, name: &str) -> DbResult<Product> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE name = $1");
        let row = timed(
            self.timeout,
            sqlx::query_as::<_, ProductRow>(&sql)
                .bind(name)
                .fetch_one(&self.pool),
        )
        .await?;

        row.try_into()
    }

    async fn get_by_category(&self, category: &str) -> DbResult<Vec<Product>> {
        self.fetch_list("WHERE category = $1", Some(category)).await
    }

    async fn get_all(&self) -> DbResult<Vec<Product>> {
        self.fetch_list("", None).await
    }

    async fn get_active(&self) -> DbResult<Vec<Product>> {
        self.fetch_list("WHERE status = 'active'", None).await
    }

    async fn update(&self, product: &Product) -> DbResult<()> {
        let result = timed(
            self.timeout,
            sqlx::query(
                r#"
                UPDATE products
                SET name = $2, description = $3, price = $4, billing_type = $5,
                    category = $6, status = $7, updated_at = $8
                WHERE id = $1
                "#,
            )
            .bind(product.id.0)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.billing_type.as_str())
            .bind(&product.category)
            .bind(product.status.as_str())
            .bind(product.updated_at)
            .execute(&self.pool),
        )
        .await?;

        affected_one(result.rows_affected())
    }

    async fn delete(&self, id: ProductId) -> DbResult<()> {
        let result = timed(
            self.timeout,
            sqlx::query("DELETE FROM products WHERE id = $1")
                .bind(id.0)
                .execute(&self.pool),
        )
        .await?;

        affected_one(result.rows_affected())
    }

    async fn count(&self) -> DbResult<i64> {
        timed(
            self.timeout,
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products").fetch_one(&self.pool),
        )
        .await
    }

    async fn clear(&self) -> DbResult<u64> {
        let result = timed(
            self.timeout,
            sqlx::query("DELETE FROM products").execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected())
    }
}
