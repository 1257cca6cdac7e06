//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.
//! Status and billing columns are stored as text and parsed when a row is
//! converted into its domain type.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use subsman_types::{Product, Subscription, SubscriptionView, User};
use uuid::Uuid;

use crate::error::DbError;

/// User row from the database
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub email: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product row from the database
#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub billing_type: String,
    pub category: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Subscription row from the database
#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub status: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub next_billing: DateTime<Utc>,
    pub price_at_start: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Subscription joined with its product
#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionViewRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub description: String,
    pub price: f64,
    pub status: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub next_billing: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            username: row.username,
            password: row.password,
            email: row.email,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            name: row.name,
            description: row.description,
            price: row.price,
            billing_type: row.billing_type.into(),
            category: row.category,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DbError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            user_id: row.user_id.into(),
            product_id: row.product_id.into(),
            status: row.status.parse()?,
            start_date: row.start_date,
            end_date: row.end_date,
            next_billing: row.next_billing,
            price_at_start: row.price_at_start,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<SubscriptionViewRow> for SubscriptionView {
    type Error = DbError;

    fn try_from(row: SubscriptionViewRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            user_id: row.user_id.into(),
            product_id: row.product_id.into(),
            product_name: row.product_name,
            description: row.description,
            price: row.price,
            status: row.status.parse()?,
            start_date: row.start_date,
            end_date: row.end_date,
            next_billing: row.next_billing,
            created_at: row.created_at,
        })
    }
}

/// Convert a batch of rows, failing on the first undecodable one
pub(crate) fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, DbError>
where
    T: TryFrom<R, Error = DbError>,
{
    rows.into_iter().map(T::try_from).collect()
}
