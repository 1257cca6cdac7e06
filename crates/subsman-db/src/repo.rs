//! Repository traits
//!
//! Define async repository interfaces for storage operations. Single-entity
//! lookups fail with [`DbError::NotFound`](crate::DbError::NotFound); list
//! operations return an empty `Vec` when nothing matches.
//!
//! Subscription list operations return the joined [`SubscriptionView`]. A
//! subscription whose product no longer exists is left out of every view.
//! Row order is by creation time but callers should not rely on it.

use async_trait::async_trait;
use subsman_types::{
    Product, ProductId, Subscription, SubscriptionId, SubscriptionView, User, UserId,
};

use crate::error::DbResult;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user
    async fn create(&self, user: User) -> DbResult<User>;

    /// Get a user by ID
    async fn get_by_id(&self, id: UserId) -> DbResult<User>;

    /// Get a user by email
    async fn get_by_email(&self, email: &str) -> DbResult<User>;

    /// Get a user by username
    async fn get_by_username(&self, username: &str) -> DbResult<User>;

    /// List all users
    async fn get_all(&self) -> DbResult<Vec<User>>;

    /// Replace every mutable field of an existing user
    async fn update(&self, user: &User) -> DbResult<()>;

    /// Delete a user
    async fn delete(&self, id: UserId) -> DbResult<()>;

    /// Number of stored users
    async fn count(&self) -> DbResult<i64>;

    /// Delete every user, returning how many were removed
    async fn clear(&self) -> DbResult<u64>;
}

/// Product repository trait
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a new product
    async fn create(&self, product: Product) -> DbResult<Product>;

    /// Get a product by ID
    async fn get_by_id(&self, id: ProductId) -> DbResult<Product>;

    /// Get a product by name
    async fn get_by_name(&self, name: &str) -> DbResult<Product>;

    /// List products in a category
    async fn get_by_category(&self, category: &str) -> DbResult<Vec<Product>>;

    /// List all products
    async fn get_all(&self) -> DbResult<Vec<Product>>;

    /// List products with active status
    async fn get_active(&self) -> DbResult<Vec<Product>>;

    /// Replace every mutable field of an existing product
    async fn update(&self, product: &Product) -> DbResult<()>;

    /// Delete a product
    async fn delete(&self, id: ProductId) -> DbResult<()>;

    /// Number of stored products
    async fn count(&self) -> DbResult<i64>;

    /// Delete every product, returning how many were removed
    async fn clear(&self) -> DbResult<u64>;
}

/// Subscription repository trait
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Insert a new subscription
    async fn create(&self, subscription: Subscription) -> DbResult<Subscription>;

    /// Get a raw subscription by ID
    async fn get_by_id(&self, id: SubscriptionId) -> DbResult<Subscription>;

    /// List a user's subscriptions joined with their products
    async fn get_by_user_id(&self, user_id: UserId) -> DbResult<Vec<SubscriptionView>>;

    /// List raw subscriptions for a product (no join)
    async fn get_by_product_id(&self, product_id: ProductId) -> DbResult<Vec<Subscription>>;

    /// List every subscription joined with its product
    async fn get_all(&self) -> DbResult<Vec<SubscriptionView>>;

    /// List active subscriptions joined with their products
    async fn get_active(&self) -> DbResult<Vec<SubscriptionView>>;

    /// List active subscriptions billed within `days` days from now.
    ///
    /// `0` means "due now or overdue". A negative value moves the threshold
    /// into the past.
    async fn get_expiring(&self, days: i64) -> DbResult<Vec<SubscriptionView>>;

    /// Replace every mutable field of an existing subscription.
    ///
    /// `price_at_start` and `created_at` are never rewritten.
    async fn update(&self, subscription: &Subscription) -> DbResult<()>;

    /// Delete a subscription
    async fn delete(&self, id: SubscriptionId) -> DbResult<()>;

    /// Number of stored subscriptions
    async fn count(&self) -> DbResult<i64>;

    /// Delete every subscription, returning how many were removed
    async fn clear(&self) -> DbResult<u64>;
}
