//! Repositories that always fail, for error propagation tests

use async_trait::async_trait;
use subsman_db::{DbError, DbResult, SubscriptionRepository};
use subsman_types::{ProductId, Subscription, SubscriptionId, SubscriptionView, UserId};

/// Subscription repository whose every call times out
#[derive(Default, Clone)]
#[allow(dead_code)]
pub struct FailingSubscriptionRepository;

#[async_trait]
impl SubscriptionRepository for FailingSubscriptionRepository {
    async fn create(&self, _subscription: Subscription) -> DbResult<Subscription> {
        Err(DbError::Timeout)
    }

    async fn get_by_id(&self, _id: SubscriptionId) -> DbResult<Subscription> {
        Err(DbError::Timeout)
    }

    async fn get_by_user_id(&self, _user_id: UserId) -> DbResult<Vec<SubscriptionView>> {
        Err(DbError::Timeout)
    }

    async fn get_by_product_id(&self, _product_id: ProductId) -> DbResult<Vec<Subscription>> {
        Err(DbError::Timeout)
    }

    async fn get_all(&self) -> DbResult<Vec<SubscriptionView>> {
        Err(DbError::Timeout)
    }

    async fn get_active(&self) -> DbResult<Vec<SubscriptionView>> {
        Err(DbError::Timeout)
    }

    async fn get_expiring(&self, _days: i64) -> DbResult<Vec<SubscriptionView>> {
        Err(DbError::Timeout)
    }

    async fn update(&self, _subscription: &Subscription) -> DbResult<()> {
        Err(DbError::Timeout)
    }

    async fn delete(&self, _id: SubscriptionId) -> DbResult<()> {
        Err(DbError::Timeout)
    }

    async fn count(&self) -> DbResult<i64> {
        Err(DbError::Timeout)
    }

    async fn clear(&self) -> DbResult<u64> {
        Err(DbError::Timeout)
    }
}
