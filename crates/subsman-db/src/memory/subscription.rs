//! In-memory subscription repository
//!
//! Evaluates the same filter / inner-join / projection pipeline as the SQL
//! backend, against the shared product table.

use async_trait::async_trait;
use chrono::Utc;
use subsman_types::{
    Product, ProductId, Subscription, SubscriptionId, SubscriptionView, UserId,
};

use super::{sorted_values, Table};
use crate::error::{DbError, DbResult};
use crate::query::SubscriptionFilter;
use crate::repo::SubscriptionRepository;

/// In-memory subscription repository
#[derive(Clone, Default)]
pub struct MemorySubscriptionRepository {
    subscriptions: Table<SubscriptionId, Subscription>,
    products: Table<ProductId, Product>,
}

impl MemorySubscriptionRepository {
    /// Standalone repository with its own (empty) product table.
    ///
    /// Use [`MemoryRepositories::new`](super::MemoryRepositories::new) to get
    /// views joined against a product repository.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_tables(
        subscriptions: Table<SubscriptionId, Subscription>,
        products: Table<ProductId, Product>,
    ) -> Self {
        Self {
            subscriptions,
            products,
        }
    }

    /// Filter, inner-join and project
    fn views(&self, filter: SubscriptionFilter) -> Vec<SubscriptionView> {
        sorted_values(&self.subscriptions, |s| filter.matches(s))
            .into_iter()
            .filter_map(|sub| match self.products.get(&sub.product_id) {
                Some(product) => Some(SubscriptionView::project(&sub, product.value())),
                None => {
                    tracing::debug!(
                        subscription_id = %sub.id,
                        product_id = %sub.product_id,
                        "Dropping subscription with missing product"
                    );
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl SubscriptionRepository for MemorySubscriptionRepository {
    async fn create(&self, subscription: Subscription) -> DbResult<Subscription> {
        if self.subscriptions.contains_key(&subscription.id) {
            return Err(DbError::Conflict("subscriptions_pkey".to_string()));
        }
        self.subscriptions
            .insert(subscription.id, subscription.clone());
        Ok(subscription)
    }

    async fn get_by_id(&self, id: SubscriptionId) -> DbResult<Subscription> {
        self.subscriptions
            .get(&id)
            .map(|r| r.value().clone())
            .ok_or(DbError::NotFound)
    }

    async fn get_by_user_id(&self, user_id: UserId) -> DbResult<Vec<SubscriptionView>> {
        Ok(self.views(SubscriptionFilter::User(user_id)))
    }

    async fn get_by_product_id(&self, product_id: ProductId) -> DbResult<Vec<Subscription>> {
        Ok(sorted_values(&self.subscriptions, |s| {
            s.product_id == product_id
        }))
    }

    async fn get_all(&self) -> DbResult<Vec<SubscriptionView>> {
        Ok(self.views(SubscriptionFilter::All))
    }

    async fn get_active(&self) -> DbResult<Vec<SubscriptionView>> {
        Ok(self.views(SubscriptionFilter::Active))
    }

    async fn get_expiring(&self, days: i64) -> DbResult<Vec<SubscriptionView>> {
        Ok(self.views(SubscriptionFilter::expiring(days, Utc::now())))
    }

    async fn update(&self, subscription: &Subscription) -> DbResult<()> {
        let mut stored = self
            .subscriptions
            .get_mut(&subscription.id)
            .ok_or(DbError::NotFound)?;
        let price_at_start = stored.price_at_start;
        let created_at = stored.created_at;
        *stored = subscription.clone();
        stored.price_at_start = price_at_start;
        stored.created_at = created_at;
        Ok(())
    }

    async fn delete(&self, id: SubscriptionId) -> DbResult<()> {
        self.subscriptions
            .remove(&id)
            .map(|_| ())
            .ok_or(DbError::NotFound)
    }

    async fn count(&self) -> DbResult<i64> {
        Ok(self.subscriptions.len() as i64)
    }

    async fn clear(&self) -> DbResult<u64> {
        let removed = self.subscriptions.len() as u64;
        self.subscriptions.clear();
        Ok(removed)
    }
}
