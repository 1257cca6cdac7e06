//! Subscription use cases

use std::sync::Arc;

use chrono::{DateTime, Utc};
use subsman_db::{ProductRepository, SubscriptionRepository, UserRepository};
use subsman_types::{
    ProductId, Subscription, SubscriptionId, SubscriptionView, UserId,
};

use crate::error::{ServiceError, ServiceResult};

/// Result of a renewal request
#[derive(Debug, Clone)]
pub struct Renewal {
    /// Subscription as stored after the call
    pub subscription: Subscription,
    /// `false` when the subscription was not active and nothing changed
    pub renewed: bool,
}

/// Subscription lifecycle and billing queries
pub struct SubscriptionService<S, P, U>
where
    S: SubscriptionRepository + ?Sized,
    P: ProductRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    subscriptions: Arc<S>,
    products: Arc<P>,
    users: Arc<U>,
}

impl<S, P, U> SubscriptionService<S, P, U>
where
    S: SubscriptionRepository + ?Sized,
    P: ProductRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    /// Create a new subscription service
    pub fn new(subscriptions: Arc<S>, products: Arc<P>, users: Arc<U>) -> Self {
        Self {
            subscriptions,
            products,
            users,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn list_subscriptions(&self) -> ServiceResult<Vec<SubscriptionView>> {
        Ok(self.subscriptions.get_all().await?)
    }

    pub async fn list_user_subscriptions(
        &self,
        user_id: UserId,
    ) -> ServiceResult<Vec<SubscriptionView>> {
        Ok(self.subscriptions.get_by_user_id(user_id).await?)
    }

    pub async fn list_active_subscriptions(&self) -> ServiceResult<Vec<SubscriptionView>> {
        Ok(self.subscriptions.get_active().await?)
    }

    /// Active subscriptions whose next billing falls within `days` days.
    /// Negative windows are rejected.
    pub async fn list_expiring_subscriptions(
        &self,
        days: i64,
    ) -> ServiceResult<Vec<SubscriptionView>> {
        if days < 0 {
            return Err(ServiceError::Validation(format!(
                "days must not be negative, got {days}"
            )));
        }
        Ok(self.subscriptions.get_expiring(days).await?)
    }

    /// Raw subscriptions for one product, including those of inactive products
    pub async fn list_product_subscriptions(
        &self,
        product_id: ProductId,
    ) -> ServiceResult<Vec<Subscription>> {
        Ok(self.subscriptions.get_by_product_id(product_id).await?)
    }

    pub async fn get_subscription(&self, id: SubscriptionId) -> ServiceResult<Subscription> {
        self.subscriptions
            .get_by_id(id)
            .await
            .map_err(|e| ServiceError::from_db("subscription", e))
    }

    pub async fn count_subscriptions(&self) -> ServiceResult<i64> {
        Ok(self.subscriptions.count().await?)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Subscribe a user to a product.
    ///
    /// The user must exist and be active, the product must exist and be
    /// active. The product's current price is snapshotted; billing starts one
    /// month after `start_date` (defaults to now).
    pub async fn create_subscription(
        &self,
        user_id: UserId,
        product_id: ProductId,
        start_date: Option<DateTime<Utc>>,
    ) -> ServiceResult<Subscription> {
        let user = self
            .users
            .get_by_id(user_id)
            .await
            .map_err(|e| ServiceError::from_db("user", e))?;
        if !user.is_active() {
            return Err(ServiceError::Validation("user account is inactive".to_string()));
        }

        let product = self
            .products
            .get_by_id(product_id)
            .await
            .map_err(|e| ServiceError::from_db("product", e))?;
        if !product.is_active() {
            return Err(ServiceError::Validation(format!(
                "product {} is not available",
                product.name
            )));
        }

        let subscription = Subscription::for_product(
            user.id,
            &product,
            start_date.unwrap_or_else(Utc::now),
        );
        let subscription = self.subscriptions.create(subscription).await?;

        tracing::info!(
            subscription_id = %subscription.id,
            user_id = %user_id,
            product = %product.name,
            price = subscription.price_at_start,
            "Subscription created"
        );
        Ok(subscription)
    }

    /// Cancel a subscription. Cancelling twice re-stamps the end date.
    pub async fn cancel_subscription(&self, id: SubscriptionId) -> ServiceResult<Subscription> {
        let mut subscription = self.get_subscription(id).await?;

        if !subscription.cancel() {
            return Err(ServiceError::Validation(
                "expired subscriptions cannot be cancelled".to_string(),
            ));
        }

        self.subscriptions
            .update(&subscription)
            .await
            .map_err(|e| ServiceError::from_db("subscription", e))?;

        tracing::info!(subscription_id = %id, "Subscription cancelled");
        Ok(subscription)
    }

    /// Advance `next_billing` by one month. Cancelled and expired
    /// subscriptions are returned untouched with `renewed: false`.
    pub async fn renew_subscription(&self, id: SubscriptionId) -> ServiceResult<Renewal> {
        let mut subscription = self.get_subscription(id).await?;

        if !subscription.renew() {
            tracing::debug!(
                subscription_id = %id,
                status = %subscription.status,
                "Renewal skipped"
            );
            return Ok(Renewal {
                subscription,
                renewed: false,
            });
        }

        self.subscriptions
            .update(&subscription)
            .await
            .map_err(|e| ServiceError::from_db("subscription", e))?;

        tracing::info!(
            subscription_id = %id,
            next_billing = %subscription.next_billing,
            "Subscription renewed"
        );
        Ok(Renewal {
            subscription,
            renewed: true,
        })
    }

    pub async fn delete_subscription(&self, id: SubscriptionId) -> ServiceResult<()> {
        self.subscriptions
            .delete(id)
            .await
            .map_err(|e| ServiceError::from_db("subscription", e))?;
        tracing::info!(subscription_id = %id, "Subscription deleted");
        Ok(())
    }
}

impl<S, P, U> std::fmt::Debug for SubscriptionService<S, P, U>
where
    S: SubscriptionRepository + ?Sized,
    P: ProductRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionService").finish_non_exhaustive()
    }
}
