//! Joined subscription + product read model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Product, ProductId, Subscription, SubscriptionId, SubscriptionStatus, UserId};

/// A subscription flattened together with its product.
///
/// `price` is the product's *current* catalog price, not the subscription's
/// `price_at_start`. Views are computed on every read and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionView {
    pub id: SubscriptionId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub product_name: String,
    pub description: String,
    pub price: f64,
    pub status: SubscriptionStatus,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub next_billing: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl SubscriptionView {
    /// Project a subscription and its joined product into a view row
    pub fn project(subscription: &Subscription, product: &Product) -> Self {
        Self {
            id: subscription.id,
            user_id: subscription.user_id,
            product_id: subscription.product_id,
            product_name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            status: subscription.status,
            start_date: subscription.start_date,
            end_date: subscription.end_date,
            next_billing: subscription.next_billing,
            created_at: subscription.created_at,
        }
    }

    /// Same derivation as [`Subscription::is_expired_at`]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Expired || self.end_date.is_some_and(|end| end < now)
    }
}
