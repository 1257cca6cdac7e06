//! Subscription types and lifecycle
//!
//! ```text
//! active ──cancel()──▶ cancelled
//!   │ ▲
//!   └─┘ renew()   (next_billing += 1 month)
//!
//! expired: explicit status, or end_date in the past (derived on read)
//! ```

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::id::define_id;
use crate::{Product, ProductId, StatusParseError, UserId};

define_id!(
    /// Unique subscription identifier
    SubscriptionId
);

/// Subscription status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Subscription is billing normally
    #[default]
    Active,
    /// Subscription was cancelled by the user
    Cancelled,
    /// Subscription was explicitly marked expired
    Expired,
}

impl SubscriptionStatus {
    /// Stored string form
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "cancelled" => Ok(Self::Cancelled),
            "expired" => Ok(Self::Expired),
            _ => Err(StatusParseError::new("subscription", s)),
        }
    }
}

/// Advance a billing instant by one calendar month.
///
/// Month-end dates clamp to the last day of the following month
/// (Jan 31 -> Feb 28/29).
pub fn add_billing_period(at: DateTime<Utc>) -> DateTime<Utc> {
    at.checked_add_months(Months::new(1)).unwrap_or(at)
}

/// A user's subscription to one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub user_id: UserId,
    pub product_id: ProductId,
    #[serde(default)]
    pub status: SubscriptionStatus,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub next_billing: DateTime<Utc>,
    /// Catalog price captured when the subscription was created. Never
    /// touched by any lifecycle method.
    pub price_at_start: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Create an active subscription starting at `start_date`, first billed
    /// one month later.
    pub fn new(
        user_id: UserId,
        product_id: ProductId,
        price_at_start: f64,
        start_date: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: SubscriptionId::new(),
            user_id,
            product_id,
            status: SubscriptionStatus::Active,
            start_date,
            end_date: None,
            next_billing: add_billing_period(start_date),
            price_at_start,
            created_at: now,
            updated_at: now,
        }
    }

    /// Subscribe `user_id` to `product`, snapshotting its current price
    pub fn for_product(user_id: UserId, product: &Product, start_date: DateTime<Utc>) -> Self {
        Self::new(user_id, product.id, product.price, start_date)
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }

    /// Active status and not lapsed past an end date
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Active && !self.is_expired_at(now)
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == SubscriptionStatus::Cancelled
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Explicitly expired, or `end_date` already passed
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Expired || self.end_date.is_some_and(|end| end < now)
    }

    /// Cancel the subscription. Returns `false` if it was explicitly expired.
    pub fn cancel(&mut self) -> bool {
        self.cancel_at(Utc::now())
    }

    /// Cancel as of `now`.
    ///
    /// Repeated calls keep the cancelled status and re-stamp `end_date` and
    /// `updated_at` every time.
    pub fn cancel_at(&mut self, now: DateTime<Utc>) -> bool {
        if self.status == SubscriptionStatus::Expired {
            return false;
        }
        self.status = SubscriptionStatus::Cancelled;
        self.end_date = Some(now);
        self.updated_at = now;
        true
    }

    /// Push `next_billing` one period forward. Returns `false` (and changes
    /// nothing) unless the subscription is active.
    pub fn renew(&mut self) -> bool {
        self.renew_at(Utc::now())
    }

    /// Renew as of `now`.
    ///
    /// The period is always one calendar month, even for yearly products.
    pub fn renew_at(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_active_at(now) {
            return false;
        }
        self.next_billing = add_billing_period(self.next_billing);
        self.updated_at = now;
        true
    }

    pub fn days_until_next_billing(&self) -> i64 {
        self.days_until_next_billing_at(Utc::now())
    }

    /// Whole days until `next_billing`, truncated toward zero. Negative when overdue.
    pub fn days_until_next_billing_at(&self, now: DateTime<Utc>) -> i64 {
        (self.next_billing - now).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn active_sub() -> Subscription {
        Subscription::new(UserId::new(), ProductId::new(), 15.99, at(2024, 1, 10))
    }

    #[test]
    fn test_new_subscription_defaults() {
        let sub = active_sub();
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(sub.next_billing, at(2024, 2, 10));
        assert!(sub.end_date.is_none());
        assert!(sub.is_active_at(at(2024, 1, 11)));
    }

    #[test]
    fn test_for_product_snapshots_price() {
        let product = Product::new("Netflix", "Streaming", 15.99, "monthly", "streaming");
        let sub = Subscription::for_product(UserId::new(), &product, at(2024, 1, 1));
        assert_eq!(sub.price_at_start, 15.99);
        assert_eq!(sub.product_id, product.id);
    }

    #[test]
    fn test_cancel_sets_end_date() {
        let mut sub = active_sub();
        let now = at(2024, 1, 20);
        assert!(sub.cancel_at(now));
        assert!(sub.is_cancelled());
        assert_eq!(sub.end_date, Some(now));
        assert_eq!(sub.updated_at, now);
        assert!(!sub.is_active_at(now));
    }

    #[test]
    fn test_cancel_twice_restamps_timestamps() {
        let mut sub = active_sub();
        let first = at(2024, 1, 20);
        let second = first + Duration::hours(3);

        sub.cancel_at(first);
        sub.cancel_at(second);

        assert!(sub.is_cancelled());
        assert_eq!(sub.end_date, Some(second));
        assert_eq!(sub.updated_at, second);
    }

    #[test]
    fn test_cancel_on_expired_is_noop() {
        let mut sub = active_sub();
        sub.status = SubscriptionStatus::Expired;
        let before = sub.clone();
        assert!(!sub.cancel_at(at(2024, 3, 1)));
        assert_eq!(sub, before);
    }

    #[test]
    fn test_renew_advances_one_month() {
        let mut sub = active_sub();
        let now = at(2024, 2, 9);
        assert!(sub.renew_at(now));
        assert_eq!(sub.next_billing, at(2024, 3, 10));
        assert_eq!(sub.updated_at, now);
    }

    #[test]
    fn test_renew_clamps_month_end() {
        let mut sub = Subscription::new(UserId::new(), ProductId::new(), 1.0, at(2023, 12, 31));
        assert_eq!(sub.next_billing, at(2024, 1, 31));
        sub.renew_at(at(2024, 1, 30));
        assert_eq!(sub.next_billing, at(2024, 2, 29));
    }

    #[test]
    fn test_renew_on_cancelled_or_expired_is_noop() {
        let mut cancelled = active_sub();
        cancelled.cancel_at(at(2024, 1, 15));
        let before = cancelled.clone();
        assert!(!cancelled.renew_at(at(2024, 1, 16)));
        assert_eq!(cancelled, before);

        let mut expired = active_sub();
        expired.status = SubscriptionStatus::Expired;
        let before = expired.clone();
        assert!(!expired.renew_at(at(2024, 1, 16)));
        assert_eq!(expired, before);
    }

    #[test]
    fn test_yearly_product_still_renews_monthly() {
        // Renewal ignores billing type; a yearly product advances one month.
        let product = Product::new("Annual", "", 120.0, "yearly", "music");
        let mut sub = Subscription::for_product(UserId::new(), &product, at(2024, 1, 10));
        sub.renew_at(at(2024, 2, 1));
        assert_eq!(sub.next_billing, at(2024, 3, 10));
    }

    #[test]
    fn test_expiry_is_derived_from_end_date() {
        let mut sub = active_sub();
        let cancelled_at = at(2024, 1, 20);
        sub.cancel_at(cancelled_at);

        assert!(!sub.is_expired_at(cancelled_at));
        assert!(sub.is_expired_at(cancelled_at + Duration::seconds(1)));
        assert_eq!(sub.status, SubscriptionStatus::Cancelled);
    }

    #[test]
    fn test_days_until_next_billing() {
        let sub = active_sub();
        assert_eq!(sub.days_until_next_billing_at(at(2024, 1, 31)), 10);
        assert_eq!(sub.days_until_next_billing_at(at(2024, 2, 10)), 0);
        assert_eq!(sub.days_until_next_billing_at(at(2024, 2, 13)), -3);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            SubscriptionStatus::Active,
            SubscriptionStatus::Cancelled,
            SubscriptionStatus::Expired,
        ] {
            assert_eq!(status.as_str().parse::<SubscriptionStatus>().unwrap(), status);
        }
        assert!("canceled".parse::<SubscriptionStatus>().is_err());
    }
}
