//! Subscription query shapes shared by every storage backend

use chrono::{DateTime, TimeDelta, Utc};
use subsman_types::{Subscription, SubscriptionStatus, UserId};

/// Predicate applied to subscriptions before they are joined with products
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionFilter {
    /// Every subscription
    All,
    /// Subscriptions owned by one user
    User(UserId),
    /// Subscriptions with active status
    Active,
    /// Active subscriptions with `next_billing <= threshold`
    DueBy(DateTime<Utc>),
}

impl SubscriptionFilter {
    /// Filter for subscriptions billed within `days` days of `now`
    pub fn expiring(days: i64, now: DateTime<Utc>) -> Self {
        Self::DueBy(expiry_threshold(now, days))
    }

    pub fn matches(&self, subscription: &Subscription) -> bool {
        match self {
            Self::All => true,
            Self::User(user_id) => subscription.user_id == *user_id,
            Self::Active => subscription.status == SubscriptionStatus::Active,
            Self::DueBy(threshold) => {
                subscription.status == SubscriptionStatus::Active
                    && subscription.next_billing <= *threshold
            }
        }
    }
}

/// `now + days`, saturating at the representable range
pub fn expiry_threshold(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    let saturated = if days < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    };
    TimeDelta::try_days(days)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(saturated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use subsman_types::ProductId;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn sub_billing_at(next_billing: DateTime<Utc>) -> Subscription {
        let mut sub = Subscription::new(UserId::new(), ProductId::new(), 1.0, now());
        sub.next_billing = next_billing;
        sub
    }

    #[test]
    fn test_expiring_zero_days_means_due_now() {
        let filter = SubscriptionFilter::expiring(0, now());
        assert!(filter.matches(&sub_billing_at(now())));
        assert!(filter.matches(&sub_billing_at(now() - TimeDelta::days(1))));
        assert!(!filter.matches(&sub_billing_at(now() + TimeDelta::seconds(1))));
    }

    #[test]
    fn test_expiring_ignores_non_active() {
        let filter = SubscriptionFilter::expiring(30, now());
        let mut sub = sub_billing_at(now());
        sub.cancel_at(now());
        assert!(!filter.matches(&sub));
    }

    #[test]
    fn test_negative_days_moves_threshold_back() {
        let filter = SubscriptionFilter::expiring(-2, now());
        assert!(!filter.matches(&sub_billing_at(now() - TimeDelta::days(1))));
        assert!(filter.matches(&sub_billing_at(now() - TimeDelta::days(3))));
    }

    #[test]
    fn test_threshold_saturates() {
        assert_eq!(expiry_threshold(now(), i64::MAX), DateTime::<Utc>::MAX_UTC);
        assert_eq!(expiry_threshold(now(), i64::MIN), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_user_filter() {
        let sub = sub_billing_at(now());
        assert!(SubscriptionFilter::User(sub.user_id).matches(&sub));
        assert!(!SubscriptionFilter::User(UserId::new()).matches(&sub));
    }
}
