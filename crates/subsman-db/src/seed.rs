//! Sample data and idempotent database seeding
//!
//! [`Seeder::initialize`] fills each table only if it is empty.
//! [`Seeder::clean`] wipes subscriptions, users and products (in that order)
//! and then seeds unconditionally.

use std::sync::Arc;

use chrono::{DateTime, Months, Utc};
use subsman_types::{Product, ProductId, Subscription, User, UserId};

use crate::error::DbResult;
use crate::repo::{ProductRepository, SubscriptionRepository, UserRepository};

/// Catalog used for demo databases
pub fn sample_products(now: DateTime<Utc>) -> Vec<Product> {
    [
        ("Netflix", "Streaming service with movies and TV shows", 15.99, "streaming"),
        ("Spotify", "Music streaming platform", 9.99, "music"),
        ("Disney+", "Disney streaming platform", 7.99, "streaming"),
        ("Amazon Prime", "Amazon Prime membership", 12.99, "shopping"),
        ("YouTube Premium", "Ad-free YouTube experience", 11.99, "streaming"),
    ]
    .into_iter()
    .map(|(name, description, price, category)| {
        let mut product = Product::new(name, description, price, "monthly", category);
        product.created_at = now;
        product.updated_at = now;
        product
    })
    .collect()
}

/// Demo accounts. Passwords are stored as given.
pub fn sample_users(now: DateTime<Utc>) -> Vec<User> {
    [
        ("admin", "admin123", "admin@example.com"),
        ("john_doe", "password123", "john@example.com"),
        ("jane_smith", "password456", "jane@example.com"),
    ]
    .into_iter()
    .map(|(username, password, email)| {
        let mut user = User::new(username, email, password);
        user.created_at = now;
        user.updated_at = now;
        user
    })
    .collect()
}

/// Demo subscriptions for ids returned by seeding [`sample_users`] and
/// [`sample_products`], in that order.
///
/// - john_doe → Netflix, started 2 months ago
/// - john_doe → Spotify, started 1 month ago
/// - jane_smith → Netflix, started 3 months ago
///
/// All three bill again one month from `now`. Returns an empty list when
/// fewer than 3 users or 2 products are given.
pub fn sample_subscriptions(
    now: DateTime<Utc>,
    user_ids: &[UserId],
    product_ids: &[ProductId],
) -> Vec<Subscription> {
    let (Some(&john), Some(&jane)) = (user_ids.get(1), user_ids.get(2)) else {
        return Vec::new();
    };
    let (Some(&netflix), Some(&spotify)) = (product_ids.first(), product_ids.get(1)) else {
        return Vec::new();
    };

    let months_ago = |n: u32| now.checked_sub_months(Months::new(n)).unwrap_or(now);
    let next_billing = now.checked_add_months(Months::new(1)).unwrap_or(now);

    [
        (john, netflix, 2, 15.99),
        (john, spotify, 1, 9.99),
        (jane, netflix, 3, 15.99),
    ]
    .into_iter()
    .map(|(user_id, product_id, age_months, price)| {
        let started = months_ago(age_months);
        let mut sub = Subscription::new(user_id, product_id, price, started);
        sub.next_billing = next_billing;
        sub.created_at = started;
        sub.updated_at = now;
        sub
    })
    .collect()
}

/// What happened to one table during seeding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Records were inserted
    Inserted(usize),
    /// Table already had records and was left alone
    Skipped { existing: i64 },
    /// Nothing to link subscriptions to in this run
    MissingDependencies,
}

impl std::fmt::Display for SeedOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inserted(count) => write!(f, "inserted {count}"),
            Self::Skipped { existing } => write!(f, "skipped ({existing} existing)"),
            Self::MissingDependencies => write!(f, "skipped (no new users or products)"),
        }
    }
}

/// Per-table seeding result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub products: SeedOutcome,
    pub users: SeedOutcome,
    pub subscriptions: SeedOutcome,
}

/// Records removed by [`Seeder::clean`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearReport {
    pub subscriptions: u64,
    pub users: u64,
    pub products: u64,
}

/// Populates repositories with the sample data set
pub struct Seeder<U, P, S> {
    users: Arc<U>,
    products: Arc<P>,
    subscriptions: Arc<S>,
}

impl<U, P, S> Seeder<U, P, S>
where
    U: UserRepository,
    P: ProductRepository,
    S: SubscriptionRepository,
{
    /// Create a new seeder
    pub fn new(users: Arc<U>, products: Arc<P>, subscriptions: Arc<S>) -> Self {
        Self {
            users,
            products,
            subscriptions,
        }
    }

    /// Seed every empty table; tables holding at least one record are skipped
    pub async fn initialize(&self) -> DbResult<SeedReport> {
        let now = Utc::now();

        let (products, product_ids) = match self.products.count().await? {
            0 => self.insert_products(now).await?,
            existing => {
                tracing::warn!(existing, "Products table not empty, skipping");
                (SeedOutcome::Skipped { existing }, Vec::new())
            }
        };

        let (users, user_ids) = match self.users.count().await? {
            0 => self.insert_users(now).await?,
            existing => {
                tracing::warn!(existing, "Users table not empty, skipping");
                (SeedOutcome::Skipped { existing }, Vec::new())
            }
        };

        let subscriptions = match self.subscriptions.count().await? {
            0 => self.insert_subscriptions(now, &user_ids, &product_ids).await?,
            existing => {
                tracing::warn!(existing, "Subscriptions table not empty, skipping");
                SeedOutcome::Skipped { existing }
            }
        };

        let report = SeedReport {
            products,
            users,
            subscriptions,
        };
        tracing::info!(?report, "Database initialized");
        Ok(report)
    }

    /// Remove all records, then seed unconditionally
    pub async fn clean(&self) -> DbResult<(ClearReport, SeedReport)> {
        let cleared = ClearReport {
            subscriptions: self.subscriptions.clear().await?,
            users: self.users.clear().await?,
            products: self.products.clear().await?,
        };
        tracing::info!(?cleared, "Database cleared");

        let now = Utc::now();
        let (products, product_ids) = self.insert_products(now).await?;
        let (users, user_ids) = self.insert_users(now).await?;
        let subscriptions = self
            .insert_subscriptions(now, &user_ids, &product_ids)
            .await?;

        let report = SeedReport {
            products,
            users,
            subscriptions,
        };
        tracing::info!(?report, "Database reset to sample data");
        Ok((cleared, report))
    }

    async fn insert_products(&self, now: DateTime<Utc>) -> DbResult<(SeedOutcome, Vec<ProductId>)> {
        let mut ids = Vec::new();
        for product in sample_products(now) {
            ids.push(self.products.create(product).await?.id);
        }
        tracing::info!(count = ids.len(), "Seeded products");
        Ok((SeedOutcome::Inserted(ids.len()), ids))
    }

    async fn insert_users(&self, now: DateTime<Utc>) -> DbResult<(SeedOutcome, Vec<UserId>)> {
        let mut ids = Vec::new();
        for user in sample_users(now) {
            ids.push(self.users.create(user).await?.id);
        }
        tracing::info!(count = ids.len(), "Seeded users");
        Ok((SeedOutcome::Inserted(ids.len()), ids))
    }

    async fn insert_subscriptions(
        &self,
        now: DateTime<Utc>,
        user_ids: &[UserId],
        product_ids: &[ProductId],
    ) -> DbResult<SeedOutcome> {
        let samples = sample_subscriptions(now, user_ids, product_ids);
        if samples.is_empty() {
            tracing::warn!("No freshly seeded users or products, skipping subscriptions");
            return Ok(SeedOutcome::MissingDependencies);
        }

        let count = samples.len();
        for subscription in samples {
            self.subscriptions.create(subscription).await?;
        }
        tracing::info!(count, "Seeded subscriptions");
        Ok(SeedOutcome::Inserted(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_sizes() {
        let now = Utc::now();
        assert_eq!(sample_products(now).len(), 5);
        assert_eq!(sample_users(now).len(), 3);
    }

    #[test]
    fn test_sample_subscriptions_need_enough_ids() {
        let now = Utc::now();
        let users: Vec<UserId> = (0..3).map(|_| UserId::new()).collect();
        let products: Vec<ProductId> = (0..5).map(|_| ProductId::new()).collect();

        assert!(sample_subscriptions(now, &users[..2], &products).is_empty());
        assert!(sample_subscriptions(now, &users, &products[..1]).is_empty());

        let subs = sample_subscriptions(now, &users, &products);
        assert_eq!(subs.len(), 3);
        assert_eq!(subs[0].user_id, users[1]);
        assert_eq!(subs[0].product_id, products[0]);
        assert_eq!(subs[1].product_id, products[1]);
        assert_eq!(subs[2].user_id, users[2]);
        assert!(subs.iter().all(|s| s.next_billing > now));
    }
}
