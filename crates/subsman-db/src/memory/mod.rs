//! In-memory repository implementations
//!
//! Backed by shared `DashMap` tables. The three repositories created by
//! [`MemoryRepositories::new`] share one set of tables, so subscription views
//! join against the live product table exactly like the SQL backend.
//!
//! Unique keys (user email/username, product name) are checked on write and
//! rejected with [`DbError::Conflict`](crate::DbError::Conflict). The check
//! and the insert are not atomic; concurrent writers can still race.

mod product;
mod subscription;
mod user;

pub use product::MemoryProductRepository;
pub use subscription::MemorySubscriptionRepository;
pub use user::MemoryUserRepository;

use std::sync::Arc;

use dashmap::DashMap;
use subsman_types::{Product, ProductId, Subscription, SubscriptionId, User, UserId};

pub(crate) type Table<K, V> = Arc<DashMap<K, V>>;

/// All in-memory repositories over one shared set of tables
#[derive(Clone)]
pub struct MemoryRepositories {
    pub users: MemoryUserRepository,
    pub products: MemoryProductRepository,
    pub subscriptions: MemorySubscriptionRepository,
}

impl MemoryRepositories {
    pub fn new() -> Self {
        let users: Table<UserId, User> = Arc::default();
        let products: Table<ProductId, Product> = Arc::default();
        let subscriptions: Table<SubscriptionId, Subscription> = Arc::default();

        Self {
            users: MemoryUserRepository::from_table(users),
            products: MemoryProductRepository::from_table(Arc::clone(&products)),
            subscriptions: MemorySubscriptionRepository::from_tables(subscriptions, products),
        }
    }
}

impl Default for MemoryRepositories {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot table values, oldest first
pub(crate) fn sorted_values<K, V, F>(table: &DashMap<K, V>, keep: F) -> Vec<V>
where
    K: Eq + std::hash::Hash + Ord + Copy,
    V: Clone + Created,
    F: Fn(&V) -> bool,
{
    let mut values: Vec<(chrono::DateTime<chrono::Utc>, K, V)> = table
        .iter()
        .filter(|r| keep(r.value()))
        .map(|r| (r.value().created_at(), *r.key(), r.value().clone()))
        .collect();
    values.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
    values.into_iter().map(|(_, _, v)| v).collect()
}

/// Access to a record's creation time, used for ordering
pub(crate) trait Created {
    fn created_at(&self) -> chrono::DateTime<chrono::Utc>;
}

impl Created for User {
    fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }
}

impl Created for Product {
    fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }
}

impl Created for Subscription {
    fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }
}
