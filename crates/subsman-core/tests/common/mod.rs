//! Common test utilities for subsman-core integration tests

pub mod failing_repos;

use std::sync::Arc;

use subsman_core::{ProductService, SubscriptionService, UserService};
use subsman_db::memory::{
    MemoryProductRepository, MemorySubscriptionRepository, MemoryUserRepository,
};
use subsman_db::MemoryRepositories;
use subsman_types::{Product, User};

#[allow(unused_imports)]
pub use failing_repos::FailingSubscriptionRepository;

/// All three services wired over one in-memory store
pub struct TestServices {
    pub repos: MemoryRepositories,
    pub users: UserService<MemoryUserRepository>,
    pub products: ProductService<MemoryProductRepository>,
    pub subscriptions: SubscriptionService<
        MemorySubscriptionRepository,
        MemoryProductRepository,
        MemoryUserRepository,
    >,
}

impl TestServices {
    pub fn new() -> Self {
        let repos = MemoryRepositories::new();
        let users = Arc::new(repos.users.clone());
        let products = Arc::new(repos.products.clone());
        let subscriptions = Arc::new(repos.subscriptions.clone());

        Self {
            users: UserService::new(Arc::clone(&users)),
            products: ProductService::new(Arc::clone(&products)),
            subscriptions: SubscriptionService::new(subscriptions, products, users),
            repos,
        }
    }

    /// Register a user named `name` with a derived email
    #[allow(dead_code)]
    pub async fn user(&self, name: &str) -> User {
        self.users
            .create_user(User::new(name, format!("{name}@example.com"), "secret"))
            .await
            .unwrap()
    }

    /// Add a monthly product
    #[allow(dead_code)]
    pub async fn product(&self, name: &str, price: f64) -> Product {
        self.products
            .create_product(Product::new(name, "", price, "monthly", "streaming"))
            .await
            .unwrap()
    }
}
