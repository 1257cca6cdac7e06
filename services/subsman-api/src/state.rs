//! Application state for the subscription API service.

use std::sync::Arc;

use subsman_core::{ProductService, SubscriptionService, UserService};
use subsman_db::{
    DbPool, MemoryRepositories, ProductRepository, Repositories, SubscriptionRepository,
    UserRepository,
};

use crate::config::Config;

pub type Users = UserService<dyn UserRepository>;
pub type Products = ProductService<dyn ProductRepository>;
pub type Subscriptions =
    SubscriptionService<dyn SubscriptionRepository, dyn ProductRepository, dyn UserRepository>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<Users>,
    pub products: Arc<Products>,
    pub subscriptions: Arc<Subscriptions>,
    /// Database pool for readiness checks; `None` for the in-memory store
    pub pool: Option<DbPool>,
    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire services over arbitrary repository implementations
    pub fn new(
        users: Arc<dyn UserRepository>,
        products: Arc<dyn ProductRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        pool: Option<DbPool>,
        config: Config,
    ) -> Self {
        Self {
            users: Arc::new(UserService::new(Arc::clone(&users))),
            products: Arc::new(ProductService::new(Arc::clone(&products))),
            subscriptions: Arc::new(SubscriptionService::new(subscriptions, products, users)),
            pool,
            config: Arc::new(config),
        }
    }

    /// State backed by PostgreSQL
    pub fn postgres(repos: Repositories, pool: DbPool, config: Config) -> Self {
        Self::new(
            Arc::new(repos.users),
            Arc::new(repos.products),
            Arc::new(repos.subscriptions),
            Some(pool),
            config,
        )
    }

    /// State backed by the in-memory store
    pub fn in_memory(repos: MemoryRepositories, config: Config) -> Self {
        Self::new(
            Arc::new(repos.users),
            Arc::new(repos.products),
            Arc::new(repos.subscriptions),
            None,
            config,
        )
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
