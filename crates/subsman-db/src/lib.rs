//! Subsman DB - Storage abstractions
//!
//! Repository traits for users, products and subscriptions, with two
//! implementations: PostgreSQL via SQLx, and an in-memory store used by tests
//! and local tooling. Both evaluate subscription reads through the same
//! [`SubscriptionFilter`] and project rows with
//! [`SubscriptionView::project`](subsman_types::SubscriptionView::project).
//!
//! # Example
//!
//! ```rust,ignore
//! use subsman_db::{create_pool, run_migrations, Repositories, SubscriptionRepository};
//!
//! let pool = create_pool("postgres://localhost/subs-db").await?;
//! run_migrations(&pool).await?;
//! let repos = Repositories::new(pool);
//!
//! let due = repos.subscriptions.get_expiring(7).await?;
//! ```

pub mod error;
pub mod memory;
pub mod models;
pub mod pg;
pub mod pool;
pub mod query;
pub mod repo;
pub mod seed;

pub use error::{DbError, DbResult};
pub use memory::MemoryRepositories;
pub use pg::Repositories;
pub use pool::{create_pool, create_pool_with_options, run_migrations, DbPool, PoolOptions};
pub use query::SubscriptionFilter;
pub use repo::*;
