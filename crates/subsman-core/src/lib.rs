//! Subsman Core - Subscription use cases
//!
//! Thin orchestration over the repository traits in `subsman-db`:
//! - `UserService`: registration with uniqueness checks, authentication
//! - `ProductService`: catalog management with price validation
//! - `SubscriptionService`: subscribing, cancellation, renewal, billing queries
//!
//! Services hold `Arc`s of repository trait implementations and never cache
//! entities between calls.

pub mod error;
pub mod product;
pub mod subscription;
pub mod user;

pub use error::*;
pub use product::*;
pub use subscription::*;
pub use user::*;
