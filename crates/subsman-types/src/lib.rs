//! Subsman Types - Shared domain types
//!
//! This crate contains the subscription domain model used across Subsman crates:
//! - Users and their account status
//! - Catalog products and billing types
//! - Subscriptions, their lifecycle and the joined `SubscriptionView` read model
//!
//! Nothing in here performs I/O. Time-dependent predicates and mutators come in
//! two flavours: a `*_at(now)` variant taking an explicit instant, and a plain
//! variant that reads the wall clock.

mod id;

pub mod error;
pub mod product;
pub mod subscription;
pub mod user;
pub mod view;

pub use error::*;
pub use product::*;
pub use subscription::*;
pub use user::*;
pub use view::*;
