//! REST API handlers

pub mod auth;
pub mod health;
pub mod product;
pub mod shared;
pub mod subscription;
pub mod user;

pub use auth::*;
pub use health::*;
pub use product::*;
pub use subscription::*;
pub use user::*;
