//! Subsman API
//!
//! REST surface over the subscription use cases.
//!
//! ## Endpoints
//!
//! - `GET|POST /api/v1/subscriptions` - List joined subscriptions / subscribe
//! - `GET /api/v1/subscriptions/active` - Active subscriptions
//! - `GET /api/v1/subscriptions/expiring?days=N` - Billed within N days (default 7)
//! - `GET|DELETE /api/v1/subscriptions/{id}` - Raw subscription
//! - `POST /api/v1/subscriptions/{id}/cancel` - Cancel
//! - `POST /api/v1/subscriptions/{id}/renew` - Advance billing one month
//! - `GET|POST /api/v1/users`, `GET|DELETE /api/v1/users/{id}`
//! - `POST /api/v1/users/{id}/deactivate`
//! - `GET /api/v1/users/{id}/subscriptions`
//! - `POST /api/v1/auth/login`
//! - `GET|POST /api/v1/products` (`?category=`, `?active=true`)
//! - `GET|DELETE /api/v1/products/{id}`, `POST /api/v1/products/{id}/deactivate`
//! - `GET /api/v1/products/{id}/subscriptions`
//!
//! ## Health Endpoints
//!
//! - `GET /ping` - Compatibility ping
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use config::{Config, ConfigError};
pub use error::{ApiError, ApiResult};
pub use router::build_router;
pub use state::AppState;
