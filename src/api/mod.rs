//! Risk Oracle HTTP API Module
//! REST API over the wallet risk scorer

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod types;

pub use middleware::{start_cleanup_task, RateLimitConfig, RateLimiter};
pub use routes::create_router;
pub use types::*;
