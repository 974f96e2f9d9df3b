//! API Route Configuration

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{self, AppState};
use super::middleware::{logging_middleware, rate_limit_middleware};
use crate::utils::constants::MAX_IN_FLIGHT_REQUESTS;

/// Create the API router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let limiter = state.rate_limiter.clone();

    // API v1 routes
    let api_v1 = Router::new()
        // Health & Status
        .route("/health", get(handlers::health_check))
        .route("/stats", get(handlers::get_stats))
        // Wallet scoring
        .route("/risk", post(handlers::post_risk))
        .route("/risk/evaluate", post(handlers::evaluate))
        .route("/risk/batch", post(handlers::batch_risk))
        .route("/risk/:wallet", get(handlers::get_risk))
        .route("/risk/:wallet/explain", get(handlers::explain_risk))
        .route("/risk/:wallet/update-msg", get(handlers::update_message));

    // Build full router
    Router::new()
        .nest("/v1", api_v1)
        // Unversioned aliases
        .route("/health", get(handlers::health_check))
        .route("/risk", post(handlers::post_risk))
        .route("/risk/:wallet", get(handlers::get_risk))
        .fallback(handlers::not_found)
        .with_state(state)
        // Middleware (order matters - bottom runs first)
        .layer(GlobalConcurrencyLimitLayer::new(MAX_IN_FLIGHT_REQUESTS))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn_with_state(limiter, rate_limit_middleware))
}
