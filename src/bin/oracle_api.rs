//! Risk Oracle API Server
//!
//! REST API for heuristic wallet risk scoring
//!
//! Usage:
//!   cargo run --bin oracle_api
//!
//! Environment:
//!   PORT / ORACLE_PORT    - Server port (default: 3001)
//!   ORACLE_HOST           - Server host (default: 0.0.0.0)
//!   TX_DATA_DIR           - Directory of CSV transaction exports (default: ./data)
//!   TX_SAMPLE_SIZE        - Transactions sampled per wallet (default: 20)
//!   RISK_THRESHOLD        - Non-compliant at or above this score (default: 7)
//!   RATE_LIMIT_PER_MINUTE - Requests per client per minute (default: 100)
//!   RUST_LOG              - Log filter (default: info)

use risk_oracle::api::{
    create_router, handlers::AppState, start_cleanup_task, RateLimitConfig, RateLimiter,
};
use risk_oracle::utils::constants::{APP_NAME, APP_VERSION};
use risk_oracle::{
    CsvTransactionSource, OracleConfig, RiskOracle, ServerConfig, TelemetryCollector,
};

use dotenv::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv().ok();

    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    print_banner();

    let oracle_config = OracleConfig::from_env()?;
    let server_config = ServerConfig::from_env()?;
    oracle_config.log_summary();

    if !oracle_config.data_dir.is_dir() {
        warn!(
            data_dir = %oracle_config.data_dir.display(),
            "Data directory not found, wallet lookups will fail until it exists"
        );
    }

    // Initialize telemetry
    let telemetry = Arc::new(TelemetryCollector::new());
    let telemetry_for_shutdown = telemetry.clone();

    let source = Arc::new(CsvTransactionSource::new(oracle_config.data_dir.clone()));
    let oracle = Arc::new(RiskOracle::new(&oracle_config, source, telemetry));

    // Start background cleanup task for rate limiter
    let rate_limiter = Arc::new(RateLimiter::new(RateLimitConfig::per_minute(
        server_config.rate_limit_per_minute,
    )));
    start_cleanup_task(rate_limiter.clone());

    // Create app state and router
    let state = Arc::new(AppState::new(oracle, rate_limiter));
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", server_config.host, server_config.port).parse()?;

    info!("{} API starting on http://{}", APP_NAME, addr);
    info!("Endpoints:");
    info!("  GET  /v1/risk/:wallet             - Score a wallet");
    info!("  POST /v1/risk                     - Score a wallet (JSON body)");
    info!("  GET  /v1/risk/:wallet/explain     - Score with aggregates and breakdown");
    info!("  GET  /v1/risk/:wallet/update-msg  - Registry update message");
    info!("  POST /v1/risk/evaluate            - Score supplied transactions");
    info!("  POST /v1/risk/batch               - Batch scoring (up to 100 wallets)");
    info!("  GET  /v1/stats                    - Scoring statistics");
    info!("  GET  /v1/health                   - Health check");
    info!("Press Ctrl+C for graceful shutdown");

    // Start server with graceful shutdown
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown signal received, final telemetry:");
    let stats = telemetry_for_shutdown.get_stats();
    info!("   Wallets scored: {}", stats.total_scored);
    info!(
        "   Non-compliant:  {} ({:.1}%)",
        stats.total_non_compliant,
        stats.non_compliant_rate()
    );
    info!("   Failures:       {}", stats.total_failures);
    info!("   Avg latency:    {:.2}ms", stats.avg_latency_ms);
    info!("{} API shutdown complete", APP_NAME);

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
}

fn print_banner() {
    println!(
        r#"
    +--------------------------------------------------------------+
    |                                                              |
    |                R I S K   O R A C L E                         |
    |                                                              |
    |          Wallet risk scoring API  v{:<10}                |
    |      volume / size / counterparties / velocity               |
    |                                                              |
    +--------------------------------------------------------------+
    "#,
        APP_VERSION
    );
}
