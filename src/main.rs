//! Risk Oracle - one-shot wallet scoring
//!
//! Usage:
//!   risk_oracle <wallet>
//!
//! Scores the wallet against the CSV exports in `TX_DATA_DIR` and prints the
//! result as JSON on stdout. Logs go to stderr.

use risk_oracle::{CsvTransactionSource, OracleConfig, RiskOracle, TelemetryCollector};

use dotenv::dotenv;
use eyre::Result;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let wallet = match std::env::args().nth(1) {
        Some(wallet) => wallet,
        None => {
            eprintln!("Usage: risk_oracle <wallet>");
            std::process::exit(2);
        }
    };

    let config = OracleConfig::from_env()?;
    config.log_summary();

    let source = Arc::new(CsvTransactionSource::new(config.data_dir.clone()));
    let oracle = RiskOracle::new(&config, source, Arc::new(TelemetryCollector::new()));

    let result = oracle.risk_for_wallet(&wallet).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
