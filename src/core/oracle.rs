//! Risk Oracle
//!
//! Glue between a transaction source and the scorer: validate the wallet,
//! pull a bounded sample, score it, record telemetry. Source failures are
//! passed through untouched; there are no retries and no partial results.

use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::core::risk_score::{normalize_wallet, RiskScorer};
use crate::models::config::OracleConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{OracleUpdate, RiskAssessment, RiskResult, TransactionRecord};
use crate::providers::TransactionSource;
use crate::utils::telemetry::TelemetryCollector;

pub struct RiskOracle {
    source: Arc<dyn TransactionSource>,
    scorer: RiskScorer,
    sample_size: usize,
    telemetry: Arc<TelemetryCollector>,
}

impl RiskOracle {
    pub fn new(
        config: &OracleConfig,
        source: Arc<dyn TransactionSource>,
        telemetry: Arc<TelemetryCollector>,
    ) -> Self {
        Self {
            source,
            scorer: RiskScorer::new(config.scoring),
            sample_size: config.sample_size,
            telemetry,
        }
    }

    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn telemetry(&self) -> &Arc<TelemetryCollector> {
        &self.telemetry
    }

    /// Score a wallet from its most recent transactions
    pub async fn risk_for_wallet(&self, wallet: &str) -> AppResult<RiskResult> {
        self.assess_wallet(wallet).await.map(|a| a.result)
    }

    /// Like [`risk_for_wallet`](Self::risk_for_wallet), keeping aggregates and breakdown
    pub async fn assess_wallet(&self, wallet: &str) -> AppResult<RiskAssessment> {
        let start = Instant::now();
        let wallet = normalize_wallet(wallet)?.to_string();

        let transactions = match self.fetch(&wallet).await {
            Ok(txs) => txs,
            Err(e) => {
                self.telemetry.record_failure();
                warn!(wallet = %wallet, source = self.source.name(), code = e.code_str(), "Transaction source failed: {}", e);
                return Err(e);
            }
        };

        self.assess_transactions(&wallet, &transactions, start)
    }

    /// Score caller-supplied records, bypassing the source
    pub fn evaluate(&self, wallet: &str, transactions: &[TransactionRecord]) -> AppResult<RiskAssessment> {
        self.assess_transactions(wallet, transactions, Instant::now())
    }

    /// Build the registry update message for a wallet's current score
    pub async fn update_message(&self, wallet: &str) -> AppResult<OracleUpdate> {
        let result = self.risk_for_wallet(wallet).await?;
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        Ok(OracleUpdate::from_result(&result, Some(timestamp)))
    }

    fn assess_transactions(
        &self,
        wallet: &str,
        transactions: &[TransactionRecord],
        start: Instant,
    ) -> AppResult<RiskAssessment> {
        let assessment = self.scorer.assess(wallet, transactions)?;
        let result = &assessment.result;

        let latency_ms = start.elapsed().as_millis() as u64;
        self.telemetry
            .record_score(result.risk_score, result.compliant, result.sample_tx_count, latency_ms);

        info!(
            wallet = %result.wallet,
            risk_score = result.risk_score,
            compliant = result.compliant,
            tx_count = result.sample_tx_count,
            latency_ms,
            "Wallet scored"
        );
        Ok(assessment)
    }

    /// Source calls may block on file or database I/O
    async fn fetch(&self, wallet: &str) -> AppResult<Vec<TransactionRecord>> {
        let source = Arc::clone(&self.source);
        let wallet = wallet.to_string();
        let limit = self.sample_size;

        tokio::task::spawn_blocking(move || source.fetch_transactions(&wallet, limit))
            .await
            .map_err(|e| AppError::internal(format!("transaction fetch task failed: {}", e)))?
    }
}
