//! Risk Oracle Library
//!
//! Heuristic wallet risk scoring over a bounded sample of recent
//! transactions. Produces a 1-10 score, a compliance verdict and the
//! reasons behind it:
//! - Volume of recent transactions
//! - Single and average transaction size
//! - Counterparty spread
//! - Transaction velocity

pub mod api;
pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::core::{RiskOracle, RiskScorer};
pub use models::config::{CounterpartyMode, OracleConfig, ScoringConfig, ServerConfig};
pub use models::errors::{AppError, AppResult, ErrorCode};
pub use models::types::{
    OracleUpdate, RiskAssessment, RiskResult, ScoreFactor, TransactionRecord, WalletStats,
};
pub use providers::{CsvTransactionSource, MemoryTransactionSource, TransactionSource};
pub use utils::telemetry::{TelemetryCollector, TelemetryStats};
