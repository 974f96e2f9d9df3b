//! Risk Scoring Module
//! Bounded 1-10 wallet risk score from a transaction sample
//!
//! Scoring starts at 1 and each category adds the delta of its first
//! matching tier (most severe first). Categories are independent, so a
//! wallet can pick up points from all five.

use serde::Serialize;
use tracing::debug;

use crate::core::aggregate::aggregate;
use crate::models::config::ScoringConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{RiskAssessment, RiskResult, ScoreFactor, TransactionRecord, WalletStats};
use crate::utils::constants::{
    BASE_SCORE, MAX_SCORE, MIN_SCORE, REASON_HIGH_AVG_VALUE, REASON_HIGH_TX_COUNT,
    REASON_HIGH_VELOCITY, REASON_LARGE_TX, REASON_MANY_COUNTERPARTIES, REASON_VERY_HIGH_VELOCITY,
    REASON_VERY_LARGE_TX,
};

/// Which aggregate a category reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TxCount,
    MaxTx,
    AvgTx,
    Counterparties,
    Velocity,
}

impl Metric {
    /// `None` means the category is skipped (velocity without enough timestamps)
    pub fn read(&self, stats: &WalletStats) -> Option<f64> {
        match self {
            Self::TxCount => Some(stats.tx_count as f64),
            Self::MaxTx => Some(stats.max_tx),
            Self::AvgTx => Some(stats.avg_tx),
            Self::Counterparties => Some(stats.unique_counterparties as f64),
            Self::Velocity => stats.tx_per_day,
        }
    }
}

/// Tier boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// value >= n
    AtLeast(f64),
    /// value > n
    Above(f64),
}

impl Bound {
    #[inline]
    pub fn matches(&self, value: f64) -> bool {
        match *self {
            Self::AtLeast(n) => value >= n,
            Self::Above(n) => value > n,
        }
    }
}

/// One row of a category table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    pub bound: Bound,
    pub delta: u8,
    /// Tiers without reason text add to the score silently
    pub reason: Option<&'static str>,
}

/// Ordered tiers for one metric; first match wins
#[derive(Debug, Clone, Copy)]
pub struct Category {
    pub name: &'static str,
    pub metric: Metric,
    pub tiers: &'static [Tier],
}

impl Category {
    /// First tier whose bound matches, if the metric is available
    pub fn evaluate(&self, stats: &WalletStats) -> Option<&'static Tier> {
        let value = self.metric.read(stats)?;
        self.tiers.iter().find(|tier| tier.bound.matches(value))
    }
}

const fn tier(bound: Bound, delta: u8, reason: Option<&'static str>) -> Tier {
    Tier { bound, delta, reason }
}

/// Heuristic table, evaluated top to bottom. Reason order in results
/// follows this order.
pub const CATEGORIES: [Category; 5] = [
    Category {
        name: "volume",
        metric: Metric::TxCount,
        tiers: &[
            tier(Bound::AtLeast(20.0), 2, Some(REASON_HIGH_TX_COUNT)),
            tier(Bound::AtLeast(10.0), 1, None),
        ],
    },
    Category {
        name: "single_tx_size",
        metric: Metric::MaxTx,
        tiers: &[
            tier(Bound::Above(1_000_000.0), 3, Some(REASON_VERY_LARGE_TX)),
            tier(Bound::Above(100_000.0), 2, Some(REASON_LARGE_TX)),
            tier(Bound::Above(10_000.0), 1, None),
        ],
    },
    Category {
        name: "average_size",
        metric: Metric::AvgTx,
        tiers: &[
            tier(Bound::Above(500_000.0), 2, Some(REASON_HIGH_AVG_VALUE)),
            tier(Bound::Above(50_000.0), 1, None),
        ],
    },
    Category {
        name: "counterparty_spread",
        metric: Metric::Counterparties,
        tiers: &[
            tier(Bound::AtLeast(10.0), 2, Some(REASON_MANY_COUNTERPARTIES)),
            tier(Bound::AtLeast(4.0), 1, None),
        ],
    },
    Category {
        name: "velocity",
        metric: Metric::Velocity,
        tiers: &[
            tier(Bound::Above(100.0), 3, Some(REASON_VERY_HIGH_VELOCITY)),
            tier(Bound::Above(20.0), 2, Some(REASON_HIGH_VELOCITY)),
            tier(Bound::Above(5.0), 1, None),
        ],
    },
];

/// Stateless wallet scorer. Cheap to copy, safe to share across tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskScorer {
    config: ScoringConfig,
}

impl RiskScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score `wallet` over `transactions`
    pub fn score(&self, wallet: &str, transactions: &[TransactionRecord]) -> AppResult<RiskResult> {
        self.assess(wallet, transactions).map(|a| a.result)
    }

    /// Score and keep the aggregates and per-category breakdown
    pub fn assess(
        &self,
        wallet: &str,
        transactions: &[TransactionRecord],
    ) -> AppResult<RiskAssessment> {
        let wallet = normalize_wallet(wallet)?;
        let stats = aggregate(wallet, transactions, self.config.counterparty_mode);

        let mut raw_score = u32::from(BASE_SCORE);
        let mut reasons = Vec::new();
        let mut breakdown = Vec::new();

        for category in CATEGORIES.iter() {
            if let Some(tier) = category.evaluate(&stats) {
                raw_score += u32::from(tier.delta);
                if let Some(reason) = tier.reason {
                    reasons.push(reason.to_string());
                }
                breakdown.push(ScoreFactor {
                    category: category.name.to_string(),
                    delta: tier.delta,
                    reason: tier.reason.map(str::to_string),
                });
            }
        }

        let risk_score = finalize_score(raw_score as f64);
        let compliant = risk_score < self.config.threshold;

        debug!(
            wallet = %wallet,
            tx_count = stats.tx_count,
            max_tx = stats.max_tx,
            avg_tx = stats.avg_tx,
            counterparties = stats.unique_counterparties,
            tx_per_day = ?stats.tx_per_day,
            raw_score,
            risk_score,
            "Wallet aggregates scored"
        );

        Ok(RiskAssessment {
            result: RiskResult {
                wallet: wallet.to_string(),
                risk_score,
                compliant,
                reasons,
                sample_tx_count: stats.tx_count,
            },
            stats,
            breakdown,
        })
    }
}

/// Trim and reject blank wallet addresses
pub fn normalize_wallet(wallet: &str) -> AppResult<&str> {
    let trimmed = wallet.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_wallet("wallet address required"));
    }
    Ok(trimmed)
}

/// Clamp to [1, 10], then round half away from zero
fn finalize_score(raw: f64) -> u8 {
    raw.clamp(f64::from(MIN_SCORE), f64::from(MAX_SCORE)).round() as u8
}
