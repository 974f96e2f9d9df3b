//! Telemetry Module
//!
//! In-process counters for scoring activity. Lock-free: every counter is
//! an atomic, so recording from many request tasks never contends.
//! Nothing is written to disk.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::utils::constants::{MAX_SCORE, MIN_SCORE};

const BUCKETS: usize = MAX_SCORE as usize;

/// Snapshot of collected counters
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryStats {
    pub total_scored: u64,
    pub total_compliant: u64,
    pub total_non_compliant: u64,
    pub total_failures: u64,
    pub total_transactions_evaluated: u64,
    pub avg_latency_ms: f64,
    /// Index 0 is score 1, index 9 is score 10
    pub score_histogram: [u64; BUCKETS],
    pub period_start: u64,
    pub period_end: u64,
}

impl TelemetryStats {
    /// Share of scored wallets that were non-compliant, in percent
    pub fn non_compliant_rate(&self) -> f64 {
        if self.total_scored == 0 {
            0.0
        } else {
            self.total_non_compliant as f64 / self.total_scored as f64 * 100.0
        }
    }
}

/// Collector shared across the service
#[derive(Debug)]
pub struct TelemetryCollector {
    total_scored: AtomicU64,
    total_non_compliant: AtomicU64,
    total_failures: AtomicU64,
    total_transactions: AtomicU64,
    total_latency_ms: AtomicU64,
    histogram: [AtomicU64; BUCKETS],
    session_start: u64,
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryCollector {
    pub fn new() -> Self {
        Self {
            total_scored: AtomicU64::new(0),
            total_non_compliant: AtomicU64::new(0),
            total_failures: AtomicU64::new(0),
            total_transactions: AtomicU64::new(0),
            total_latency_ms: AtomicU64::new(0),
            histogram: std::array::from_fn(|_| AtomicU64::new(0)),
            session_start: current_timestamp(),
        }
    }

    /// Record a completed scoring call
    pub fn record_score(&self, risk_score: u8, compliant: bool, tx_count: usize, latency_ms: u64) {
        self.total_scored.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);
        self.total_transactions
            .fetch_add(tx_count as u64, Ordering::Relaxed);
        if !compliant {
            self.total_non_compliant.fetch_add(1, Ordering::Relaxed);
        }

        let bucket = risk_score.clamp(MIN_SCORE, MAX_SCORE) as usize - 1;
        self.histogram[bucket].fetch_add(1, Ordering::Relaxed);
    }

    /// Record a scoring call that produced no result
    pub fn record_failure(&self) {
        self.total_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> TelemetryStats {
        let total_scored = self.total_scored.load(Ordering::Relaxed);
        let total_non_compliant = self.total_non_compliant.load(Ordering::Relaxed);
        let total_latency = self.total_latency_ms.load(Ordering::Relaxed);

        let avg_latency_ms = if total_scored > 0 {
            total_latency as f64 / total_scored as f64
        } else {
            0.0
        };

        TelemetryStats {
            total_scored,
            total_compliant: total_scored.saturating_sub(total_non_compliant),
            total_non_compliant,
            total_failures: self.total_failures.load(Ordering::Relaxed),
            total_transactions_evaluated: self.total_transactions.load(Ordering::Relaxed),
            avg_latency_ms,
            score_histogram: std::array::from_fn(|i| self.histogram[i].load(Ordering::Relaxed)),
            period_start: self.session_start,
            period_end: current_timestamp(),
        }
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
