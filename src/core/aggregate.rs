//! Transaction Aggregation
//!
//! Reduces a transaction sample to the handful of numbers the heuristics
//! look at. Input order does not matter: timestamps are sorted here
//! before the span is taken.

use std::collections::HashSet;

use crate::models::config::CounterpartyMode;
use crate::models::types::{TransactionRecord, WalletStats};
use crate::utils::constants::{raw_to_units, MILLIS_PER_DAY, MIN_VELOCITY_TIMESTAMPS};
use crate::utils::timestamp::parse_timestamp_millis;

/// Compute aggregates for `wallet` over `transactions`.
///
/// Addresses (the wallet included) are trimmed and lower-cased before
/// counterparty comparison.
pub fn aggregate(
    wallet: &str,
    transactions: &[TransactionRecord],
    mode: CounterpartyMode,
) -> WalletStats {
    let tx_count = transactions.len();
    let mut total_value = 0.0_f64;
    let mut max_tx = 0.0_f64;
    let mut counterparties: HashSet<String> = HashSet::new();
    let mut timestamps: Vec<i64> = Vec::with_capacity(tx_count);

    for tx in transactions {
        let v = tx.value.map(raw_to_units).unwrap_or(0.0);
        total_value += v;
        if v > max_tx {
            max_tx = v;
        }

        for addr in [&tx.from, &tx.to].into_iter().flatten() {
            let addr = addr.trim();
            if !addr.is_empty() {
                counterparties.insert(addr.to_lowercase());
            }
        }

        if let Some(ms) = tx.timestamp.as_deref().and_then(parse_timestamp_millis) {
            timestamps.push(ms);
        }
    }

    let avg_tx = if tx_count > 0 {
        total_value / tx_count as f64
    } else {
        0.0
    };

    let unique_counterparties = match mode {
        CounterpartyMode::ExcludeWallet => {
            counterparties.remove(&wallet.trim().to_lowercase());
            counterparties.len()
        }
        CounterpartyMode::SubtractOne => counterparties.len().saturating_sub(1),
    };

    let tx_per_day = velocity(tx_count, &mut timestamps);

    WalletStats {
        tx_count,
        total_value,
        max_tx,
        avg_tx,
        unique_counterparties,
        valid_timestamps: timestamps.len(),
        tx_per_day,
    }
}

/// Transactions per day over the observed span, floored at one day.
/// `None` when fewer than three timestamps parsed.
fn velocity(tx_count: usize, timestamps: &mut [i64]) -> Option<f64> {
    if timestamps.len() < MIN_VELOCITY_TIMESTAMPS {
        return None;
    }
    timestamps.sort_unstable();
    let first = timestamps[0];
    let last = timestamps[timestamps.len() - 1];
    let days_span = ((last - first) as f64 / MILLIS_PER_DAY).max(1.0);
    Some(tx_count as f64 / days_span)
}
