//! Providers Module - Transaction Sources
//!
//! Where the oracle gets its transaction samples from. The scorer never
//! sees a source, only the records it returned.

pub mod csv_source;
pub mod memory;

pub use csv_source::*;
pub use memory::*;

use crate::models::errors::AppResult;
use crate::models::types::TransactionRecord;

/// Supplier of recent transactions for a wallet.
///
/// Contract:
/// - at most `limit` records, each with `wallet` (case-insensitive) as
///   sender or receiver
/// - most recent first; records without a parsable timestamp last
/// - an unknown wallet yields an empty list, not an error
///
/// Implementations may block; the oracle calls them off the async runtime.
pub trait TransactionSource: Send + Sync {
    fn fetch_transactions(&self, wallet: &str, limit: usize) -> AppResult<Vec<TransactionRecord>>;

    /// Short label for logs
    fn name(&self) -> &'static str;
}

/// Sort most recent first. Undated or unparsable records keep their
/// relative order at the end.
pub fn sort_by_recency(records: &mut [TransactionRecord]) {
    use crate::utils::timestamp::parse_timestamp_millis;

    records.sort_by_cached_key(|r| {
        std::cmp::Reverse(r.timestamp.as_deref().and_then(parse_timestamp_millis))
    });
}
