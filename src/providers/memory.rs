//! In-memory transaction source
//!
//! Holds a fixed record set; used by tests and for embedding the oracle
//! where transactions are already loaded.

use std::sync::RwLock;

use super::{sort_by_recency, TransactionSource};
use crate::models::errors::{AppError, AppResult};
use crate::models::types::TransactionRecord;

#[derive(Debug, Default)]
pub struct MemoryTransactionSource {
    records: RwLock<Vec<TransactionRecord>>,
}

impl MemoryTransactionSource {
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn push(&self, record: TransactionRecord) -> AppResult<()> {
        self.records
            .write()
            .map_err(|_| AppError::source_unavailable("record store lock poisoned"))?
            .push(record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TransactionSource for MemoryTransactionSource {
    fn fetch_transactions(&self, wallet: &str, limit: usize) -> AppResult<Vec<TransactionRecord>> {
        let wallet = wallet.trim();
        let records = self
            .records
            .read()
            .map_err(|_| AppError::source_unavailable("record store lock poisoned"))?;

        let mut matches: Vec<TransactionRecord> =
            records.iter().filter(|r| r.involves(wallet)).cloned().collect();
        sort_by_recency(&mut matches);
        matches.truncate(limit);
        Ok(matches)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
