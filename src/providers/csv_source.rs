//! CSV Transaction Source
//!
//! Reads warehouse-style transaction exports from a directory. Each
//! `*.csv` file is one ledger partition; its file stem becomes the
//! record's chain label.
//!
//! Cells are trimmed, so padded addresses match and are stored unpadded.
//!
//! Expected headers (extra columns ignored, missing ones read as empty):
//! `transaction_hash, from_address, to_address, value, block_timestamp`

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{sort_by_recency, TransactionSource};
use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::{parse_raw_value, TransactionRecord};

/// One CSV row as exported
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    transaction_hash: String,
    #[serde(default)]
    from_address: String,
    #[serde(default)]
    to_address: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    block_timestamp: String,
}

impl CsvRow {
    fn involves(&self, wallet_lower: &str) -> bool {
        self.from_address.trim().to_lowercase() == wallet_lower
            || self.to_address.trim().to_lowercase() == wallet_lower
    }

    fn into_record(self, chain: &str) -> TransactionRecord {
        let value = if self.value.trim().is_empty() {
            None
        } else {
            let parsed = parse_raw_value(&self.value);
            if parsed.is_none() {
                debug!(
                    hash = %self.transaction_hash,
                    value = %self.value,
                    "Unparsable value, treating as zero"
                );
            }
            parsed
        };

        TransactionRecord {
            hash: self.transaction_hash,
            from: non_empty(self.from_address),
            to: non_empty(self.to_address),
            value,
            timestamp: non_empty(self.block_timestamp),
            chain: Some(chain.to_string()),
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Directory of CSV exports
#[derive(Debug, Clone)]
pub struct CsvTransactionSource {
    data_dir: PathBuf,
}

impl CsvTransactionSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// `*.csv` files (extension case-insensitive), sorted by name so scans
    /// are deterministic
    fn csv_files(&self) -> AppResult<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.data_dir).map_err(|e| {
            AppError::with_source(
                ErrorCode::SourceUnavailable,
                format!("cannot read data directory {}", self.data_dir.display()),
                e,
            )
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if is_csv && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn scan_file(
        &self,
        path: &Path,
        wallet_lower: &str,
        out: &mut Vec<TransactionRecord>,
    ) -> AppResult<()> {
        let chain = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let before = out.len();
        for row in reader.deserialize::<CsvRow>() {
            let row = row?;
            if row.involves(wallet_lower) {
                out.push(row.into_record(&chain));
            }
        }

        debug!(
            file = %path.display(),
            chain = %chain,
            matches = out.len() - before,
            "Scanned transaction export"
        );
        Ok(())
    }
}

impl TransactionSource for CsvTransactionSource {
    fn fetch_transactions(&self, wallet: &str, limit: usize) -> AppResult<Vec<TransactionRecord>> {
        let wallet_lower = wallet.trim().to_lowercase();
        let files = self.csv_files()?;

        let mut matches = Vec::new();
        for file in &files {
            self.scan_file(file, &wallet_lower, &mut matches)
                .map_err(|e| AppError {
                    message: format!("{}: {}", file.display(), e.message),
                    ..e
                })?;
        }

        let total = matches.len();
        sort_by_recency(&mut matches);
        matches.truncate(limit);

        info!(
            wallet = %wallet,
            files = files.len(),
            matched = total,
            returned = matches.len(),
            "Fetched transactions from CSV exports"
        );
        Ok(matches)
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}
