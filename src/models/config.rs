//! Configuration module for the Risk Oracle
//!
//! Values are read once at startup and passed explicitly into the oracle
//! and scorer. Nothing below is global.

use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{
    DEFAULT_DATA_DIR, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_RATE_LIMIT_PER_MINUTE,
    DEFAULT_RISK_THRESHOLD, DEFAULT_SAMPLE_SIZE, MAX_SCORE,
};

/// How the queried wallet is kept out of its own counterparty count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CounterpartyMode {
    /// Remove the wallet's lower-cased address from the set
    #[default]
    ExcludeWallet,
    /// Legacy approximation: `max(0, distinct_addresses - 1)`
    SubtractOne,
}

impl CounterpartyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExcludeWallet => "exclude-wallet",
            Self::SubtractOne => "subtract-one",
        }
    }
}

impl FromStr for CounterpartyMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exclude-wallet" | "exclude_wallet" | "exclude" => Ok(Self::ExcludeWallet),
            "subtract-one" | "subtract_one" | "legacy" => Ok(Self::SubtractOne),
            other => Err(AppError::invalid_config(
                "RISK_COUNTERPARTY_MODE",
                other,
                "exclude-wallet or subtract-one",
            )),
        }
    }
}

/// Parameters the scorer needs besides the transactions themselves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringConfig {
    /// Scores at or above this are non-compliant
    pub threshold: u8,
    pub counterparty_mode: CounterpartyMode,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_RISK_THRESHOLD,
            counterparty_mode: CounterpartyMode::default(),
        }
    }
}

impl ScoringConfig {
    pub fn with_threshold(threshold: u8) -> Self {
        Self {
            threshold,
            ..Default::default()
        }
    }
}

/// Oracle configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleConfig {
    /// Records requested from the transaction source per wallet
    pub sample_size: usize,
    pub scoring: ScoringConfig,
    /// CSV directory for the file-backed source
    pub data_dir: PathBuf,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            scoring: ScoringConfig::default(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl OracleConfig {
    /// Load from process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup (tests pass a map)
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = non_empty(lookup("TX_SAMPLE_SIZE")) {
            config.sample_size = match raw.trim().parse::<usize>() {
                Ok(n) if n >= 1 => n,
                _ => return Err(AppError::invalid_config("TX_SAMPLE_SIZE", &raw, "an integer >= 1")),
            };
        }

        if let Some(raw) = non_empty(lookup("RISK_THRESHOLD")) {
            config.scoring.threshold = match raw.trim().parse::<u8>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(AppError::invalid_config(
                        "RISK_THRESHOLD",
                        &raw,
                        "an integer between 1 and 255",
                    ))
                }
            };
            if config.scoring.threshold > MAX_SCORE {
                warn!(
                    threshold = config.scoring.threshold,
                    "RISK_THRESHOLD above {}: every wallet will be compliant", MAX_SCORE
                );
            }
        }

        if let Some(raw) = non_empty(lookup("RISK_COUNTERPARTY_MODE")) {
            config.scoring.counterparty_mode = raw.parse()?;
        }

        if let Some(raw) = non_empty(lookup("TX_DATA_DIR")) {
            config.data_dir = PathBuf::from(raw);
        }

        Ok(config)
    }

    pub fn log_summary(&self) {
        info!(
            sample_size = self.sample_size,
            threshold = self.scoring.threshold,
            counterparty_mode = self.scoring.counterparty_mode.as_str(),
            data_dir = %self.data_dir.display(),
            "Oracle configuration loaded (non-compliant if score >= threshold)"
        );
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rate_limit_per_minute: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            rate_limit_per_minute: DEFAULT_RATE_LIMIT_PER_MINUTE,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `PORT` wins over `ORACLE_PORT` so hosted platforms can inject it
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = non_empty(lookup("ORACLE_HOST")) {
            config.host = host;
        }

        if let Some((key, raw)) = non_empty(lookup("PORT"))
            .map(|v| ("PORT", v))
            .or_else(|| non_empty(lookup("ORACLE_PORT")).map(|v| ("ORACLE_PORT", v)))
        {
            config.port = raw
                .trim()
                .parse()
                .map_err(|_| AppError::invalid_config(key, &raw, "a port number"))?;
        }

        if let Some(raw) = non_empty(lookup("RATE_LIMIT_PER_MINUTE")) {
            config.rate_limit_per_minute = match raw.trim().parse::<u32>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(AppError::invalid_config(
                        "RATE_LIMIT_PER_MINUTE",
                        &raw,
                        "an integer >= 1",
                    ))
                }
            };
        }

        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
