//! Constants Module - Single Source of Truth
//!
//! Defaults, unit conversion and the reason strings reported to callers.
//! Reason strings are part of the public output; changing one is a
//! breaking change for consumers matching on them.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "RiskOracle";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================
// CONFIGURATION DEFAULTS
// ============================================

/// Records requested from the transaction source per wallet
pub const DEFAULT_SAMPLE_SIZE: usize = 20;

/// Scores at or above this are non-compliant
pub const DEFAULT_RISK_THRESHOLD: u8 = 7;

/// Directory scanned by the CSV transaction source
pub const DEFAULT_DATA_DIR: &str = "./data";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;

/// Requests per client per minute
pub const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 100;

/// Upper bound on wallets per batch request
pub const MAX_BATCH_WALLETS: usize = 100;

/// Batch concurrency bounds
pub const DEFAULT_BATCH_CONCURRENCY: usize = 10;
pub const MAX_BATCH_CONCURRENCY: usize = 50;

/// Requests served at once across all clients
pub const MAX_IN_FLIGHT_REQUESTS: usize = 512;

// ============================================
// SCORE BOUNDS
// ============================================

pub const BASE_SCORE: u8 = 1;
pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;

/// Velocity is only scored with at least this many parsed timestamps
pub const MIN_VELOCITY_TIMESTAMPS: usize = 3;

pub const MILLIS_PER_DAY: f64 = 1000.0 * 60.0 * 60.0 * 24.0;

// ============================================
// UNIT CONVERSION
// ============================================

/// Raw values are 18-decimal fixed point regardless of chain.
/// Known limitation: tokens with other decimals are mis-scaled.
pub const VALUE_DECIMALS: u32 = 18;

/// 10^VALUE_DECIMALS
pub const UNIT_DIVISOR: f64 = 1e18;

/// Convert a raw integer amount to whole units
#[inline]
pub fn raw_to_units(raw: u128) -> f64 {
    raw as f64 / UNIT_DIVISOR
}

// ============================================
// REASONS
// ============================================

pub const REASON_HIGH_TX_COUNT: &str = "high number of recent transactions";
pub const REASON_VERY_LARGE_TX: &str = "very large single transaction";
pub const REASON_LARGE_TX: &str = "large single transaction";
pub const REASON_HIGH_AVG_VALUE: &str = "high average transaction value";
pub const REASON_MANY_COUNTERPARTIES: &str = "many unique counterparties";
pub const REASON_VERY_HIGH_VELOCITY: &str = "very high transaction velocity";
pub const REASON_HIGH_VELOCITY: &str = "high transaction velocity";
