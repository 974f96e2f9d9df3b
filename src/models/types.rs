//! Type definitions for the Risk Oracle
//! Transaction records in, risk results out

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// One ledger transaction as supplied by a transaction source.
///
/// Records are never mutated by the scorer; it only borrows them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction hash (opaque, not used in scoring)
    #[serde(default)]
    pub hash: String,
    /// Sender address
    #[serde(default)]
    pub from: Option<String>,
    /// Receiver address
    #[serde(default)]
    pub to: Option<String>,
    /// Raw amount in the smallest native unit (wei-like, 18 decimals)
    #[serde(default, deserialize_with = "deserialize_raw_value")]
    pub value: Option<u128>,
    /// Block timestamp, kept as the source wrote it
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Ledger partition label (informational)
    #[serde(default)]
    pub chain: Option<String>,
}

impl TransactionRecord {
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            ..Default::default()
        }
    }

    pub fn from_addr(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn to_addr(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn with_value(mut self, value: u128) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn with_chain(mut self, chain: impl Into<String>) -> Self {
        self.chain = Some(chain.into());
        self
    }

    /// Case-insensitive check whether `wallet` is sender or receiver
    pub fn involves(&self, wallet: &str) -> bool {
        let matches = |addr: &Option<String>| {
            addr.as_deref()
                .map(|a| a.eq_ignore_ascii_case(wallet))
                .unwrap_or(false)
        };
        matches(&self.from) || matches(&self.to)
    }
}

/// Accepts `123`, `"123"` or `null` for raw values.
/// Large wei amounts routinely overflow JSON number handling in clients,
/// so decimal strings are the common wire form.
fn deserialize_raw_value<'de, D>(deserializer: D) -> Result<Option<u128>, D::Error>
where
    D: Deserializer<'de>,
{
    struct RawValueVisitor;

    impl<'de> de::Visitor<'de> for RawValueVisitor {
        type Value = Option<u128>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a non-negative integer or a decimal string")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<Self::Value, D2::Error> {
            d.deserialize_any(self)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v as u128))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            u128::try_from(v)
                .map(Some)
                .map_err(|_| E::custom("value must not be negative"))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if v.is_finite() && v >= 0.0 {
                Ok(Some(v as u128))
            } else {
                Err(E::custom("value must be a finite non-negative number"))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let v = v.trim();
            if v.is_empty() {
                return Ok(None);
            }
            parse_raw_value(v).map(Some).ok_or_else(|| E::custom(format!("invalid value: {}", v)))
        }
    }

    deserializer.deserialize_option(RawValueVisitor)
}

/// Parse a raw amount cell: plain integer first, then a float form
/// (`1e+21`, `2000.0`) as written by spreadsheet exports.
pub fn parse_raw_value(raw: &str) -> Option<u128> {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<u128>() {
        return Some(v);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 => Some(f as u128),
        _ => None,
    }
}

/// Outcome of scoring one wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskResult {
    /// Trimmed input address
    pub wallet: String,
    /// Final score, always within 1..=10
    pub risk_score: u8,
    /// `risk_score < threshold`
    pub compliant: bool,
    /// One entry per triggered tier that carries reason text, in category order
    pub reasons: Vec<String>,
    /// Number of records evaluated
    pub sample_tx_count: usize,
}

/// Aggregates computed over a transaction sample
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletStats {
    pub tx_count: usize,
    /// Sum of converted values
    pub total_value: f64,
    pub max_tx: f64,
    pub avg_tx: f64,
    pub unique_counterparties: usize,
    /// Number of records whose timestamp parsed
    pub valid_timestamps: usize,
    /// Only present when at least three timestamps parsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_per_day: Option<f64>,
}

/// A category's contribution to the final score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreFactor {
    pub category: String,
    pub delta: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Full scoring output: result plus the numbers behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub result: RiskResult,
    pub stats: WalletStats,
    pub breakdown: Vec<ScoreFactor>,
}

/// Execute message for the on-chain risk registry.
/// Serializes as `{"update_risk": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleUpdate {
    UpdateRisk {
        wallet: String,
        risk: u8,
        compliant: bool,
        timestamp: Option<String>,
    },
}

impl OracleUpdate {
    pub fn from_result(result: &RiskResult, timestamp: Option<String>) -> Self {
        Self::UpdateRisk {
            wallet: result.wallet.clone(),
            risk: result.risk_score,
            compliant: result.compliant,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_involves_is_case_insensitive() {
        let tx = TransactionRecord::new("0x1")
            .from_addr("0xABCdef")
            .to_addr("0x123");
        assert!(tx.involves("0xabcdef"));
        assert!(tx.involves("0x123"));
        assert!(!tx.involves("0x999"));
    }

    #[test]
    fn test_value_accepts_string_and_number() {
        let tx: TransactionRecord =
            serde_json::from_str(r#"{"hash":"h","value":"2000000000000000000000000"}"#).unwrap();
        assert_eq!(tx.value, Some(2_000_000_000_000_000_000_000_000));

        let tx: TransactionRecord = serde_json::from_str(r#"{"hash":"h","value":42}"#).unwrap();
        assert_eq!(tx.value, Some(42));

        let tx: TransactionRecord = serde_json::from_str(r#"{"hash":"h","value":null}"#).unwrap();
        assert_eq!(tx.value, None);

        let tx: TransactionRecord = serde_json::from_str(r#"{"hash":"h"}"#).unwrap();
        assert_eq!(tx.value, None);
    }

    #[test]
    fn test_negative_value_rejected() {
        let parsed: Result<TransactionRecord, _> =
            serde_json::from_str(r#"{"hash":"h","value":-5}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_parse_raw_value_float_forms() {
        assert_eq!(parse_raw_value("1e+21"), Some(1_000_000_000_000_000_000_000));
        assert_eq!(parse_raw_value(" 15 "), Some(15));
        assert_eq!(parse_raw_value("abc"), None);
        assert_eq!(parse_raw_value("-1"), None);
    }

    #[test]
    fn test_oracle_update_wire_format() {
        let result = RiskResult {
            wallet: "0xabc".to_string(),
            risk_score: 8,
            compliant: false,
            reasons: vec![],
            sample_tx_count: 3,
        };
        let msg = OracleUpdate::from_result(&result, Some("2024-01-01T00:00:00Z".to_string()));
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["update_risk"]["wallet"], "0xabc");
        assert_eq!(json["update_risk"]["risk"], 8);
        assert_eq!(json["update_risk"]["compliant"], false);
    }
}
