//! Timestamp parsing for transaction exports
//!
//! Block explorers and warehouse exports disagree on format, so a handful
//! of layouts are accepted. Anything else is reported as unparsable and
//! the caller drops it.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Shorter digit runs are not epoch seconds (9 digits reaches back to 1973)
const MIN_UNIX_SECONDS_DIGITS: usize = 9;

/// Parse a timestamp string into a UTC instant.
///
/// Accepted:
/// - RFC 3339 (`2024-01-01T12:00:00Z`, `2024-01-01T12:00:00+02:00`)
/// - BigQuery style (`2024-01-01 12:00:00 UTC`, fractional seconds allowed)
/// - naive date-time with space or `T` separator, read as UTC
/// - date only (`2024-01-01`), UTC midnight
/// - bare year (`2024`), January 1st UTC
/// - Unix seconds (`1704067200`, at least nine digits)
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive_part = raw.strip_suffix(" UTC").unwrap_or(raw);
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(naive_part, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
    }

    if raw.bytes().all(|b| b.is_ascii_digit()) {
        if raw.len() == 4 {
            return raw
                .parse::<i32>()
                .ok()
                .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| Utc.from_utc_datetime(&naive));
        }
        if raw.len() >= MIN_UNIX_SECONDS_DIGITS {
            return raw
                .parse::<i64>()
                .ok()
                .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));
        }
    }

    None
}

/// Milliseconds since the Unix epoch, for span arithmetic
#[inline]
pub fn parse_timestamp_millis(raw: &str) -> Option<i64> {
    parse_timestamp(raw).map(|dt| dt.timestamp_millis())
}
