//! Core Module - Scoring Logic
//!
//! Aggregation, the tiered risk scorer, and the oracle that feeds it from a
//! transaction source. Nothing in `aggregate` or `risk_score` does I/O.

pub mod aggregate;
pub mod oracle;
pub mod risk_score;

pub use aggregate::*;
pub use oracle::*;
pub use risk_score::*;
