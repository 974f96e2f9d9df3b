//! Models Module - Data Structures & Configuration
//!
//! Records, results, errors and configuration shared by every layer.

pub mod config;
pub mod errors;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
