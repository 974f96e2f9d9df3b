//! Centralized Error Handling Module
//!
//! Every failure carries a unique, stable error code so API clients and
//! log searches can tell an invalid wallet apart from an unavailable
//! transaction source.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - WALLET_xxx: input validation
//! - SOURCE_xxx: transaction source failures
//! - API_xxx: API errors
//! - CFG_xxx: Configuration errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Input Errors (1xx)
    // ============================================
    /// Wallet address empty after trimming
    WalletInvalidAddress,

    // ============================================
    // Transaction Source Errors (2xx)
    // ============================================
    /// Source could not be read (missing directory, I/O failure)
    SourceUnavailable,
    /// Source content could not be parsed
    SourceParseError,

    // ============================================
    // API Errors (3xx)
    // ============================================
    /// Invalid request format
    ApiBadRequest,
    /// Rate limit exceeded
    ApiRateLimited,
    /// Internal server error
    ApiInternalError,
    /// Resource not found
    ApiNotFound,

    // ============================================
    // Configuration Errors (4xx)
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WalletInvalidAddress => "WALLET_INVALID_ADDRESS",

            Self::SourceUnavailable => "SOURCE_UNAVAILABLE",
            Self::SourceParseError => "SOURCE_PARSE_ERROR",

            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiRateLimited => "API_RATE_LIMITED",
            Self::ApiInternalError => "API_INTERNAL_ERROR",
            Self::ApiNotFound => "API_NOT_FOUND",

            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ApiBadRequest | Self::WalletInvalidAddress => 400,
            Self::ApiNotFound => 404,
            Self::ApiRateLimited => 429,
            Self::SourceUnavailable | Self::SourceParseError => 503,
            _ => 500,
        }
    }

    /// True for failures originating in the transaction source
    pub fn is_source_failure(&self) -> bool {
        matches!(self, Self::SourceUnavailable | Self::SourceParseError)
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Empty or whitespace-only wallet
    pub fn invalid_wallet(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::WalletInvalidAddress, msg)
    }

    /// Transaction source failed
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::SourceUnavailable, msg)
    }

    /// Invalid configuration value
    pub fn invalid_config(key: &str, value: &str, expected: &str) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("{}={:?} is invalid, expected {}", key, value, expected),
        )
    }

    /// API bad request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    /// API internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInternalError, msg)
    }
}

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::SourceUnavailable, "IO error", err)
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            Self::new(ErrorCode::SourceUnavailable, err.to_string())
        } else {
            Self::with_source(ErrorCode::SourceParseError, "CSV parse error", err)
        }
    }
}
