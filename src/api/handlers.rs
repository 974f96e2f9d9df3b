//! API Request Handlers

use axum::{
    extract::{rejection::JsonRejection, Json, Path, State},
    http::{StatusCode, Uri},
};
use chrono::{SecondsFormat, Utc};
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use super::middleware::RateLimiter;
use super::types::*;
use crate::core::oracle::RiskOracle;
use crate::models::errors::AppError;
use crate::models::types::{OracleUpdate, RiskAssessment, RiskResult};
use crate::utils::constants::{APP_VERSION, MAX_BATCH_CONCURRENCY, MAX_BATCH_WALLETS};
use crate::utils::telemetry::TelemetryCollector;

/// Shared application state
pub struct AppState {
    pub oracle: Arc<RiskOracle>,
    pub rate_limiter: Arc<RateLimiter>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(oracle: Arc<RiskOracle>, rate_limiter: Arc<RateLimiter>) -> Self {
        Self {
            oracle,
            rate_limiter,
            start_time: Instant::now(),
        }
    }

    pub fn telemetry(&self) -> &Arc<TelemetryCollector> {
        self.oracle.telemetry()
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

type ErrorReply = (StatusCode, Json<ApiResponse<()>>);
type ApiResult<T> = Result<Json<ApiResponse<T>>, ErrorReply>;

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn error_reply(err: &AppError, start: Instant) -> ErrorReply {
    let status =
        StatusCode::from_u16(err.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ApiResponse::error(ApiError::from(err), elapsed_ms(start))),
    )
}

fn bad_request(message: impl Into<String>, start: Instant) -> ErrorReply {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error(
            ApiError::bad_request(message),
            elapsed_ms(start),
        )),
    )
}

/// Unwrap a JSON body, turning axum's rejection into the standard envelope
fn json_body<T>(body: Result<Json<T>, JsonRejection>, start: Instant) -> Result<T, ErrorReply> {
    body.map(|Json(req)| req)
        .map_err(|rejection| bad_request(rejection.body_text(), start))
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "ok".to_string(),
        version: APP_VERSION.to_string(),
        uptime_seconds: state.uptime_seconds(),
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Single Wallet
// ============================================

pub async fn get_risk(
    State(state): State<Arc<AppState>>,
    Path(wallet): Path<String>,
) -> ApiResult<RiskResult> {
    let start = Instant::now();
    let result = state
        .oracle
        .risk_for_wallet(&wallet)
        .await
        .map_err(|e| error_reply(&e, start))?;

    Ok(Json(ApiResponse::success(result, elapsed_ms(start))))
}

pub async fn post_risk(
    State(state): State<Arc<AppState>>,
    body: Result<Json<WalletRequest>, JsonRejection>,
) -> ApiResult<RiskResult> {
    let start = Instant::now();
    let req = json_body(body, start)?;
    let result = state
        .oracle
        .risk_for_wallet(&req.wallet)
        .await
        .map_err(|e| error_reply(&e, start))?;

    Ok(Json(ApiResponse::success(result, elapsed_ms(start))))
}

pub async fn explain_risk(
    State(state): State<Arc<AppState>>,
    Path(wallet): Path<String>,
) -> ApiResult<RiskAssessment> {
    let start = Instant::now();
    let assessment = state
        .oracle
        .assess_wallet(&wallet)
        .await
        .map_err(|e| error_reply(&e, start))?;

    Ok(Json(ApiResponse::success(assessment, elapsed_ms(start))))
}

pub async fn update_message(
    State(state): State<Arc<AppState>>,
    Path(wallet): Path<String>,
) -> ApiResult<OracleUpdate> {
    let start = Instant::now();
    let msg = state
        .oracle
        .update_message(&wallet)
        .await
        .map_err(|e| error_reply(&e, start))?;

    Ok(Json(ApiResponse::success(msg, elapsed_ms(start))))
}

/// Score caller-supplied transactions without touching the source
pub async fn evaluate(
    State(state): State<Arc<AppState>>,
    body: Result<Json<EvaluateRequest>, JsonRejection>,
) -> ApiResult<RiskAssessment> {
    let start = Instant::now();
    let req = json_body(body, start)?;
    let assessment = state
        .oracle
        .evaluate(&req.wallet, &req.transactions)
        .map_err(|e| error_reply(&e, start))?;

    Ok(Json(ApiResponse::success(assessment, elapsed_ms(start))))
}

// ============================================
// Batch Scoring
// ============================================

pub async fn batch_risk(
    State(state): State<Arc<AppState>>,
    body: Result<Json<BatchRiskRequest>, JsonRejection>,
) -> ApiResult<BatchRiskData> {
    let start = Instant::now();
    let req = json_body(body, start)?;

    if req.wallets.is_empty() {
        return Err(bad_request("wallets list cannot be empty", start));
    }

    if req.wallets.len() > MAX_BATCH_WALLETS {
        return Err(bad_request(
            format!("Maximum {} wallets per batch request", MAX_BATCH_WALLETS),
            start,
        ));
    }

    let concurrency = req.concurrency.clamp(1, MAX_BATCH_CONCURRENCY);
    info!(wallets = req.wallets.len(), concurrency, "Batch scoring started");

    // Process wallets concurrently
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut handles = Vec::with_capacity(req.wallets.len());

    for wallet in req.wallets.iter().cloned() {
        let sem = semaphore.clone();
        let oracle = state.oracle.clone();

        let handle = tokio::spawn(async move {
            let _permit = sem.acquire_owned().await;
            let item_start = Instant::now();

            match oracle.risk_for_wallet(&wallet).await {
                Ok(result) => BatchWalletResult {
                    wallet,
                    status: "success".to_string(),
                    result: Some(result),
                    error: None,
                    latency_ms: elapsed_ms(item_start),
                },
                Err(e) => BatchWalletResult {
                    wallet,
                    status: "error".to_string(),
                    result: None,
                    error: Some(ApiError::from(&e)),
                    latency_ms: elapsed_ms(item_start),
                },
            }
        });

        handles.push(handle);
    }

    // join_all keeps request order
    let joined = join_all(handles).await;
    let mut results = Vec::with_capacity(joined.len());
    for (joined, wallet) in joined.into_iter().zip(req.wallets.iter()) {
        match joined {
            Ok(result) => results.push(result),
            Err(e) => {
                warn!(wallet = %wallet, "Batch task failed: {}", e);
                let err = AppError::internal(format!("scoring task failed: {}", e));
                results.push(BatchWalletResult {
                    wallet: wallet.clone(),
                    status: "error".to_string(),
                    result: None,
                    error: Some(ApiError::from(&err)),
                    latency_ms: 0.0,
                });
            }
        }
    }

    // Calculate summary
    let total_compliant = results
        .iter()
        .filter(|r| r.result.as_ref().map(|s| s.compliant).unwrap_or(false))
        .count();
    let total_non_compliant = results
        .iter()
        .filter(|r| r.result.as_ref().map(|s| !s.compliant).unwrap_or(false))
        .count();
    let total_failed = results.iter().filter(|r| r.result.is_none()).count();

    let data = BatchRiskData {
        total_requested: req.wallets.len(),
        total_processed: results.len() - total_failed,
        total_compliant,
        total_non_compliant,
        total_failed,
        results,
        processing_time_ms: elapsed_ms(start),
    };

    Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
}

// ============================================
// Stats
// ============================================

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatsData>> {
    let start = Instant::now();
    let stats = state.telemetry().get_stats();
    let scoring = state.oracle.scorer().config();

    let data = StatsData {
        non_compliant_rate: stats.non_compliant_rate(),
        telemetry: stats,
        sample_size: state.oracle.sample_size(),
        risk_threshold: scoring.threshold,
        counterparty_mode: scoring.counterparty_mode.as_str().to_string(),
        uptime_seconds: state.uptime_seconds(),
        api_version: APP_VERSION.to_string(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Fallback
// ============================================

pub async fn not_found(uri: Uri) -> ErrorReply {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error(ApiError::not_found(uri.path()), 0.0)),
    )
}
