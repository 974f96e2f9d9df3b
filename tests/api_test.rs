//! HTTP API tests, driven through the router without binding a socket

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use risk_oracle::api::{create_router, handlers::AppState, RateLimitConfig, RateLimiter};
use risk_oracle::{
    AppError, AppResult, MemoryTransactionSource, OracleConfig, RiskOracle, TelemetryCollector,
    TransactionRecord, TransactionSource,
};

struct OfflineSource;

impl TransactionSource for OfflineSource {
    fn fetch_transactions(&self, _wallet: &str, _limit: usize) -> AppResult<Vec<TransactionRecord>> {
        Err(AppError::source_unavailable("warehouse offline"))
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}

fn app_with(source: Arc<dyn TransactionSource>, requests_per_minute: u32) -> Router {
    let oracle = Arc::new(RiskOracle::new(
        &OracleConfig::default(),
        source,
        Arc::new(TelemetryCollector::new()),
    ));
    let limiter = Arc::new(RateLimiter::new(RateLimitConfig::per_minute(requests_per_minute)));
    create_router(Arc::new(AppState::new(oracle, limiter)))
}

fn test_app() -> Router {
    let records = (0..25)
        .map(|i| {
            TransactionRecord::new(format!("0x{:02}", i))
                .from_addr("0xabc")
                .to_addr("0xdef")
        })
        .collect();
    app_with(Arc::new(MemoryTransactionSource::new(records)), 1_000)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health() {
    for path in ["/health", "/v1/health"] {
        let (status, body) = send(test_app(), get(path)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "ok");
        assert!(body["data"]["time"].is_string());
    }
}

#[tokio::test]
async fn test_get_risk_known_wallet() {
    let (status, body) = send(test_app(), get("/v1/risk/0xABC")).await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["wallet"], "0xABC");
    assert_eq!(data["risk_score"], 3);
    assert_eq!(data["compliant"], true);
    assert_eq!(data["sample_tx_count"], 20);
    assert_eq!(data["reasons"], json!(["high number of recent transactions"]));
}

#[tokio::test]
async fn test_unknown_wallet_scores_one() {
    let (status, body) = send(test_app(), get("/risk/0x999")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["risk_score"], 1);
    assert_eq!(body["data"]["reasons"], json!([]));
}

#[tokio::test]
async fn test_blank_wallet_is_bad_request() {
    let (status, body) = send(test_app(), get("/v1/risk/%20%20")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "WALLET_INVALID_ADDRESS");

    let (status, body) = send(test_app(), post_json("/v1/risk", json!({"wallet": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "WALLET_INVALID_ADDRESS");
}

#[tokio::test]
async fn test_post_risk() {
    let (status, body) = send(test_app(), post_json("/risk", json!({"wallet": "0xabc"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["risk_score"], 3);
}

#[tokio::test]
async fn test_malformed_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/risk")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "API_BAD_REQUEST");
}

#[tokio::test]
async fn test_source_failure_is_unavailable() {
    let app = app_with(Arc::new(OfflineSource), 1_000);
    let (status, body) = send(app, get("/v1/risk/0xabc")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "SOURCE_UNAVAILABLE");
}

#[tokio::test]
async fn test_explain() {
    let (status, body) = send(test_app(), get("/v1/risk/0xabc/explain")).await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["result"]["risk_score"], 3);
    assert_eq!(data["stats"]["tx_count"], 20);
    assert_eq!(data["stats"]["unique_counterparties"], 1);
    assert_eq!(data["breakdown"][0]["category"], "volume");
    assert_eq!(data["breakdown"][0]["delta"], 2);
}

#[tokio::test]
async fn test_update_message() {
    let (status, body) = send(test_app(), get("/v1/risk/0xabc/update-msg")).await;
    assert_eq!(status, StatusCode::OK);

    let msg = &body["data"]["update_risk"];
    assert_eq!(msg["wallet"], "0xabc");
    assert_eq!(msg["risk"], 3);
    assert_eq!(msg["compliant"], true);
    assert!(msg["timestamp"].is_string());
}

#[tokio::test]
async fn test_evaluate_supplied_transactions() {
    let body = json!({
        "wallet": "0xabc",
        "transactions": [
            {"hash": "0x1", "from": "0xabc", "to": "0xdef", "value": "2000000000000000000000000"}
        ]
    });
    let (status, body) = send(test_app(), post_json("/v1/risk/evaluate", body)).await;
    assert_eq!(status, StatusCode::OK);

    let result = &body["data"]["result"];
    assert_eq!(result["risk_score"], 6);
    assert_eq!(
        result["reasons"],
        json!(["very large single transaction", "high average transaction value"])
    );
}

#[tokio::test]
async fn test_batch() {
    let body = json!({"wallets": ["0xabc", " ", "0x999"], "concurrency": 2});
    let (status, body) = send(test_app(), post_json("/v1/risk/batch", body)).await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["total_requested"], 3);
    assert_eq!(data["total_processed"], 2);
    assert_eq!(data["total_failed"], 1);
    assert_eq!(data["total_compliant"], 2);

    let results = data["results"].as_array().unwrap();
    assert_eq!(results[0]["wallet"], "0xabc");
    assert_eq!(results[0]["result"]["risk_score"], 3);
    assert_eq!(results[1]["status"], "error");
    assert_eq!(results[1]["error"]["code"], "WALLET_INVALID_ADDRESS");
    assert_eq!(results[2]["result"]["risk_score"], 1);
}

#[tokio::test]
async fn test_batch_limits() {
    let (status, _) = send(test_app(), post_json("/v1/risk/batch", json!({"wallets": []}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let wallets: Vec<String> = (0..101).map(|i| format!("0x{}", i)).collect();
    let (status, body) =
        send(test_app(), post_json("/v1/risk/batch", json!({"wallets": wallets}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "API_BAD_REQUEST");
}

#[tokio::test]
async fn test_stats_reflect_scoring() {
    let app = test_app();
    send(app.clone(), get("/v1/risk/0xabc")).await;
    send(app.clone(), get("/v1/risk/0x999")).await;

    let (status, body) = send(app, get("/v1/stats")).await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["total_scored"], 2);
    assert_eq!(data["total_non_compliant"], 0);
    assert_eq!(data["score_histogram"][0], 1);
    assert_eq!(data["score_histogram"][2], 1);
    assert_eq!(data["risk_threshold"], 7);
    assert_eq!(data["sample_size"], 20);
    assert_eq!(data["counterparty_mode"], "exclude-wallet");
}

#[tokio::test]
async fn test_rate_limit() {
    let app = app_with(Arc::new(MemoryTransactionSource::default()), 2);

    for _ in 0..2 {
        let (status, _) = send(app.clone(), get("/v1/risk/0xabc")).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(app.clone(), get("/v1/risk/0xabc")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["code"], "API_RATE_LIMITED");

    // Health is exempt
    let (status, _) = send(app.clone(), get("/v1/health")).await;
    assert_eq!(status, StatusCode::OK);

    // Different client, fresh window
    let request = Request::builder()
        .uri("/v1/risk/0xabc")
        .header("x-forwarded-for", "10.1.1.1")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, body) = send(test_app(), get("/v2/nothing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "API_NOT_FOUND");
}
