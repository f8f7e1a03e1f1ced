use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use txn_risk::scoring::{Decision, ReasonLog, RiskConfig, TransactionInput};

/// One transaction to score. `transaction_id` is echoed back untouched;
/// fields the engine does not know are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct TransactionRequest {
    #[serde(default)]
    pub(crate) transaction_id: Value,
    #[serde(flatten)]
    pub(crate) record: TransactionInput,
}

#[derive(Debug, Serialize)]
pub(crate) struct TransactionResponse {
    pub(crate) transaction_id: Value,
    pub(crate) decision: Decision,
    pub(crate) risk_score: i32,
    pub(crate) reasons: ReasonLog,
}

pub(crate) fn risk_router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/config", get(config_endpoint))
        .route("/transaction", post(transaction_endpoint))
}

pub(crate) async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn config_endpoint(Extension(state): Extension<AppState>) -> Json<RiskConfig> {
    Json(state.engine.config().clone())
}

pub(crate) async fn transaction_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<TransactionRequest>,
) -> Json<TransactionResponse> {
    let TransactionRequest {
        transaction_id,
        record,
    } = payload;

    let result = state.engine.evaluate(&record);

    Json(TransactionResponse {
        transaction_id,
        decision: result.decision,
        risk_score: result.risk_score,
        reasons: result.reasons,
    })
}
