use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::risk_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use txn_risk::config::AppConfig;
use txn_risk::error::AppError;
use txn_risk::scoring::RiskEngine;
use txn_risk::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let cutoffs = config.risk.score_to_decision;
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        engine: Arc::new(RiskEngine::new(config.risk)),
    };

    let app = risk_router()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        reject_at = cutoffs.reject_at,
        review_at = cutoffs.review_at,
        "transaction risk service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
