use crate::infra::AppState;
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use vioscore::error::AppError;
use vioscore::intelligence::{ReportBuilder, ReportNode};

pub(crate) const DEFAULT_REGION_CODE: &str = "NL00";

#[derive(Debug, Deserialize)]
pub(crate) struct IntelligenceParams {
    #[serde(default = "default_region_code")]
    pub(crate) region_code: String,
}

fn default_region_code() -> String {
    DEFAULT_REGION_CODE.to_string()
}

pub(crate) fn app_router() -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/intelligence",
            axum::routing::get(intelligence_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
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

pub(crate) async fn intelligence_endpoint(
    Query(params): Query<IntelligenceParams>,
    Extension(state): Extension<AppState>,
) -> Result<Json<ReportNode>, AppError> {
    let intelligence = &state.intelligence;
    let report = ReportBuilder::new(&intelligence.snapshot, &intelligence.schema)
        .build(&params.region_code)?;

    tracing::debug!(region_code = %params.region_code, "intelligence report built");
    Ok(Json(report))
}
