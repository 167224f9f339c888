use crate::cli::ServeArgs;
use crate::infra::{AppState, CsvTableProvider, IntelligenceState};
use crate::routes::app_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use vioscore::config::AppConfig;
use vioscore::error::AppError;
use vioscore::intelligence::{TableSnapshot, REQUIRED_TABLES};
use vioscore::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(data_dir) = args.data_dir.take() {
        config.data.dir = data_dir;
    }

    telemetry::init(config.environment, &config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));

    // The snapshot is loaded exactly once; a missing table aborts startup
    // instead of failing every request later.
    let provider = CsvTableProvider::new(config.data.dir.clone());
    let snapshot = TableSnapshot::load(&provider, REQUIRED_TABLES)?;
    let intelligence = Arc::new(IntelligenceState::from_snapshot(snapshot)?);

    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        intelligence,
    };

    let app = app_router()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, data_dir = %config.data.dir.display(), "intelligence service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
