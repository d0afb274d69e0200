use crate::cli::ServeArgs;
use crate::routes;
use crate::state::AppState;
use axum_prometheus::PrometheusMetricLayer;
use hemolink::config::AppConfig;
use hemolink::error::AppError;
use hemolink::models::ModelRegistry;
use hemolink::scoring::{EntropyNoise, NoiseSource};
use hemolink::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

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
    let readiness = Arc::new(AtomicBool::new(false));

    let noise: Arc<dyn NoiseSource> = Arc::new(EntropyNoise::new());
    let registry = Arc::new(ModelRegistry::new(noise.clone()));
    let engine = Arc::new(registry.engine(noise));

    let state = AppState {
        engine,
        registry,
        readiness: readiness.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = routes::router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness.store(true, Ordering::Release);

    info!(?config.environment, %addr, "prediction service ready, 4 models registered");

    axum::serve(listener, app).await?;
    Ok(())
}
