use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use hemolink::models::ModelRegistry;
use hemolink::scoring::ScoringEngine;
use metrics_exporter_prometheus::PrometheusHandle;

/// Shared handles threaded through every route handler.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) engine: Arc<ScoringEngine>,
    pub(crate) registry: Arc<ModelRegistry>,
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}
