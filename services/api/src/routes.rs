use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use hemolink::error::AppError;
use hemolink::models::{ModelRecord, TrainingReport, MODEL_VERSION};
use hemolink::scoring::{
    AvailabilityRequest, CompatibilityRequest, DemandRequest, RiskRequest, ScoringOutcome,
};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

pub(crate) const SERVICE_NAME: &str = "HemoLink AI ML Services";
pub(crate) const SERVICE_VERSION: &str = "1.0.0-demo";

pub(crate) fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/ready", get(readiness))
        .route("/metrics", get(prometheus_metrics))
        .route("/models/:name/metrics", get(model_metrics))
        .route("/models/train/:name", post(train_model))
        .route("/predict/donor-availability", post(donor_availability))
        .route("/predict/demand-forecast", post(demand_forecast))
        .route("/predict/compatibility", post(compatibility))
        .route("/predict/risk-assessment", post(risk_assessment))
        .fallback(unknown_route)
        .layer(cors)
        .with_state(state)
}

/// Fixed wrapper around every prediction result.
#[derive(Debug, Serialize)]
pub(crate) struct PredictionEnvelope {
    pub(crate) prediction_type: &'static str,
    pub(crate) result: ScoringOutcome,
    pub(crate) confidence: f64,
    pub(crate) model_version: &'static str,
    pub(crate) timestamp: String,
}

fn envelope(outcome: ScoringOutcome) -> PredictionEnvelope {
    PredictionEnvelope {
        prediction_type: outcome.prediction_type(),
        confidence: outcome.confidence(),
        result: outcome,
        model_version: MODEL_VERSION,
        timestamp: Utc::now().to_rfc3339(),
    }
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    models_loaded: usize,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct MetricsView {
    accuracy: f64,
    precision: f64,
    recall: f64,
    f1_score: f64,
    last_trained: String,
    training_samples: u32,
}

impl From<&ModelRecord> for MetricsView {
    fn from(record: &ModelRecord) -> Self {
        Self {
            accuracy: record.metrics.accuracy,
            precision: record.metrics.precision,
            recall: record.metrics.recall,
            f1_score: record.metrics.f1_score,
            last_trained: record.trained_at.to_rfc3339(),
            training_samples: record.training_samples,
        }
    }
}

#[derive(Debug, Serialize)]
struct ModelMetricsBody {
    model: String,
    version: String,
    metrics: MetricsView,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct TrainingBody {
    status: &'static str,
    model: String,
    training_result: TrainingReport,
    timestamp: String,
}

async fn health(State(state): State<AppState>) -> Json<HealthBody> {
    Json(HealthBody {
        status: "healthy",
        service: SERVICE_NAME,
        version: SERVICE_VERSION,
        models_loaded: state.registry.len(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
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

async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn model_metrics(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ModelMetricsBody>, AppError> {
    let record = state.registry.get(&name)?;
    Ok(Json(ModelMetricsBody {
        model: name,
        metrics: MetricsView::from(&record),
        version: record.version,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

async fn train_model(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<TrainingBody>, AppError> {
    let report = state.registry.train(&name)?;
    Ok(Json(TrainingBody {
        status: "success",
        model: name,
        training_result: report,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

async fn donor_availability(
    State(state): State<AppState>,
    payload: Result<Json<AvailabilityRequest>, JsonRejection>,
) -> Result<Json<PredictionEnvelope>, AppError> {
    let Json(request) = payload?;
    let outcome = state.engine.assess_availability(&request);
    Ok(Json(envelope(ScoringOutcome::DonorAvailability(outcome))))
}

async fn demand_forecast(
    State(state): State<AppState>,
    payload: Result<Json<DemandRequest>, JsonRejection>,
) -> Result<Json<PredictionEnvelope>, AppError> {
    let Json(request) = payload?;
    let outcome = state.engine.forecast_demand(&request);
    Ok(Json(envelope(ScoringOutcome::DemandForecast(outcome))))
}

async fn compatibility(
    State(state): State<AppState>,
    payload: Result<Json<CompatibilityRequest>, JsonRejection>,
) -> Result<Json<PredictionEnvelope>, AppError> {
    let Json(request) = payload?;
    let outcome = state.engine.assess_compatibility(&request);
    Ok(Json(envelope(ScoringOutcome::Compatibility(outcome))))
}

async fn risk_assessment(
    State(state): State<AppState>,
    payload: Result<Json<RiskRequest>, JsonRejection>,
) -> Result<Json<PredictionEnvelope>, AppError> {
    let Json(request) = payload?;
    let outcome = state.engine.assess_risk(&request);
    Ok(Json(envelope(ScoringOutcome::RiskAssessment(outcome))))
}

async fn unknown_route() -> AppError {
    AppError::UnknownRoute
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use hemolink::models::ModelRegistry;
    use hemolink::scoring::{EntropyNoise, NoiseSource};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn build_router() -> Router {
        let noise: Arc<dyn NoiseSource> = Arc::new(EntropyNoise::seeded(404));
        let registry = Arc::new(ModelRegistry::new(noise.clone()));
        let engine = Arc::new(registry.engine(noise));
        // A detached recorder keeps tests independent of the global one the
        // server installs.
        let recorder = PrometheusBuilder::new().build_recorder();
        let state = AppState {
            engine,
            registry,
            readiness: Arc::new(AtomicBool::new(true)),
            metrics: Arc::new(recorder.handle()),
        };
        router(state)
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.expect("router dispatch");
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json body");
        (status, payload)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    #[tokio::test]
    async fn health_reports_loaded_models() {
        let (status, payload) = send(build_router(), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], "healthy");
        assert_eq!(payload["service"], "HemoLink AI ML Services");
        assert_eq!(payload["version"], "1.0.0-demo");
        assert_eq!(payload["models_loaded"], 4);
        assert!(payload.get("timestamp").is_some());
    }

    #[tokio::test]
    async fn donor_availability_returns_the_envelope() {
        let (status, payload) = send(
            build_router(),
            post_json(
                "/predict/donor-availability",
                r#"{"blood_type": "O_POSITIVE", "urgency_level": 5}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["prediction_type"], "donor_availability");
        assert_eq!(payload["confidence"], 0.85);
        assert_eq!(payload["model_version"], "1.0.0-demo");

        let result = &payload["result"];
        let score = result["availability_score"].as_f64().expect("score");
        assert!((score - 0.96).abs() < 1e-9);
        assert_eq!(result["availability_category"], "HIGH");
        assert_eq!(result["estimated_response_time"]["estimated_hours"], 25);
    }

    #[tokio::test]
    async fn compatibility_rejects_mismatched_types() {
        let (status, payload) = send(
            build_router(),
            post_json(
                "/predict/compatibility",
                r#"{"donor": {"blood_type": "AB_POSITIVE"}, "patient": {"blood_type": "O_POSITIVE"}}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let result = &payload["result"];
        assert_eq!(result["score"], 0.0);
        assert_eq!(result["compatible"], false);
        assert_eq!(
            result["blood_compatibility"]["compatibility_level"],
            "INCOMPATIBLE"
        );
    }

    #[tokio::test]
    async fn risk_assessment_clamps_and_categorizes() {
        let (status, payload) = send(
            build_router(),
            post_json(
                "/predict/risk-assessment",
                r#"{"subject": {"age": 10, "chronic_conditions": ["asthma", "epilepsy"]}, "emergency_procedure": true}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let result = &payload["result"];
        assert_eq!(result["risk_score"], 1.0);
        assert_eq!(result["risk_category"], "CRITICAL");
        assert_eq!(
            result["monitoring_requirements"]["frequency"],
            "Continuous"
        );
    }

    #[tokio::test]
    async fn demand_forecast_stays_in_band() {
        let (status, payload) = send(
            build_router(),
            post_json("/predict/demand-forecast", r#"{"population_served": 50000}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let demand = payload["result"]["forecasted_demand"]
            .as_f64()
            .expect("forecast");
        assert!((8.0..=12.0).contains(&demand));
        assert_eq!(payload["result"]["forecast_period"], 7);
    }

    #[tokio::test]
    async fn malformed_json_yields_the_error_envelope() {
        let (status, payload) = send(
            build_router(),
            post_json("/predict/donor-availability", "{not json"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["error"], "Bad Request");
        assert_eq!(payload["message"], "Invalid JSON in request body");
        assert!(payload.get("timestamp").is_some());
    }

    #[tokio::test]
    async fn unknown_model_metrics_is_not_found() {
        let (status, payload) = send(
            build_router(),
            get_request("/models/sentiment_analyzer/metrics"),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(payload["message"], "Model sentiment_analyzer not found");
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (status, payload) = send(build_router(), get_request("/predict/horoscope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(payload["message"], "Route not found");
    }

    #[tokio::test]
    async fn model_metrics_serves_the_stored_record() {
        let (status, payload) = send(
            build_router(),
            get_request("/models/risk_assessor/metrics"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["model"], "risk_assessor");
        assert_eq!(payload["version"], "1.0.0-demo");
        let metrics = &payload["metrics"];
        for key in ["accuracy", "precision", "recall", "f1_score"] {
            let value = metrics[key].as_f64().expect("metric value");
            assert!((0.8..1.0).contains(&value), "{key} was {value}");
        }
        assert!(metrics.get("last_trained").is_some());
        let samples = metrics["training_samples"].as_u64().expect("samples");
        assert!((800..=1200).contains(&samples));
    }

    #[tokio::test]
    async fn training_returns_a_completed_report() {
        let (status, payload) = send(
            build_router(),
            post_json("/models/train/donor_predictor", ""),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], "success");
        assert_eq!(payload["model"], "donor_predictor");
        let result = &payload["training_result"];
        assert_eq!(result["status"], "completed");
        let seconds = result["training_time_seconds"].as_u64().expect("seconds");
        assert!((30..=120).contains(&seconds));
    }

    #[tokio::test]
    async fn training_an_unknown_model_is_not_found() {
        let (status, payload) =
            send(build_router(), post_json("/models/train/oracle", "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(payload["error"], "Bad Request");
        assert_eq!(payload["message"], "Model oracle not found");
    }

    #[tokio::test]
    async fn empty_prediction_bodies_fall_back_to_defaults() {
        let (status, payload) = send(
            build_router(),
            post_json("/predict/risk-assessment", "{}"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let result = &payload["result"];
        let score = result["risk_score"].as_f64().expect("score");
        assert!((score - 0.1).abs() < 1e-9);
        assert_eq!(result["risk_category"], "LOW");
        assert_eq!(result["assessment_type"], "donation");
    }
}
