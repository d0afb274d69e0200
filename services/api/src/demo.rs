use clap::Args;
use hemolink::error::AppError;
use hemolink::models::{ModelKind, ModelRegistry};
use hemolink::scoring::{
    AvailabilityRequest, BloodType, CompatibilityRequest, DemandRequest, EntropyNoise,
    NoiseSource, RiskRequest, ScoringRequest, Subject,
};
use std::sync::Arc;

use crate::routes::{SERVICE_NAME, SERVICE_VERSION};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Seed the noise source so repeated runs print identical envelopes.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let noise: Arc<dyn NoiseSource> = Arc::new(match args.seed {
        Some(seed) => EntropyNoise::seeded(seed),
        None => EntropyNoise::new(),
    });

    let registry = ModelRegistry::new(noise.clone());
    let engine = registry.engine(noise);

    println!("{SERVICE_NAME} {SERVICE_VERSION} - prediction demo");

    for request in sample_requests() {
        let outcome = engine.score(&request);
        println!("\n== {} ==", outcome.prediction_type());
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }

    println!("\n== training run ==");
    let report = registry.train(ModelKind::RiskAssessor.name())?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    let record = registry.record(ModelKind::RiskAssessor);
    println!(
        "\n{} v{}: accuracy {:.3}, {} samples, trained {}",
        ModelKind::RiskAssessor.name(),
        record.version,
        record.metrics.accuracy,
        record.training_samples,
        record.trained_at.to_rfc3339(),
    );

    Ok(())
}

fn sample_requests() -> Vec<ScoringRequest> {
    vec![
        ScoringRequest::DonorAvailability(AvailabilityRequest {
            blood_type: BloodType::ONegative,
            urgency_level: 4,
        }),
        ScoringRequest::DemandForecast(DemandRequest {
            forecast_days: 14,
            hospital_capacity: 250,
            population_served: 120_000,
        }),
        ScoringRequest::Compatibility(CompatibilityRequest {
            donor: Subject {
                blood_type: BloodType::ONegative,
                age: 44,
                ..Subject::default()
            },
            patient: Subject {
                blood_type: BloodType::AbPositive,
                age: 12,
                ..Subject::default()
            },
            ..CompatibilityRequest::default()
        }),
        ScoringRequest::RiskAssessment(RiskRequest {
            subject: Subject {
                age: 71,
                ..Subject::default()
            },
            emergency_procedure: true,
            ..RiskRequest::default()
        }),
    ]
}
