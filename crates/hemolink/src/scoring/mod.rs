//! The scoring rules engine: four independent heuristic rules sharing the
//! blood-type matrix, the feature normalizer, and one injected noise
//! source. Every call is stateless; identical deterministic inputs yield
//! identical outputs, and the two intentionally noisy rules stay inside
//! documented bands.

pub mod availability;
pub mod blood;
pub mod compatibility;
pub mod demand;
pub mod features;
pub mod noise;
pub mod risk;
pub mod subject;

use std::sync::Arc;

use serde::Serialize;

pub use availability::{
    AvailabilityCategory, AvailabilityOutcome, AvailabilityParams, ResponseWindow,
};
pub use blood::BloodType;
pub use compatibility::{
    BloodCompatibility, CompatibilityLevel, CompatibilityOutcome, CompatibilityParams,
};
pub use demand::{ConfidenceInterval, DemandOutcome, DemandParams};
pub use noise::{EntropyNoise, NoiseSource};
pub use risk::{MonitoringPlan, RiskCategory, RiskFactor, RiskOutcome, RiskWeights};
pub use subject::{
    AssessmentType, AvailabilityRequest, CompatibilityRequest, DemandRequest, Gender, Location,
    MedicalHistory, RiskRequest, ScoringRequest, Subject, VitalSigns,
};

/// Stateless facade over the four scoring rules.
pub struct ScoringEngine {
    noise: Arc<dyn NoiseSource>,
    availability: AvailabilityParams,
    demand: DemandParams,
    compatibility: CompatibilityParams,
    risk: RiskWeights,
}

impl ScoringEngine {
    pub fn new(noise: Arc<dyn NoiseSource>) -> Self {
        Self::with_parameters(
            noise,
            AvailabilityParams::default(),
            DemandParams::default(),
            CompatibilityParams::default(),
            RiskWeights::default(),
        )
    }

    pub fn with_parameters(
        noise: Arc<dyn NoiseSource>,
        availability: AvailabilityParams,
        demand: DemandParams,
        compatibility: CompatibilityParams,
        risk: RiskWeights,
    ) -> Self {
        Self {
            noise,
            availability,
            demand,
            compatibility,
            risk,
        }
    }

    /// Dispatches a request to the matching rule.
    pub fn score(&self, request: &ScoringRequest) -> ScoringOutcome {
        match request {
            ScoringRequest::DonorAvailability(request) => {
                ScoringOutcome::DonorAvailability(self.assess_availability(request))
            }
            ScoringRequest::DemandForecast(request) => {
                ScoringOutcome::DemandForecast(self.forecast_demand(request))
            }
            ScoringRequest::Compatibility(request) => {
                ScoringOutcome::Compatibility(self.assess_compatibility(request))
            }
            ScoringRequest::RiskAssessment(request) => {
                ScoringOutcome::RiskAssessment(self.assess_risk(request))
            }
        }
    }

    pub fn assess_availability(&self, request: &AvailabilityRequest) -> AvailabilityOutcome {
        availability::assess(request, &self.availability)
    }

    pub fn forecast_demand(&self, request: &DemandRequest) -> DemandOutcome {
        demand::forecast(request, &self.demand, self.noise.as_ref())
    }

    pub fn assess_compatibility(&self, request: &CompatibilityRequest) -> CompatibilityOutcome {
        compatibility::assess(request, &self.compatibility, self.noise.as_ref())
    }

    pub fn assess_risk(&self, request: &RiskRequest) -> RiskOutcome {
        risk::assess(request, &self.risk)
    }
}

/// Typed result of one scoring call. Serializes as the bare per-kind
/// result object; the HTTP layer wraps it in the prediction envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ScoringOutcome {
    DonorAvailability(AvailabilityOutcome),
    DemandForecast(DemandOutcome),
    Compatibility(CompatibilityOutcome),
    RiskAssessment(RiskOutcome),
}

impl ScoringOutcome {
    pub fn prediction_type(&self) -> &'static str {
        match self {
            ScoringOutcome::DonorAvailability(_) => "donor_availability",
            ScoringOutcome::DemandForecast(_) => "demand_forecast",
            ScoringOutcome::Compatibility(_) => "compatibility",
            ScoringOutcome::RiskAssessment(_) => "risk_assessment",
        }
    }

    pub fn confidence(&self) -> f64 {
        match self {
            ScoringOutcome::DonorAvailability(outcome) => outcome.confidence,
            ScoringOutcome::DemandForecast(outcome) => outcome.confidence,
            ScoringOutcome::Compatibility(outcome) => outcome.confidence,
            ScoringOutcome::RiskAssessment(outcome) => outcome.confidence,
        }
    }
}
