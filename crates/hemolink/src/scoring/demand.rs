use serde::{Deserialize, Serialize};

use super::noise::NoiseSource;
use super::subject::DemandRequest;

pub(crate) const CONFIDENCE: f64 = 0.82;

/// Weights for the demand forecast heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandParams {
    /// Population served per daily unit of demand.
    pub demand_divisor: f64,
    /// Amplitude of the seasonal variation around the baseline.
    pub seasonal_amplitude: f64,
    /// Half-width of the confidence interval, as a fraction.
    pub interval_margin: f64,
    /// Daily demand above which the surge recommendations apply.
    pub surge_threshold: f64,
}

impl Default for DemandParams {
    fn default() -> Self {
        Self {
            demand_divisor: 5_000.0,
            seasonal_amplitude: 0.2,
            interval_margin: 0.2,
            surge_threshold: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower_bound: f64,
    pub upper_bound: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandOutcome {
    pub forecasted_demand: f64,
    pub confidence: f64,
    pub confidence_interval: ConfidenceInterval,
    pub forecast_period: u32,
    pub recommendations: Vec<String>,
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn forecast(
    request: &DemandRequest,
    params: &DemandParams,
    noise: &dyn NoiseSource,
) -> DemandOutcome {
    let base = f64::from(request.population_served) / params.demand_divisor;
    let seasonal = 1.0 + params.seasonal_amplitude * noise.uniform(-1.0, 1.0);
    let demand = base * seasonal;

    let recommendations = if demand > params.surge_threshold {
        vec![
            "Monitor inventory levels closely".to_string(),
            "Schedule regular donor drives".to_string(),
        ]
    } else {
        vec!["Standard inventory management".to_string()]
    };

    DemandOutcome {
        forecasted_demand: round_tenth(demand),
        confidence: CONFIDENCE,
        confidence_interval: ConfidenceInterval {
            lower_bound: round_tenth((demand * (1.0 - params.interval_margin)).max(0.0)),
            upper_bound: round_tenth(demand * (1.0 + params.interval_margin)),
        },
        forecast_period: request.forecast_days,
        recommendations,
    }
}
