use serde::{Deserialize, Serialize};

use super::blood::BloodType;
use super::features;
use super::subject::AvailabilityRequest;

pub(crate) const CONFIDENCE: f64 = 0.85;

const MIN_RESPONSE_HOURS: u32 = 2;
const MAX_RESPONSE_HOURS: u32 = 48;

/// Weights for the availability heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityParams {
    /// Fraction added to the baseline at maximum urgency.
    pub urgency_weight: f64,
    /// Response-time scale in hours.
    pub base_response_hours: f64,
}

impl Default for AvailabilityParams {
    fn default() -> Self {
        Self {
            urgency_weight: 0.2,
            base_response_hours: 24.0,
        }
    }
}

/// Baseline donor availability per blood type. O_NEGATIVE sits mid-table:
/// universal donors are scarce even though O stock is common.
pub fn base_availability(blood_type: BloodType) -> f64 {
    match blood_type {
        BloodType::ONegative => 0.6,
        BloodType::OPositive => 0.8,
        BloodType::APositive => 0.7,
        BloodType::ANegative => 0.5,
        BloodType::BPositive => 0.6,
        BloodType::BNegative => 0.4,
        BloodType::AbPositive => 0.5,
        BloodType::AbNegative => 0.3,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityCategory {
    High,
    Medium,
    Low,
}

/// Expected donor response window in hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseWindow {
    pub estimated_hours: u32,
    pub min_hours: u32,
    pub max_hours: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityOutcome {
    pub availability_score: f64,
    pub availability_category: AvailabilityCategory,
    pub confidence: f64,
    pub estimated_response_time: ResponseWindow,
    pub recommendations: Vec<String>,
}

pub(crate) fn assess(
    request: &AvailabilityRequest,
    params: &AvailabilityParams,
) -> AvailabilityOutcome {
    let base = base_availability(request.blood_type);
    let urgency = features::urgency_factor(request.urgency_level);
    let score = (base * (1.0 + urgency * params.urgency_weight)).min(1.0);

    let category = if score > 0.7 {
        AvailabilityCategory::High
    } else if score > 0.5 {
        AvailabilityCategory::Medium
    } else {
        AvailabilityCategory::Low
    };

    // Higher availability means a faster response; never promise under two
    // hours.
    let estimated_hours =
        ((params.base_response_hours * (2.0 - score)).round() as u32).max(MIN_RESPONSE_HOURS);

    let recommendations = if score < 0.6 {
        vec![
            "Contact regular donors".to_string(),
            "Check nearby blood banks".to_string(),
        ]
    } else {
        vec!["Standard protocols apply".to_string()]
    };

    AvailabilityOutcome {
        availability_score: score,
        availability_category: category,
        confidence: CONFIDENCE,
        estimated_response_time: ResponseWindow {
            estimated_hours,
            min_hours: MIN_RESPONSE_HOURS,
            max_hours: MAX_RESPONSE_HOURS,
        },
        recommendations,
    }
}
