use serde::{Deserialize, Serialize};

use super::blood::BloodType;
use super::noise::NoiseSource;
use super::subject::{CompatibilityRequest, Subject};

pub(crate) const CONFIDENCE: f64 = 0.9;

/// Weights for the compatibility heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityParams {
    /// Score for a blood-type match before secondary factors.
    pub base_score: f64,
    /// Lower bound of the secondary-factor multiplier.
    pub secondary_floor: f64,
    /// Span of the secondary-factor multiplier above the floor.
    pub secondary_span: f64,
    /// Score above which the match is declared compatible.
    pub compatible_threshold: f64,
}

impl Default for CompatibilityParams {
    fn default() -> Self {
        Self {
            base_score: 0.95,
            secondary_floor: 0.8,
            secondary_span: 0.2,
            compatible_threshold: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompatibilityLevel {
    Perfect,
    Compatible,
    Incompatible,
}

/// Matrix verdict carried alongside the overall score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodCompatibility {
    pub compatible: bool,
    pub donor_type: BloodType,
    pub patient_type: BloodType,
    pub compatibility_level: CompatibilityLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityOutcome {
    pub score: f64,
    pub compatible: bool,
    pub confidence: f64,
    pub blood_compatibility: BloodCompatibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
}

pub(crate) fn assess(
    request: &CompatibilityRequest,
    params: &CompatibilityParams,
    noise: &dyn NoiseSource,
) -> CompatibilityOutcome {
    let donor_type = request.donor.blood_type;
    let patient_type = request.patient.blood_type;
    let matched = donor_type.is_compatible(patient_type);

    let level = if !matched {
        CompatibilityLevel::Incompatible
    } else if donor_type == patient_type {
        CompatibilityLevel::Perfect
    } else {
        CompatibilityLevel::Compatible
    };

    let blood_compatibility = BloodCompatibility {
        compatible: matched,
        donor_type,
        patient_type,
        compatibility_level: level,
    };

    let risk_factors = secondary_risk_factors(&request.donor, &request.patient);

    // A matrix mismatch ends the assessment; nothing else can rescue it.
    if !matched {
        return CompatibilityOutcome {
            score: 0.0,
            compatible: false,
            confidence: CONFIDENCE,
            blood_compatibility,
            reason: Some("Blood type incompatibility".to_string()),
            risk_factors,
            recommendations: vec![
                "Find alternative donor with compatible blood type".to_string()
            ],
        };
    }

    // Secondary factors the matrix cannot see, modeled as a scaling draw.
    let score = params.base_score * (params.secondary_floor + params.secondary_span * noise.unit());

    CompatibilityOutcome {
        score,
        compatible: score > params.compatible_threshold,
        confidence: CONFIDENCE,
        blood_compatibility,
        reason: None,
        risk_factors,
        recommendations: vec!["Proceed with standard protocols".to_string()],
    }
}

fn secondary_risk_factors(donor: &Subject, patient: &Subject) -> Vec<String> {
    let mut risks = Vec::new();

    if donor.age > 60 {
        risks.push("Donor age over 60".to_string());
    }
    if patient.age < 18 {
        risks.push("Pediatric patient requires special handling".to_string());
    }
    if donor.medical_history.recent_illness {
        risks.push("Donor recent illness history".to_string());
    }
    if patient.medical_history.immune_compromised {
        risks.push("Patient is immunocompromised".to_string());
    }

    risks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::noise::EntropyNoise;
    use crate::scoring::subject::MedicalHistory;

    fn subject(blood_type: BloodType) -> Subject {
        Subject {
            blood_type,
            ..Subject::default()
        }
    }

    fn request(donor: BloodType, patient: BloodType) -> CompatibilityRequest {
        CompatibilityRequest {
            donor: subject(donor),
            patient: subject(patient),
            ..CompatibilityRequest::default()
        }
    }

    #[test]
    fn incompatible_pair_scores_zero() {
        let noise = EntropyNoise::seeded(5);
        let outcome = assess(
            &request(BloodType::AbPositive, BloodType::OPositive),
            &CompatibilityParams::default(),
            &noise,
        );
        assert_eq!(outcome.score, 0.0);
        assert!(!outcome.compatible);
        assert_eq!(
            outcome.blood_compatibility.compatibility_level,
            CompatibilityLevel::Incompatible
        );
        assert_eq!(outcome.reason.as_deref(), Some("Blood type incompatibility"));
        assert_eq!(
            outcome.recommendations,
            ["Find alternative donor with compatible blood type"]
        );
    }

    #[test]
    fn compatible_score_stays_in_documented_band() {
        let noise = EntropyNoise::seeded(17);
        let params = CompatibilityParams::default();
        for _ in 0..64 {
            let outcome = assess(
                &request(BloodType::ONegative, BloodType::BPositive),
                &params,
                &noise,
            );
            // 0.95 * [0.8, 1.0)
            assert!((0.76..0.95).contains(&outcome.score));
            assert!(outcome.compatible);
            assert_eq!(
                outcome.blood_compatibility.compatibility_level,
                CompatibilityLevel::Compatible
            );
            assert!(outcome.reason.is_none());
        }
    }

    #[test]
    fn identical_types_are_a_perfect_match() {
        let noise = EntropyNoise::seeded(29);
        let outcome = assess(
            &request(BloodType::ANegative, BloodType::ANegative),
            &CompatibilityParams::default(),
            &noise,
        );
        assert_eq!(
            outcome.blood_compatibility.compatibility_level,
            CompatibilityLevel::Perfect
        );
        assert_eq!(outcome.recommendations, ["Proceed with standard protocols"]);
    }

    #[test]
    fn secondary_risk_factors_are_reported() {
        let noise = EntropyNoise::seeded(31);
        let mut request = request(BloodType::OPositive, BloodType::OPositive);
        request.donor.age = 64;
        request.donor.medical_history.recent_illness = true;
        request.patient.age = 9;
        request.patient.medical_history = MedicalHistory {
            immune_compromised: true,
            ..MedicalHistory::default()
        };

        let outcome = assess(&request, &CompatibilityParams::default(), &noise);
        assert_eq!(
            outcome.risk_factors,
            [
                "Donor age over 60",
                "Pediatric patient requires special handling",
                "Donor recent illness history",
                "Patient is immunocompromised",
            ]
        );
    }
}
