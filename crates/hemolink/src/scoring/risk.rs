use serde::{Deserialize, Serialize};

use super::features;
use super::subject::{AssessmentType, RiskRequest};

pub(crate) const CONFIDENCE: f64 = 0.88;

const HIGH_RISK_CONDITIONS: [&str; 4] =
    ["diabetes", "heart_disease", "kidney_disease", "liver_disease"];
const HIGH_RISK_MEDICATIONS: [&str; 3] =
    ["anticoagulants", "immunosuppressants", "chemotherapy"];

/// Additive weights for the risk heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskWeights {
    pub base: f64,
    /// Added for subjects over 65.
    pub elderly: f64,
    /// Added for subjects under 18; exclusive with `elderly`.
    pub minor: f64,
    pub per_chronic_condition: f64,
    pub emergency: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            base: 0.1,
            elderly: 0.3,
            minor: 0.2,
            per_chronic_condition: 0.15,
            emergency: 0.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskCategory {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskCategory {
    /// Closed-open tiers; only CRITICAL includes its upper bound.
    pub fn from_score(score: f64) -> Self {
        if score < 0.3 {
            RiskCategory::Low
        } else if score < 0.6 {
            RiskCategory::Moderate
        } else if score < 0.8 {
            RiskCategory::High
        } else {
            RiskCategory::Critical
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskSeverity {
    Moderate,
    High,
}

/// A single contributor to the overall risk picture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub factor: String,
    pub severity: RiskSeverity,
    pub description: String,
}

/// Post-procedure monitoring required for a risk tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringPlan {
    pub frequency: String,
    pub duration: String,
    pub parameters: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskOutcome {
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    pub confidence: f64,
    pub assessment_type: AssessmentType,
    pub risk_factors: Vec<RiskFactor>,
    pub mitigation_strategies: Vec<String>,
    pub recommendations: Vec<String>,
    pub monitoring_requirements: MonitoringPlan,
}

pub(crate) fn assess(request: &RiskRequest, weights: &RiskWeights) -> RiskOutcome {
    let subject = &request.subject;
    let chronic_count = subject.medical_history.chronic_conditions.len();

    let mut score = weights.base;
    // Age brackets are exclusive: a subject is elderly or a minor, never both.
    if subject.age > 65 {
        score += weights.elderly;
    } else if subject.age < 18 {
        score += weights.minor;
    }
    score += weights.per_chronic_condition * chronic_count as f64;
    if request.emergency_procedure {
        score += weights.emergency;
    }
    let score = score.min(1.0);

    let category = RiskCategory::from_score(score);

    RiskOutcome {
        risk_score: score,
        risk_category: category,
        confidence: CONFIDENCE,
        assessment_type: request.assessment_type,
        risk_factors: identify_risk_factors(request),
        mitigation_strategies: mitigation_strategies(score, request),
        recommendations: tier_recommendations(category),
        monitoring_requirements: monitoring_plan(category),
    }
}

fn identify_risk_factors(request: &RiskRequest) -> Vec<RiskFactor> {
    let subject = &request.subject;
    let mut factors = Vec::new();

    if subject.age < 18 {
        factors.push(RiskFactor {
            factor: "Young age".to_string(),
            severity: RiskSeverity::Moderate,
            description: "Pediatric subjects require special protocols".to_string(),
        });
    } else if subject.age > 65 {
        factors.push(RiskFactor {
            factor: "Advanced age".to_string(),
            severity: RiskSeverity::Moderate,
            description: "Increased risk of complications in elderly subjects".to_string(),
        });
    }

    for condition in &subject.medical_history.chronic_conditions {
        if HIGH_RISK_CONDITIONS
            .iter()
            .any(|known| condition.eq_ignore_ascii_case(known))
        {
            factors.push(RiskFactor {
                factor: format!("Chronic condition: {condition}"),
                severity: RiskSeverity::High,
                description: format!("{condition} increases procedural risks"),
            });
        }
    }

    for medication in &subject.medical_history.medications {
        if HIGH_RISK_MEDICATIONS
            .iter()
            .any(|known| medication.eq_ignore_ascii_case(known))
        {
            factors.push(RiskFactor {
                factor: format!("High-risk medication: {medication}"),
                severity: RiskSeverity::High,
                description: format!("{medication} may affect procedure safety"),
            });
        }
    }

    let vitals = subject.vitals.clone().unwrap_or_default();
    let systolic = vitals
        .blood_pressure_systolic
        .unwrap_or(features::DEFAULT_SYSTOLIC);
    if !(90.0..=160.0).contains(&systolic) {
        factors.push(RiskFactor {
            factor: "Abnormal blood pressure".to_string(),
            severity: RiskSeverity::High,
            description: format!("Blood pressure {systolic:.0} mmHg is outside safe range"),
        });
    }

    let hemoglobin = vitals.hemoglobin.unwrap_or(features::DEFAULT_HEMOGLOBIN);
    if hemoglobin < 12.0 {
        factors.push(RiskFactor {
            factor: "Low hemoglobin".to_string(),
            severity: RiskSeverity::Moderate,
            description: format!("Hemoglobin {hemoglobin:.1} g/dL may indicate anemia"),
        });
    }

    if request.emergency_procedure {
        factors.push(RiskFactor {
            factor: "Emergency procedure".to_string(),
            severity: RiskSeverity::High,
            description: "Emergency procedures carry increased risks".to_string(),
        });
    }

    factors
}

fn mitigation_strategies(score: f64, request: &RiskRequest) -> Vec<String> {
    let mut strategies = Vec::new();

    if score > 0.6 {
        strategies.extend([
            "Implement enhanced monitoring protocols".to_string(),
            "Ensure senior medical staff supervision".to_string(),
            "Prepare emergency response equipment".to_string(),
            "Consider pre-medication if appropriate".to_string(),
        ]);
    }

    if score > 0.3 {
        strategies.extend([
            "Conduct thorough pre-procedure assessment".to_string(),
            "Monitor vital signs closely during procedure".to_string(),
            "Have emergency medications readily available".to_string(),
        ]);
    }

    if request.subject.age > 65 {
        strategies.push("Use age-appropriate protocols and dosing".to_string());
    }

    if request.emergency_procedure {
        strategies.push("Follow emergency procedure protocols".to_string());
    }

    strategies
}

fn tier_recommendations(category: RiskCategory) -> Vec<String> {
    let lines: &[&str] = match category {
        RiskCategory::Low => &[
            "Proceed with standard protocols",
            "Routine monitoring sufficient",
        ],
        RiskCategory::Moderate => &[
            "Proceed with enhanced precautions",
            "Consider additional pre-procedure tests",
            "Ensure experienced staff availability",
        ],
        RiskCategory::High => &[
            "Consider postponing if not urgent",
            "Require specialist consultation",
            "Implement comprehensive monitoring",
            "Prepare for potential complications",
        ],
        RiskCategory::Critical => &[
            "Proceed only if life-threatening emergency",
            "Require multiple specialist consultations",
            "Implement maximum monitoring protocols",
            "Have emergency team on standby",
        ],
    };
    lines.iter().map(|line| line.to_string()).collect()
}

fn monitoring_plan(category: RiskCategory) -> MonitoringPlan {
    let (frequency, duration, parameters): (&str, &str, &[&str]) = match category {
        RiskCategory::Low => (
            "Standard",
            "2 hours post-procedure",
            &["vital signs", "general condition"],
        ),
        RiskCategory::Moderate => (
            "Every 15 minutes",
            "4 hours post-procedure",
            &["vital signs", "neurological status", "bleeding assessment"],
        ),
        RiskCategory::High => (
            "Every 10 minutes",
            "8 hours post-procedure",
            &[
                "continuous vital signs",
                "neurological status",
                "laboratory values",
                "fluid balance",
            ],
        ),
        RiskCategory::Critical => (
            "Continuous",
            "24 hours post-procedure",
            &[
                "continuous monitoring",
                "intensive care protocols",
                "frequent laboratory assessments",
            ],
        ),
    };

    MonitoringPlan {
        frequency: frequency.to_string(),
        duration: duration.to_string(),
        parameters: parameters.iter().map(|p| p.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::subject::{MedicalHistory, Subject, VitalSigns};

    fn request_for(age: u32, chronic: &[&str], emergency: bool) -> RiskRequest {
        RiskRequest {
            subject: Subject {
                age,
                medical_history: MedicalHistory {
                    chronic_conditions: chronic.iter().map(|c| c.to_string()).collect(),
                    ..MedicalHistory::default()
                },
                ..Subject::default()
            },
            emergency_procedure: emergency,
            ..RiskRequest::default()
        }
    }

    #[test]
    fn elderly_subject_lands_in_moderate() {
        let outcome = assess(&request_for(70, &[], false), &RiskWeights::default());
        assert!((outcome.risk_score - 0.4).abs() < 1e-9);
        assert_eq!(outcome.risk_category, RiskCategory::Moderate);
        assert_eq!(
            outcome.recommendations,
            [
                "Proceed with enhanced precautions",
                "Consider additional pre-procedure tests",
                "Ensure experienced staff availability"
            ]
        );
    }

    #[test]
    fn pediatric_emergency_with_conditions_is_critical() {
        let outcome = assess(
            &request_for(10, &["asthma", "epilepsy"], true),
            &RiskWeights::default(),
        );
        // 0.1 + 0.2 + 0.3 + 0.4 clamps to 1.0
        assert_eq!(outcome.risk_score, 1.0);
        assert_eq!(outcome.risk_category, RiskCategory::Critical);
        assert_eq!(
            outcome.recommendations,
            [
                "Proceed only if life-threatening emergency",
                "Require multiple specialist consultations",
                "Implement maximum monitoring protocols",
                "Have emergency team on standby"
            ]
        );
        assert_eq!(outcome.monitoring_requirements.frequency, "Continuous");
        assert_eq!(
            outcome.monitoring_requirements.duration,
            "24 hours post-procedure"
        );
    }

    #[test]
    fn healthy_adult_is_low_risk() {
        let outcome = assess(&request_for(35, &[], false), &RiskWeights::default());
        assert!((outcome.risk_score - 0.1).abs() < 1e-9);
        assert_eq!(outcome.risk_category, RiskCategory::Low);
        assert_eq!(outcome.monitoring_requirements.frequency, "Standard");
        assert!(outcome.mitigation_strategies.is_empty());
        assert!(outcome.risk_factors.is_empty());
    }

    #[test]
    fn age_brackets_are_exclusive() {
        let minor = assess(&request_for(17, &[], false), &RiskWeights::default());
        let elderly = assess(&request_for(66, &[], false), &RiskWeights::default());
        assert!((minor.risk_score - 0.3).abs() < 1e-9);
        assert!((elderly.risk_score - 0.4).abs() < 1e-9);
    }

    #[test]
    fn named_conditions_and_vitals_surface_as_factors() {
        let mut request = request_for(70, &["Diabetes", "migraine"], true);
        request.subject.vitals = Some(VitalSigns {
            blood_pressure_systolic: Some(172.0),
            hemoglobin: Some(10.4),
            ..VitalSigns::default()
        });
        request.subject.medical_history.medications = vec!["Anticoagulants".to_string()];

        let outcome = assess(&request, &RiskWeights::default());
        let factors: Vec<&str> = outcome
            .risk_factors
            .iter()
            .map(|f| f.factor.as_str())
            .collect();
        assert_eq!(
            factors,
            [
                "Advanced age",
                "Chronic condition: Diabetes",
                "High-risk medication: Anticoagulants",
                "Abnormal blood pressure",
                "Low hemoglobin",
                "Emergency procedure",
            ]
        );
        assert!(outcome
            .mitigation_strategies
            .contains(&"Use age-appropriate protocols and dosing".to_string()));
        assert!(outcome
            .mitigation_strategies
            .contains(&"Follow emergency procedure protocols".to_string()));
    }

    #[test]
    fn tier_boundaries_are_closed_open() {
        assert_eq!(RiskCategory::from_score(0.0), RiskCategory::Low);
        assert_eq!(RiskCategory::from_score(0.3), RiskCategory::Moderate);
        assert_eq!(RiskCategory::from_score(0.6), RiskCategory::High);
        assert_eq!(RiskCategory::from_score(0.8), RiskCategory::Critical);
        assert_eq!(RiskCategory::from_score(1.0), RiskCategory::Critical);
    }
}
