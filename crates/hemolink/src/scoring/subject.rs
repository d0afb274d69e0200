use serde::{Deserialize, Serialize};

use super::blood::BloodType;

fn default_age() -> u32 {
    30
}

fn default_blood_type() -> BloodType {
    BloodType::OPositive
}

fn default_urgency() -> u8 {
    1
}

fn default_units() -> u32 {
    1
}

fn default_forecast_days() -> u32 {
    7
}

fn default_hospital_capacity() -> u32 {
    100
}

fn default_population_served() -> u32 {
    50_000
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Donor or patient snapshot decoded from a request. Every field falls back
/// to a documented default; out-of-range values are clamped downstream
/// rather than rejected here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    #[serde(default = "default_age")]
    pub age: u32,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default = "default_blood_type")]
    pub blood_type: BloodType,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub vitals: Option<VitalSigns>,
    #[serde(flatten)]
    pub medical_history: MedicalHistory,
    #[serde(default)]
    pub donation_count: Option<u32>,
    #[serde(default)]
    pub days_since_last_donation: Option<u32>,
    #[serde(default)]
    pub health_score: Option<f64>,
}

impl Default for Subject {
    fn default() -> Self {
        Self {
            age: default_age(),
            gender: None,
            weight: None,
            height: None,
            blood_type: default_blood_type(),
            location: None,
            vitals: None,
            medical_history: MedicalHistory::default(),
            donation_count: None,
            days_since_last_donation: None,
            health_score: None,
        }
    }
}

/// Medical history flags and lists. Flattened onto the subject on the wire,
/// matching the flat request bodies the endpoints accept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedicalHistory {
    #[serde(default)]
    pub chronic_conditions: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub previous_adverse_reactions: bool,
    #[serde(default)]
    pub recent_illness: bool,
    #[serde(default)]
    pub immune_compromised: bool,
    #[serde(default)]
    pub smoking: bool,
    #[serde(default)]
    pub alcohol_consumption: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VitalSigns {
    #[serde(default)]
    pub blood_pressure_systolic: Option<f64>,
    #[serde(default)]
    pub blood_pressure_diastolic: Option<f64>,
    #[serde(default)]
    pub heart_rate: Option<f64>,
    #[serde(default)]
    pub hemoglobin: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub population_density: Option<f64>,
    #[serde(default)]
    pub is_urban: Option<bool>,
    #[serde(default)]
    pub distance_to_major_city: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentType {
    #[default]
    Donation,
    Transfusion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    #[serde(default = "default_blood_type")]
    pub blood_type: BloodType,
    #[serde(default = "default_urgency")]
    pub urgency_level: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandRequest {
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,
    #[serde(default = "default_hospital_capacity")]
    pub hospital_capacity: u32,
    #[serde(default = "default_population_served")]
    pub population_served: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityRequest {
    #[serde(default)]
    pub donor: Subject,
    #[serde(default)]
    pub patient: Subject,
    #[serde(default = "default_urgency")]
    pub urgency_level: u8,
    #[serde(default = "default_units")]
    pub units_required: u32,
}

impl Default for CompatibilityRequest {
    fn default() -> Self {
        Self {
            donor: Subject::default(),
            patient: Subject::default(),
            urgency_level: default_urgency(),
            units_required: default_units(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskRequest {
    #[serde(default)]
    pub subject: Subject,
    #[serde(default)]
    pub assessment_type: AssessmentType,
    #[serde(default = "default_urgency")]
    pub urgency_level: u8,
    #[serde(default = "default_units")]
    pub units_required: u32,
    #[serde(default)]
    pub emergency_procedure: bool,
}

impl Default for RiskRequest {
    fn default() -> Self {
        Self {
            subject: Subject::default(),
            assessment_type: AssessmentType::default(),
            urgency_level: default_urgency(),
            units_required: default_units(),
            emergency_procedure: false,
        }
    }
}

/// The four assessment kinds carried by the prediction endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringRequest {
    DonorAvailability(AvailabilityRequest),
    DemandForecast(DemandRequest),
    Compatibility(CompatibilityRequest),
    RiskAssessment(RiskRequest),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn subject_defaults_apply_to_empty_body() {
        let subject: Subject = serde_json::from_value(json!({})).expect("deserializes");
        assert_eq!(subject.age, 30);
        assert_eq!(subject.blood_type, BloodType::OPositive);
        assert!(subject.medical_history.chronic_conditions.is_empty());
        assert!(!subject.medical_history.immune_compromised);
    }

    #[test]
    fn medical_history_fields_live_on_the_subject() {
        let subject: Subject = serde_json::from_value(json!({
            "age": 42,
            "chronic_conditions": ["diabetes"],
            "recent_illness": true,
        }))
        .expect("deserializes");
        assert_eq!(subject.medical_history.chronic_conditions, ["diabetes"]);
        assert!(subject.medical_history.recent_illness);
    }

    #[test]
    fn risk_request_defaults_cover_missing_fields() {
        let request: RiskRequest = serde_json::from_value(json!({
            "subject": {"age": 70}
        }))
        .expect("deserializes");
        assert_eq!(request.subject.age, 70);
        assert_eq!(request.assessment_type, AssessmentType::Donation);
        assert!(!request.emergency_procedure);
        assert_eq!(request.urgency_level, 1);
    }

    #[test]
    fn scoring_request_round_trips_with_kind_tag() {
        let request = ScoringRequest::DonorAvailability(AvailabilityRequest {
            blood_type: BloodType::ONegative,
            urgency_level: 4,
        });
        let value = serde_json::to_value(&request).expect("serializes");
        assert_eq!(value["kind"], "donor_availability");
        let back: ScoringRequest = serde_json::from_value(value).expect("deserializes");
        assert!(matches!(
            back,
            ScoringRequest::DonorAvailability(AvailabilityRequest {
                blood_type: BloodType::ONegative,
                urgency_level: 4,
            })
        ));
    }
}
