//! Synthetic training corpora standing in for the historical data the demo
//! service never has. Rows are built through the feature normalizer so the
//! simulated training path exercises the same vectors a real model would
//! see.

use crate::scoring::blood::BloodType;
use crate::scoring::features;
use crate::scoring::noise::NoiseSource;
use crate::scoring::subject::{MedicalHistory, Subject, VitalSigns};

use super::ModelKind;

pub(crate) const MIN_SAMPLES: u32 = 800;
pub(crate) const MAX_SAMPLES: u32 = 1200;

const CONDITION_POOL: [&str; 6] = [
    "diabetes",
    "hypertension",
    "asthma",
    "heart_disease",
    "thalassemia",
    "anemia",
];

// Approximate population shares, most common first; pairs with the order
// of BLOOD_TYPE_ORDER below.
const BLOOD_TYPE_ORDER: [BloodType; 8] = [
    BloodType::OPositive,
    BloodType::APositive,
    BloodType::BPositive,
    BloodType::AbPositive,
    BloodType::ONegative,
    BloodType::ANegative,
    BloodType::BNegative,
    BloodType::AbNegative,
];
const BLOOD_TYPE_SHARES: [f64; 8] = [0.37, 0.36, 0.12, 0.06, 0.06, 0.02, 0.01, 0.01];

#[derive(Debug, Clone)]
pub struct TrainingDataset {
    pub kind: ModelKind,
    pub rows: Vec<Vec<f64>>,
    pub labels: Vec<bool>,
}

impl TrainingDataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn positive_rate(&self) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        self.labels.iter().filter(|label| **label).count() as f64 / self.labels.len() as f64
    }
}

/// Base rate of positive labels per model, mirroring the historical
/// outcome rates the demo corpus imitates.
fn positive_rate(kind: ModelKind) -> f64 {
    match kind {
        ModelKind::DonorPredictor => 0.7,
        ModelKind::DemandForecaster => 0.85,
        ModelKind::CompatibilityMatcher => 0.75,
        ModelKind::RiskAssessor => 0.25,
    }
}

pub(crate) fn build(kind: ModelKind, noise: &dyn NoiseSource) -> TrainingDataset {
    let samples = noise.int_between(MIN_SAMPLES, MAX_SAMPLES) as usize;
    let rate = positive_rate(kind);

    let mut rows = Vec::with_capacity(samples);
    let mut labels = Vec::with_capacity(samples);
    for _ in 0..samples {
        rows.push(synthetic_row(kind, noise));
        labels.push(noise.unit() < rate);
    }

    TrainingDataset { kind, rows, labels }
}

fn synthetic_row(kind: ModelKind, noise: &dyn NoiseSource) -> Vec<f64> {
    match kind {
        ModelKind::DonorPredictor => {
            let subject = synthetic_subject(noise);
            let mut row = features::subject_features(&subject);
            row.extend(features::blood_type_one_hot(subject.blood_type));
            row.extend(features::location_features(None));
            row
        }
        ModelKind::DemandForecaster => {
            let (hour_sin, hour_cos) = features::hour_cycle(noise.uniform(0.0, 24.0));
            let (dow_sin, dow_cos) = features::weekday_cycle(noise.uniform(0.0, 7.0));
            vec![
                hour_sin,
                hour_cos,
                dow_sin,
                dow_cos,
                noise.uniform(0.2, 1.0),  // capacity utilization
                noise.uniform(0.1, 1.0),  // population served, scaled
                noise.uniform(0.0, 0.3),  // emergency event rate
            ]
        }
        ModelKind::CompatibilityMatcher => {
            let donor = synthetic_subject(noise);
            let patient = synthetic_subject(noise);
            let compatible = donor.blood_type.is_compatible(patient.blood_type);
            let age_gap = (f64::from(donor.age) - f64::from(patient.age)).abs();
            vec![
                if compatible { 1.0 } else { 0.0 },
                features::proximity_feature(age_gap, 50.0),
                features::proximity_feature(noise.uniform(0.0, 120.0), 500.0),
                features::health_score(donor.health_score),
                features::urgency_factor(noise.int_between(1, 5) as u8),
            ]
        }
        ModelKind::RiskAssessor => {
            let subject = synthetic_subject(noise);
            let mut row = features::subject_features(&subject);
            row.extend(features::context_features(
                noise.int_between(1, 5) as u8,
                noise.int_between(1, 4),
                noise.unit() < 0.2,
            ));
            row.extend(features::environment_features());
            row
        }
    }
}

fn synthetic_subject(noise: &dyn NoiseSource) -> Subject {
    let condition_count = noise.int_between(0, 3) as usize;
    let chronic_conditions = CONDITION_POOL
        .iter()
        .take(condition_count)
        .map(|condition| condition.to_string())
        .collect();

    Subject {
        age: noise.int_between(16, 90),
        weight: Some(noise.uniform(50.0, 110.0)),
        height: Some(noise.uniform(150.0, 195.0)),
        blood_type: sample_blood_type(noise),
        vitals: Some(VitalSigns {
            blood_pressure_systolic: Some(noise.uniform(95.0, 175.0)),
            blood_pressure_diastolic: Some(noise.uniform(55.0, 105.0)),
            heart_rate: Some(noise.uniform(50.0, 110.0)),
            hemoglobin: Some(noise.uniform(9.5, 17.5)),
        }),
        medical_history: MedicalHistory {
            chronic_conditions,
            ..MedicalHistory::default()
        },
        donation_count: Some(noise.int_between(0, 40)),
        days_since_last_donation: Some(noise.int_between(0, 365)),
        health_score: Some(noise.uniform(0.5, 1.0)),
        ..Subject::default()
    }
}

fn sample_blood_type(noise: &dyn NoiseSource) -> BloodType {
    let draw = noise.unit();
    let mut cumulative = 0.0;
    for (blood_type, share) in BLOOD_TYPE_ORDER.iter().zip(BLOOD_TYPE_SHARES) {
        cumulative += share;
        if draw < cumulative {
            return *blood_type;
        }
    }
    BloodType::AbNegative
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::noise::EntropyNoise;

    #[test]
    fn sample_counts_stay_in_range() {
        let noise = EntropyNoise::seeded(2);
        for kind in ModelKind::ALL {
            let dataset = build(kind, &noise);
            assert!((MIN_SAMPLES as usize..=MAX_SAMPLES as usize).contains(&dataset.len()));
            assert_eq!(dataset.rows.len(), dataset.labels.len());
            assert!(!dataset.is_empty());
        }
    }

    #[test]
    fn rows_share_a_width_per_kind() {
        let noise = EntropyNoise::seeded(13);
        for kind in ModelKind::ALL {
            let dataset = build(kind, &noise);
            let width = dataset.rows[0].len();
            assert!(dataset.rows.iter().all(|row| row.len() == width));
        }
    }

    #[test]
    fn label_rates_track_the_configured_base_rate() {
        let noise = EntropyNoise::seeded(37);
        let dataset = build(ModelKind::RiskAssessor, &noise);
        let rate = dataset.positive_rate();
        assert!((0.15..=0.35).contains(&rate), "rate was {rate}");
    }

    #[test]
    fn blood_type_sampling_favors_common_types() {
        let noise = EntropyNoise::seeded(53);
        let common = (0..1000)
            .filter(|_| {
                matches!(
                    sample_blood_type(&noise),
                    BloodType::OPositive | BloodType::APositive
                )
            })
            .count();
        assert!(common > 600);
    }
}
