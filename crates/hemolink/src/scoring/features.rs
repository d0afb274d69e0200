//! Feature normalization.
//!
//! Pure functions turning raw subject attributes into bounded features.
//! Missing inputs substitute the documented defaults; out-of-range inputs
//! are clipped, never rejected.

use std::f64::consts::TAU;

use super::blood::BloodType;
use super::subject::{Location, Subject};

pub const DEFAULT_AGE: f64 = 30.0;
pub const DEFAULT_WEIGHT_KG: f64 = 70.0;
pub const DEFAULT_HEIGHT_CM: f64 = 170.0;
pub const DEFAULT_SYSTOLIC: f64 = 120.0;
pub const DEFAULT_DIASTOLIC: f64 = 80.0;
pub const DEFAULT_HEMOGLOBIN: f64 = 14.0;
pub const DEFAULT_HEALTH_SCORE: f64 = 0.8;

pub const DEFAULT_LATITUDE: f64 = 20.0;
pub const DEFAULT_LONGITUDE: f64 = 77.0;
pub const DEFAULT_POPULATION_DENSITY: f64 = 400.0;
pub const DEFAULT_CITY_DISTANCE_KM: f64 = 50.0;

pub const DEFAULT_FACILITY_RISK: f64 = 0.1;
pub const DEFAULT_STAFF_EXPERIENCE: f64 = 0.8;
pub const DEFAULT_EQUIPMENT_CONDITION: f64 = 0.9;

/// Min-max value capped at 1.0. Inputs here are non-negative by
/// construction, so no lower clip is applied.
fn capped(value: f64) -> f64 {
    value.min(1.0)
}

pub fn age_feature(age: Option<f64>) -> f64 {
    capped(age.unwrap_or(DEFAULT_AGE) / 100.0)
}

/// BMI from weight (kg) and height (cm), normalized against a BMI of 40.
pub fn bmi_feature(weight: Option<f64>, height_cm: Option<f64>) -> f64 {
    let weight = weight.unwrap_or(DEFAULT_WEIGHT_KG);
    let height_m = height_cm.unwrap_or(DEFAULT_HEIGHT_CM) / 100.0;
    capped(weight / (height_m * height_m) / 40.0)
}

pub fn systolic_feature(systolic: Option<f64>) -> f64 {
    capped(systolic.unwrap_or(DEFAULT_SYSTOLIC) / 200.0)
}

pub fn diastolic_feature(diastolic: Option<f64>) -> f64 {
    capped(diastolic.unwrap_or(DEFAULT_DIASTOLIC) / 120.0)
}

pub fn hemoglobin_feature(hemoglobin: Option<f64>) -> f64 {
    capped(hemoglobin.unwrap_or(DEFAULT_HEMOGLOBIN) / 20.0)
}

pub fn chronic_condition_feature(count: usize) -> f64 {
    capped(count as f64 / 10.0)
}

pub fn medication_feature(count: usize) -> f64 {
    capped(count as f64 / 20.0)
}

/// Proximity score: 1.0 at zero distance, floored at 0.0 beyond the
/// maximum.
pub fn proximity_feature(distance: f64, max_distance: f64) -> f64 {
    (1.0 - distance / max_distance).max(0.0)
}

/// Urgency level 1-5 mapped onto [0, 1].
pub fn urgency_factor(urgency_level: u8) -> f64 {
    capped(f64::from(urgency_level) / 5.0)
}

pub fn health_score(score: Option<f64>) -> f64 {
    score.unwrap_or(DEFAULT_HEALTH_SCORE)
}

/// Cyclic encoding of the hour of day.
pub fn hour_cycle(hour: f64) -> (f64, f64) {
    let theta = TAU * hour / 24.0;
    (theta.sin(), theta.cos())
}

/// Cyclic encoding of the day of week (0 = Monday).
pub fn weekday_cycle(weekday: f64) -> (f64, f64) {
    let theta = TAU * weekday / 7.0;
    (theta.sin(), theta.cos())
}

// Coordinate frame covers the service's deployment region (8-37N, 68-97E).
pub fn latitude_feature(latitude: Option<f64>) -> f64 {
    (latitude.unwrap_or(DEFAULT_LATITUDE) - 8.0) / (37.0 - 8.0)
}

pub fn longitude_feature(longitude: Option<f64>) -> f64 {
    (longitude.unwrap_or(DEFAULT_LONGITUDE) - 68.0) / (97.0 - 68.0)
}

pub fn density_feature(density: Option<f64>) -> f64 {
    capped(density.unwrap_or(DEFAULT_POPULATION_DENSITY) / 10_000.0)
}

pub fn urban_feature(is_urban: Option<bool>) -> f64 {
    if is_urban.unwrap_or(true) {
        1.0
    } else {
        0.0
    }
}

pub fn city_distance_feature(distance_km: Option<f64>) -> f64 {
    capped(distance_km.unwrap_or(DEFAULT_CITY_DISTANCE_KM) / 500.0)
}

/// One-hot encoding of a blood type, in fixed table order.
pub fn blood_type_one_hot(blood_type: BloodType) -> [f64; 8] {
    let mut encoding = [0.0; 8];
    let index = BloodType::ALL
        .iter()
        .position(|candidate| *candidate == blood_type)
        .expect("every blood type appears in the table");
    encoding[index] = 1.0;
    encoding
}

/// Medical feature block for a subject: demographics, vitals, and history
/// counts, all bounded.
pub fn subject_features(subject: &Subject) -> Vec<f64> {
    let vitals = subject.vitals.clone().unwrap_or_default();
    let history = &subject.medical_history;
    vec![
        age_feature(Some(f64::from(subject.age))),
        bmi_feature(subject.weight, subject.height),
        systolic_feature(vitals.blood_pressure_systolic),
        diastolic_feature(vitals.blood_pressure_diastolic),
        hemoglobin_feature(vitals.hemoglobin),
        chronic_condition_feature(history.chronic_conditions.len()),
        medication_feature(history.medications.len()),
        if history.smoking { 1.0 } else { 0.0 },
        if history.alcohol_consumption { 1.0 } else { 0.0 },
    ]
}

/// Location feature block, defaulting to the regional centroid.
pub fn location_features(location: Option<&Location>) -> Vec<f64> {
    let fallback = Location::default();
    let location = location.unwrap_or(&fallback);
    vec![
        latitude_feature(location.latitude),
        longitude_feature(location.longitude),
        density_feature(location.population_density),
        urban_feature(location.is_urban),
        city_distance_feature(location.distance_to_major_city),
    ]
}

/// Procedure context block shared by the compatibility and risk vectors.
pub fn context_features(urgency_level: u8, units_required: u32, emergency: bool) -> Vec<f64> {
    vec![
        urgency_factor(urgency_level),
        capped(f64::from(units_required) / 10.0),
        if emergency { 1.0 } else { 0.0 },
    ]
}

/// Facility/staff/equipment scores; constant defaults until the service
/// has real telemetry for them.
pub fn environment_features() -> [f64; 3] {
    [
        DEFAULT_FACILITY_RISK,
        DEFAULT_STAFF_EXPERIENCE,
        DEFAULT_EQUIPMENT_CONDITION,
    ]
}
