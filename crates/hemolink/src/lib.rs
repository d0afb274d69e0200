//! Core library for the HemoLink prediction service.
//!
//! The heavy lifting lives in [`scoring`]: the blood-type compatibility
//! matrix, the feature normalizer, and the four heuristic rules behind the
//! prediction endpoints. [`models`] tracks the simulated model registry and
//! [`cache`] holds generated datasets for the training path.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod scoring;
pub mod telemetry;
