use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the service's deliberate randomness: the demand seasonal
/// factor, the compatibility secondary factor, and the simulated training
/// metrics. Injected so tests can seed the stream and assert documented
/// ranges instead of exact values.
pub trait NoiseSource: Send + Sync {
    /// Uniform draw from `[low, high)`.
    fn uniform(&self, low: f64, high: f64) -> f64;

    /// Uniform draw from `[0, 1)`.
    fn unit(&self) -> f64 {
        self.uniform(0.0, 1.0)
    }

    /// Uniform integer draw from `low..=high`.
    fn int_between(&self, low: u32, high: u32) -> u32;
}

/// Entropy-seeded source used by the running service.
pub struct EntropyNoise {
    rng: Mutex<StdRng>,
}

impl EntropyNoise {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Fixed-seed source for tests and reproducible demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for EntropyNoise {
    fn default() -> Self {
        Self::new()
    }
}

impl NoiseSource for EntropyNoise {
    fn uniform(&self, low: f64, high: f64) -> f64 {
        let mut rng = self.rng.lock().expect("noise mutex poisoned");
        rng.gen_range(low..high)
    }

    fn int_between(&self, low: u32, high: u32) -> u32 {
        let mut rng = self.rng.lock().expect("noise mutex poisoned");
        rng.gen_range(low..=high)
    }
}
