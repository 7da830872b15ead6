//! Sensitivity analysis configuration

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::analysis::DEFAULT_PERTURBATION;

/// Sensitivity analysis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SensitivityConfig {
    /// Fraction by which judgments are perturbed (0.1 = ±10%)
    #[serde(default = "default_perturbation")]
    pub perturbation: f64,

    /// Fixed seed for reproducible runs; random when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SensitivityConfig {
    /// Random source for one analysis run.
    ///
    /// Seeded runs are reproducible; unseeded runs draw from OS entropy.
    pub fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }

    /// Validate sensitivity configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.perturbation > 0.0 && self.perturbation < 1.0) {
            return Err(ValidationError::InvalidPerturbation(self.perturbation));
        }
        Ok(())
    }
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            perturbation: default_perturbation(),
            seed: None,
        }
    }
}

fn default_perturbation() -> f64 {
    DEFAULT_PERTURBATION
}
