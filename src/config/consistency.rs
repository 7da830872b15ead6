//! Consistency checking configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::analysis::CONSISTENCY_THRESHOLD;

/// Consistency checking configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ConsistencyConfig {
    /// Largest acceptable consistency ratio
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl ConsistencyConfig {
    /// Validate consistency configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(ValidationError::InvalidConsistencyThreshold(self.threshold));
        }
        Ok(())
    }
}

impl Default for ConsistencyConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

fn default_threshold() -> f64 {
    CONSISTENCY_THRESHOLD
}
