//! Concurrency configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Limits for fan-out over evaluators
#[derive(Debug, Clone, Deserialize)]
pub struct ConcurrencyConfig {
    /// Evaluator assemblies allowed to run at once
    #[serde(default = "default_max_parallel_evaluators")]
    pub max_parallel_evaluators: usize,
}

impl ConcurrencyConfig {
    /// Validate concurrency configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_parallel_evaluators == 0 {
            return Err(ValidationError::InvalidParallelism);
        }
        Ok(())
    }
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            max_parallel_evaluators: default_max_parallel_evaluators(),
        }
    }
}

fn default_max_parallel_evaluators() -> usize {
    8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concurrency_defaults() {
        let config = ConcurrencyConfig::default();
        assert_eq!(config.max_parallel_evaluators, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_parallelism_rejected() {
        let config = ConcurrencyConfig {
            max_parallel_evaluators: 0,
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidParallelism));
    }
}
