//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Consistency threshold must be in (0, 1], got {0}")]
    InvalidConsistencyThreshold(f64),

    #[error("Perturbation must be in (0, 1), got {0}")]
    InvalidPerturbation(f64),

    #[error("max_parallel_evaluators must be at least 1")]
    InvalidParallelism,

    #[error("Invalid log filter directive: {0}")]
    InvalidLogLevel(String),
}
