//! Engine configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `AHP_ENGINE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use ahp_engine::config::{init_tracing, EngineConfig};
//!
//! let config = EngineConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! init_tracing(&config.logging);
//! ```

mod concurrency;
mod consistency;
mod error;
mod logging;
mod sensitivity;

pub use concurrency::ConcurrencyConfig;
pub use consistency::ConsistencyConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{init_tracing, LoggingConfig};
pub use sensitivity::SensitivityConfig;

use serde::Deserialize;

/// Root engine configuration
///
/// Every section has defaults, so an empty environment yields a usable config.
/// Load using [`EngineConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// Consistency ratio threshold used by validation
    #[serde(default)]
    pub consistency: ConsistencyConfig,

    /// Sensitivity analysis perturbation and seed
    #[serde(default)]
    pub sensitivity: SensitivityConfig,

    /// Evaluator fan-out limits
    #[serde(default)]
    pub concurrency: ConcurrencyConfig,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `AHP_ENGINE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `AHP_ENGINE__CONSISTENCY__THRESHOLD=0.08` -> `consistency.threshold = 0.08`
    /// - `AHP_ENGINE__SENSITIVITY__SEED=42` -> `sensitivity.seed = Some(42)`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("AHP_ENGINE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.consistency.validate()?;
        self.sensitivity.validate()?;
        self.concurrency.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Loads and validates in one step.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }
}
