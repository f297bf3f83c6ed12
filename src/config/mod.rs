//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the `MINDLINE_`
//! prefix and nested sections use double underscores as separators.
//!
//! Configuration is loaded once and passed explicitly into constructors;
//! nothing in this crate reads ambient global state after startup.
//!
//! # Example
//!
//! ```no_run
//! use mindline::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod error;
mod therapist;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use therapist::{BudgetConfig, TherapistConfig};

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Therapist presentation and modality list.
    #[serde(default)]
    pub therapist: TherapistConfig,

    /// Token budgets for prompt assembly.
    #[serde(default)]
    pub budget: BudgetConfig,

    /// AI provider configuration.
    #[serde(default)]
    pub ai: AiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads a `.env` file if present, then reads variables with the
    /// `MINDLINE` prefix. `MINDLINE__AI__FAST_MODEL=...` maps to
    /// `ai.fast_model`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected
    /// types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MINDLINE")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("therapist.modalities")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any section is semantically invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.therapist.validate()?;
        self.budget.validate()?;
        self.ai.validate()?;
        Ok(())
    }
}
