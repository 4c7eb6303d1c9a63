use std::{fmt, path::PathBuf};

use gyan_adaptive::AdaptiveConfig;
use serde::Deserialize;

use crate::error::LearningError;

/// Deployment environment, drives log formatting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Process configuration, read from environment variables.
///
/// | variable | default |
/// |---|---|
/// | `DATABASE_URL` | required |
/// | `ENV` | `development` |
/// | `DB_MAX_CONNECTIONS` | `10` |
/// | `ADAPTIVE_CONFIG_PATH` | unset, built-in tuning |
/// | `DEFAULT_TIME_TAKEN_SECS` | `60` |
#[derive(Clone, Deserialize)]
pub struct LearningConfig {
    pub database_url: String,
    #[serde(default)]
    pub env: Environment,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    /// JSON file overriding parts of the adaptive tuning
    #[serde(default)]
    pub adaptive_config_path: Option<PathBuf>,
    /// Assumed duration of a submission that did not report one
    #[serde(default = "default_time_taken_secs")]
    pub default_time_taken_secs: f64,
}

const fn default_db_max_connections() -> u32 {
    10
}

const fn default_time_taken_secs() -> f64 {
    60.0
}

impl fmt::Debug for LearningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LearningConfig")
            .field("database_url", &"***REDACTED***")
            .field("env", &self.env)
            .field("db_max_connections", &self.db_max_connections)
            .field("adaptive_config_path", &self.adaptive_config_path)
            .field("default_time_taken_secs", &self.default_time_taken_secs)
            .finish()
    }
}

impl LearningConfig {
    pub fn from_env() -> Result<Self, LearningError> {
        Self::from_vars(std::env::vars())
    }

    /// Build from explicit `(KEY, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, LearningError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Self =
            envy::from_iter(vars).map_err(|e| LearningError::Config(e.to_string()))?;

        if config.db_max_connections == 0 {
            return Err(LearningError::Config(
                "DB_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }
        if !config.default_time_taken_secs.is_finite() || config.default_time_taken_secs <= 0.0 {
            return Err(LearningError::Config(
                "DEFAULT_TIME_TAKEN_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(config)
    }

    /// Load the adaptive tuning, falling back to the built-in defaults.
    pub fn load_adaptive_config(&self) -> Result<AdaptiveConfig, LearningError> {
        let Some(path) = &self.adaptive_config_path else {
            return Ok(AdaptiveConfig::default());
        };

        let raw = std::fs::read_to_string(path).map_err(|e| {
            LearningError::Config(format!(
                "failed to read adaptive config {}: {e}",
                path.display()
            ))
        })?;
        let config: AdaptiveConfig = serde_json::from_str(&raw).map_err(|e| {
            LearningError::Config(format!(
                "failed to parse adaptive config {}: {e}",
                path.display()
            ))
        })?;
        config.validate()?;

        tracing::info!(path = %path.display(), "Loaded adaptive tuning overrides");
        Ok(config)
    }
}
