//! Configuration management
//!
//! All settings have built-in defaults. The data path and log level can be
//! overridden from the environment; no configuration file is read.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::patient::validation::FieldRanges;

/// Environment variable overriding the dataset path
pub const DATA_PATH_ENV: &str = "HEART_RISK_DATA";
/// Environment variable overriding the log level (`RUST_LOG` still wins)
pub const LOG_LEVEL_ENV: &str = "HEART_RISK_LOG";

/// Invalid configuration values
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("test_ratio must be in (0, 1), got {0}")]
    InvalidTestRatio(f64),

    #[error("learning_rate must be positive, got {0}")]
    InvalidLearningRate(f64),

    #[error("max_iter must be at least 1")]
    ZeroIterations,

    #[error("l2_penalty must be non-negative, got {0}")]
    NegativePenalty(f64),

    #[error("range for field '{0}' is empty")]
    EmptyRange(String),
}

/// Data configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("heart_disease_data.csv"),
        }
    }
}

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Share of each class held out for evaluation
    pub test_ratio: f64,
    /// Seed for the stratified shuffle
    pub seed: u64,
    pub learning_rate: f64,
    pub max_iter: usize,
    /// Stop once the log-loss changes by less than this between iterations
    pub tolerance: f64,
    pub l2_penalty: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_ratio: 0.2,
            seed: 42,
            learning_rate: 0.1,
            max_iter: 1000,
            tolerance: 1e-7,
            l2_penalty: 0.01,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub data: DataConfig,
    pub training: TrainingConfig,
    pub logging: LoggingConfig,
    pub fields: FieldRanges,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Override with values found by `lookup`; blank values are ignored
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = lookup(DATA_PATH_ENV) {
            self.data.path = PathBuf::from(path);
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            self.logging.level = level;
        }

        self
    }

    /// Check that training parameters and field ranges are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.training;

        if !(t.test_ratio > 0.0 && t.test_ratio < 1.0) {
            return Err(ConfigError::InvalidTestRatio(t.test_ratio));
        }
        if !(t.learning_rate > 0.0) {
            return Err(ConfigError::InvalidLearningRate(t.learning_rate));
        }
        if t.max_iter == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if !(t.l2_penalty >= 0.0) {
            return Err(ConfigError::NegativePenalty(t.l2_penalty));
        }
        if let Some(feature) = self.fields.inverted().first() {
            return Err(ConfigError::EmptyRange(feature.code().to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::{Feature, FieldRange};

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.data.path, PathBuf::from("heart_disease_data.csv"));
        assert_eq!(config.training.test_ratio, 0.2);
        assert_eq!(config.training.seed, 42);
        assert_eq!(config.logging.level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default().with_overrides(|key| match key {
            DATA_PATH_ENV => Some("/data/heart.csv".to_string()),
            LOG_LEVEL_ENV => Some("debug".to_string()),
            _ => None,
        });
        assert_eq!(config.data.path, PathBuf::from("/data/heart.csv"));
        assert_eq!(config.logging.level, "debug");

        let config = Config::default().with_overrides(|key| match key {
            DATA_PATH_ENV => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.data.path, PathBuf::from("heart_disease_data.csv"));
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_config_rejects_bad_training_values() {
        let mut config = Config::default();
        config.training.test_ratio = 1.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidTestRatio(1.0)));

        let mut config = Config::default();
        config.training.learning_rate = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLearningRate(_))
        ));

        let mut config = Config::default();
        config.training.max_iter = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroIterations));

        let mut config = Config::default();
        config.training.l2_penalty = -0.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativePenalty(_))
        ));
    }

    #[test]
    fn test_config_rejects_empty_field_range() {
        let mut config = Config::default();
        config.fields = config
            .fields
            .with_range(Feature::Cholesterol, FieldRange::new(600.0, 100.0));

        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyRange("chol".to_string()))
        );
    }
}
