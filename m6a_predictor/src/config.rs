use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

/// Environment variable pointing at a JSON config file.
pub const CONFIG_ENV: &str = "M6A_PREDICTOR_CONFIG";

pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// What to do with an `RNA_type`/`RNA_region` value outside its level set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalPolicy {
    /// Abort the call with a categorical-domain error.
    #[default]
    Strict,
    /// Keep the row with no level set for that field.
    Unrepresented,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PredictionConfig {
    pub positive_threshold: f64,
    pub categorical_policy: CategoricalPolicy,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            positive_threshold: DEFAULT_THRESHOLD,
            categorical_policy: CategoricalPolicy::default(),
        }
    }
}

impl PredictionConfig {
    pub fn with_threshold(positive_threshold: f64) -> Self {
        Self {
            positive_threshold,
            ..Self::default()
        }
    }

    pub fn with_policy(mut self, categorical_policy: CategoricalPolicy) -> Self {
        self.categorical_policy = categorical_policy;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.positive_threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.positive_threshold));
        }
        Ok(())
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path.as_ref())?;
        let config: PredictionConfig = serde_json::from_str(&json)?;
        config.validate()?;
        info!("Loaded prediction config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Load from the file named by `M6A_PREDICTOR_CONFIG`, or defaults when unset.
    pub fn load() -> Result<Self, ConfigError> {
        match env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_json_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let cfg = PredictionConfig::default();
        assert_eq!(cfg.positive_threshold, 0.5);
        assert_eq!(cfg.categorical_policy, CategoricalPolicy::Strict);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        for t in [-0.1, 1.5, f64::NAN] {
            assert!(matches!(
                PredictionConfig::with_threshold(t).validate(),
                Err(ConfigError::ThresholdOutOfRange(_))
            ));
        }
        assert!(PredictionConfig::with_threshold(0.0).validate().is_ok());
        assert!(PredictionConfig::with_threshold(1.0).validate().is_ok());
    }

    #[test]
    fn reads_partial_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"categorical_policy": "unrepresented"}}"#).unwrap();

        let cfg = PredictionConfig::from_json_file(file.path()).unwrap();
        assert_eq!(cfg.positive_threshold, 0.5);
        assert_eq!(cfg.categorical_policy, CategoricalPolicy::Unrepresented);
    }

    #[test]
    fn invalid_file_contents_fail() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"positive_threshold": 2.0}}"#).unwrap();
        assert!(matches!(
            PredictionConfig::from_json_file(file.path()),
            Err(ConfigError::ThresholdOutOfRange(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(PredictionConfig::from_json_file(file.path()), Err(ConfigError::Json(_))));
    }

    #[test]
    fn misspelled_key_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"positive_treshold": 0.9}}"#).unwrap();
        assert!(matches!(PredictionConfig::from_json_file(file.path()), Err(ConfigError::Json(_))));
    }

    // Only test that touches CONFIG_ENV.
    #[test]
    fn load_follows_env_var() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"positive_threshold": 0.8}}"#).unwrap();

        env::set_var(CONFIG_ENV, file.path());
        let cfg = PredictionConfig::load();
        env::remove_var(CONFIG_ENV);
        assert_eq!(cfg.unwrap().positive_threshold, 0.8);

        assert_eq!(PredictionConfig::load().unwrap(), PredictionConfig::default());
    }
}
