//! Runtime configuration

use crate::features::FeatureMap;
use crate::result::{PomError, PomResult};
use crate::sequencer::{StepDelay, DEFAULT_STEP_DELAY_MS};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::debug;

/// Env var overriding the default step delay
pub const STEP_DELAY_ENV: &str = "POM_STEP_DELAY_MS";
/// Env var naming the variable that holds the feature mapping
pub const FEATURES_ENV_ENV: &str = "POM_FEATURES_ENV";
/// Env var pointing at a feature mapping file
pub const FEATURES_PATH_ENV: &str = "POM_FEATURES_PATH";
/// Default variable holding the feature mapping as JSON
pub const DEFAULT_FEATURES_ENV: &str = "POM_FEATURES";

/// Pacing and feature-mapping configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PomConfig {
    /// Settle time between steps, in milliseconds
    pub step_delay_ms: u64,
    /// Variable holding the feature mapping as JSON
    pub features_env: String,
    /// JSON or YAML file holding the feature mapping
    pub features_path: Option<PathBuf>,
}

impl Default for PomConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
            features_env: DEFAULT_FEATURES_ENV.to_string(),
            features_path: None,
        }
    }
}

impl PomConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the step delay
    #[must_use]
    pub const fn with_step_delay_ms(mut self, ms: u64) -> Self {
        self.step_delay_ms = ms;
        self
    }

    /// Set the feature mapping variable
    #[must_use]
    pub fn with_features_env(mut self, var: impl Into<String>) -> Self {
        self.features_env = var.into();
        self
    }

    /// Set the feature mapping file
    #[must_use]
    pub fn with_features_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.features_path = Some(path.into());
        self
    }

    /// Defaults overridden by `POM_STEP_DELAY_MS`, `POM_FEATURES_ENV` and
    /// `POM_FEATURES_PATH`
    pub fn from_env() -> PomResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Like [`Self::from_env`] with a custom variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PomResult<Self> {
        let mut config = Self::default();
        if let Some(raw) = lookup(STEP_DELAY_ENV) {
            config.step_delay_ms = raw.trim().parse().map_err(|_| {
                PomError::invalid_argument(format!(
                    "{STEP_DELAY_ENV} must be a non-negative integer (got {raw:?})"
                ))
            })?;
        }
        if let Some(var) = lookup(FEATURES_ENV_ENV).filter(|v| !v.trim().is_empty()) {
            config.features_env = var;
        }
        if let Some(path) = lookup(FEATURES_PATH_ENV).filter(|p| !p.trim().is_empty()) {
            config.features_path = Some(PathBuf::from(path));
        }
        debug!(?config, "configuration resolved");
        Ok(config)
    }

    /// Step delay as a [`StepDelay`]
    #[must_use]
    pub const fn step_delay(&self) -> StepDelay {
        StepDelay::from_millis(self.step_delay_ms)
    }

    /// Load the feature mapping: the file if one is set, else the env var.
    ///
    /// With neither present the returned map is absent and every lookup
    /// fails with `ConfigurationMissing`.
    pub fn load_features(&self) -> PomResult<FeatureMap> {
        match &self.features_path {
            Some(path) => FeatureMap::from_path(path),
            None => FeatureMap::from_env(&self.features_env),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    mod defaults_tests {
        use super::*;

        #[test]
        fn test_default_values() {
            let config = PomConfig::new();
            assert_eq!(config.step_delay_ms, 300);
            assert_eq!(config.step_delay(), StepDelay::default());
            assert_eq!(config.features_env, "POM_FEATURES");
            assert!(config.features_path.is_none());
        }

        #[test]
        fn test_builders() {
            let config = PomConfig::new()
                .with_step_delay_ms(50)
                .with_features_env("SITE_FEATURES")
                .with_features_path("features.yaml");
            assert_eq!(config.step_delay(), StepDelay::from_millis(50));
            assert_eq!(config.features_env, "SITE_FEATURES");
            assert_eq!(config.features_path, Some(PathBuf::from("features.yaml")));
        }

        #[test]
        fn test_deserialize_partial() {
            let config: PomConfig = serde_json::from_str(r#"{"step_delay_ms": 120}"#).unwrap();
            assert_eq!(config.step_delay_ms, 120);
            assert_eq!(config.features_env, DEFAULT_FEATURES_ENV);
        }
    }

    mod env_tests {
        use super::*;

        #[test]
        fn test_lookup_overrides() {
            let config = PomConfig::from_lookup(lookup_from(&[
                (STEP_DELAY_ENV, "75"),
                (FEATURES_ENV_ENV, "SHOP_FEATURES"),
                (FEATURES_PATH_ENV, "/tmp/features.json"),
            ]))
            .unwrap();
            assert_eq!(config.step_delay_ms, 75);
            assert_eq!(config.features_env, "SHOP_FEATURES");
            assert_eq!(config.features_path, Some(PathBuf::from("/tmp/features.json")));
        }

        #[test]
        fn test_lookup_empty_keeps_defaults() {
            let config = PomConfig::from_lookup(lookup_from(&[])).unwrap();
            assert_eq!(config, PomConfig::default());
        }

        #[test]
        fn test_bad_delay_rejected() {
            for bad in ["soon", "-1", "1.5"] {
                let err = PomConfig::from_lookup(lookup_from(&[(STEP_DELAY_ENV, bad)])).unwrap_err();
                assert!(matches!(err, PomError::InvalidArgument { .. }), "{bad}");
            }
        }
    }

    mod load_tests {
        use super::*;

        #[test]
        fn test_load_from_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("features.yaml");
            std::fs::write(&path, "HOME:\n  ITEMS: 'div#list > div'\n").unwrap();

            let features = PomConfig::new().with_features_path(&path).load_features().unwrap();
            assert_eq!(features.locate("HOME", "ITEMS").unwrap().selector(), "div#list > div");
        }

        #[test]
        fn test_load_without_source_is_absent() {
            let features = PomConfig::new()
                .with_features_env("POMKIT_CONFIG_TEST_NEVER_SET")
                .load_features()
                .unwrap();
            assert!(!features.is_configured());
            assert!(matches!(
                features.locate("HOME", "ITEMS"),
                Err(PomError::ConfigurationMissing { .. })
            ));
        }
    }
}
