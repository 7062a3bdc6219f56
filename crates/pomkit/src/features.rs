//! Feature-mapping accessor
//!
//! Test suites usually keep their selectors outside the code, in a
//! `feature -> element -> selector` document handed over by the test runner
//! (an env var or a config file). [`FeatureMap`] wraps that document and
//! exposes a single resolve operation.
//!
//! The mapping is injected, never read from global state. A map that was
//! never supplied is kept distinct from an empty one: resolving against it
//! fails with `ConfigurationMissing` rather than `KeyNotFound`.

use crate::locator::Locator;
use crate::registry::NestedRegistry;
use crate::result::{PomError, PomResult};
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Read-only `feature -> element -> selector` lookup.
#[derive(Debug)]
pub struct FeatureMap {
    mapping: Option<NestedRegistry>,
    source_hint: String,
}

impl FeatureMap {
    /// Wrap a mapping supplied by the caller
    #[must_use]
    pub fn new(mapping: NestedRegistry) -> Self {
        Self {
            mapping: Some(mapping),
            source_hint: "an injected mapping".to_string(),
        }
    }

    /// A map whose configuration was never supplied.
    ///
    /// `source_hint` names where it was expected, for the error message.
    #[must_use]
    pub fn absent(source_hint: impl Into<String>) -> Self {
        Self {
            mapping: None,
            source_hint: source_hint.into(),
        }
    }

    /// Parse a JSON document
    pub fn from_json_str(json: &str) -> PomResult<Self> {
        NestedRegistry::from_json_str(json).map(Self::new)
    }

    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> PomResult<Self> {
        NestedRegistry::from_yaml_str(yaml).map(Self::new)
    }

    /// Load a JSON or YAML file, picked by extension (`.yaml`/`.yml` or JSON)
    pub fn from_path(path: impl AsRef<Path>) -> PomResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        let registry = if is_yaml {
            NestedRegistry::from_yaml_str(&content)?
        } else {
            NestedRegistry::from_json_str(&content)?
        };
        info!(
            path = %path.display(),
            features = registry.len(),
            elements = registry.element_count(),
            "feature mapping loaded"
        );
        Ok(Self {
            mapping: Some(registry),
            source_hint: format!("file {}", path.display()),
        })
    }

    /// Load a JSON mapping from an environment variable.
    ///
    /// An unset or blank variable yields an absent map; a set but malformed
    /// one is an error.
    pub fn from_env(var: &str) -> PomResult<Self> {
        let hint = format!("env {var}");
        let raw = match env::var(var) {
            Ok(raw) if !raw.trim().is_empty() => raw,
            Ok(_) | Err(env::VarError::NotPresent) => {
                debug!(var, "feature mapping env var not set");
                return Ok(Self::absent(hint));
            }
            Err(env::VarError::NotUnicode(_)) => {
                return Err(PomError::invalid_argument(format!(
                    "{var} does not contain valid UTF-8"
                )));
            }
        };
        let registry = NestedRegistry::from_json_str(&raw)?;
        info!(var, features = registry.len(), "feature mapping loaded from env");
        Ok(Self {
            mapping: Some(registry),
            source_hint: hint,
        })
    }

    /// Whether a mapping was supplied
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.mapping.is_some()
    }

    /// The underlying mapping, or `ConfigurationMissing`
    pub fn mapping(&self) -> PomResult<&NestedRegistry> {
        self.mapping
            .as_ref()
            .ok_or_else(|| PomError::ConfigurationMissing {
                source_hint: self.source_hint.clone(),
            })
    }

    /// Resolve `feature`/`element` to a locator.
    ///
    /// Fails with `ConfigurationMissing` when no mapping was supplied, and
    /// with `KeyNotFound` when the feature or the element is unknown.
    pub fn locate(&self, feature: impl AsRef<str>, element: impl AsRef<str>) -> PomResult<Locator> {
        self.mapping()?.resolve(feature, element)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::result::KeyKind;
    use std::io::Write;

    const FEATURES_JSON: &str = r##"{
        "HOME": {
            "ITEMS": "div#tbodyid > div",
            "NEXT_ITEMS": "ul.pagination > li > button#next2"
        },
        "CART": {
            "TOTAL": "#totalp"
        }
    }"##;

    mod locate_tests {
        use super::*;

        #[test]
        fn test_locate_found() {
            let features = FeatureMap::from_json_str(FEATURES_JSON).unwrap();
            assert!(features.is_configured());
            let locator = features.locate("HOME", "ITEMS").unwrap();
            assert_eq!(locator.selector(), "div#tbodyid > div");
        }

        #[test]
        fn test_locate_missing_feature_and_element() {
            let features = FeatureMap::from_json_str(FEATURES_JSON).unwrap();
            assert!(matches!(
                features.locate("CHECKOUT", "ITEMS"),
                Err(PomError::KeyNotFound {
                    kind: KeyKind::Namespace,
                    ..
                })
            ));
            assert!(matches!(
                features.locate("CART", "ITEMS"),
                Err(PomError::KeyNotFound {
                    kind: KeyKind::Element,
                    ..
                })
            ));
        }

        #[test]
        fn test_absent_reports_configuration_missing() {
            let features = FeatureMap::absent("env POM_FEATURES");
            assert!(!features.is_configured());
            let err = features.locate("HOME", "ITEMS").unwrap_err();
            assert!(matches!(err, PomError::ConfigurationMissing { .. }));
            assert!(err.to_string().contains("env POM_FEATURES"));
        }

        #[test]
        fn test_empty_mapping_is_not_absent() {
            let features = FeatureMap::from_json_str("{}").unwrap();
            assert!(features.is_configured());
            assert!(features.locate("HOME", "ITEMS").unwrap_err().is_key_not_found());
        }

        #[test]
        fn test_repeated_feature_is_rejected() {
            let err = FeatureMap::from_json_str(r#"{"HOME": {"A": "x"}, "HOME": {"B": "y"}}"#)
                .unwrap_err();
            assert!(matches!(err, PomError::InvalidArgument { .. }));
        }
    }

    mod source_tests {
        use super::*;

        #[test]
        fn test_from_yaml_str() {
            let features = FeatureMap::from_yaml_str("HOME:\n  ITEMS: 'div#list > div'\n").unwrap();
            assert_eq!(features.locate("HOME", "ITEMS").unwrap().selector(), "div#list > div");
        }

        #[test]
        fn test_from_path_json_and_yaml() {
            let dir = tempfile::tempdir().unwrap();

            let json_path = dir.path().join("features.json");
            fs::write(&json_path, FEATURES_JSON).unwrap();
            let features = FeatureMap::from_path(&json_path).unwrap();
            assert_eq!(features.mapping().unwrap().element_count(), 3);

            let yaml_path = dir.path().join("features.yml");
            let mut file = fs::File::create(&yaml_path).unwrap();
            writeln!(file, "CART:\n  TOTAL: '#totalp'").unwrap();
            let features = FeatureMap::from_path(&yaml_path).unwrap();
            assert!(features.mapping().unwrap().contains("CART", "TOTAL"));
        }

        #[test]
        fn test_from_path_missing_file() {
            let err = FeatureMap::from_path("/definitely/not/here.json").unwrap_err();
            assert!(matches!(err, PomError::Io(_)));
        }

        #[test]
        fn test_from_env_unset_is_absent() {
            let features = FeatureMap::from_env("POMKIT_TEST_FEATURES_UNSET").unwrap();
            assert!(!features.is_configured());
        }

        #[test]
        fn test_from_env_set() {
            env::set_var("POMKIT_TEST_FEATURES_SET", FEATURES_JSON);
            let features = FeatureMap::from_env("POMKIT_TEST_FEATURES_SET").unwrap();
            assert!(features.locate("CART", "TOTAL").is_ok());
        }

        #[test]
        fn test_from_env_malformed() {
            env::set_var("POMKIT_TEST_FEATURES_BAD", r#"{"HOME": "div"}"#);
            let err = FeatureMap::from_env("POMKIT_TEST_FEATURES_BAD").unwrap_err();
            assert!(matches!(err, PomError::InvalidArgument { .. }));
        }

        #[test]
        fn test_from_env_repeated_feature() {
            env::set_var("POMKIT_TEST_FEATURES_DUP", r#"{"HOME": {"A": "x"}, "HOME": {"B": "y"}}"#);
            let err = FeatureMap::from_env("POMKIT_TEST_FEATURES_DUP").unwrap_err();
            assert!(err.to_string().contains("duplicate key HOME"));
        }
    }
}
