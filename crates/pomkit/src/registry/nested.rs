//! Two-level registry: `namespace -> name -> selector`.
//!
//! Every lookup checks the namespace first and the element second, and the
//! two misses produce distinct `KeyNotFound` errors.

use super::{collect_level, level_from_value, value_kind, validate_key, OriginScope, ELEMENTS_MUST_BE_OBJECT};
use crate::document::{parse_json, parse_yaml};
use crate::locator::Locator;
use crate::result::{PomError, PomResult};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

/// Mapping of namespaces to flat `name -> selector` maps.
///
/// # Example
///
/// ```
/// use pomkit::nested_elements;
///
/// let site = nested_elements! {
///     LOGIN_FORM => {
///         USERNAME_INPUT => "input[data-testid=\"username-input\"]",
///         SUBMIT_BUTTON => "button[data-testid=\"submit-button\"]",
///     },
///     SIGNUP_FORM => {
///         SUBMIT_BUTTON => "button[data-testid=\"signup-submit\"]",
///     },
/// }?;
///
/// let submit = site.resolve("SIGNUP_FORM", "SUBMIT_BUTTON")?;
/// assert_eq!(submit.selector(), "button[data-testid=\"signup-submit\"]");
/// # Ok::<(), pomkit::PomError>(())
/// ```
#[derive(Debug)]
pub struct NestedRegistry {
    elements: IndexMap<String, IndexMap<String, String>>,
    origin: OriginScope,
}

impl NestedRegistry {
    /// Create a registry from `(namespace, entries)` pairs.
    ///
    /// Every namespace is validated like a flat registry; duplicate
    /// namespaces fail with `InvalidArgument`.
    pub fn create<I, N, J, K, V>(elements: I) -> PomResult<Self>
    where
        I: IntoIterator<Item = (N, J)>,
        N: Into<String>,
        J: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut levels = IndexMap::new();
        for (namespace, entries) in elements {
            let namespace = namespace.into();
            validate_key(&namespace)?;
            if levels.contains_key(&namespace) {
                return Err(PomError::invalid_argument(format!(
                    "duplicate namespace {namespace}"
                )));
            }
            let level = collect_level(entries, &namespace)?;
            let _ = levels.insert(namespace, level);
        }
        Ok(Self::from_levels(levels))
    }

    /// Create a registry from dynamic JSON input.
    ///
    /// `null` and non-object input fail with `InvalidArgument`, as does any
    /// namespace whose value is not an object of strings.
    pub fn from_value(elements: &Value) -> PomResult<Self> {
        let Value::Object(map) = elements else {
            return Err(PomError::invalid_argument(format!(
                "{ELEMENTS_MUST_BE_OBJECT} (got {})",
                value_kind(elements)
            )));
        };
        let mut levels = IndexMap::with_capacity(map.len());
        for (namespace, entries) in map {
            validate_key(namespace)?;
            let _ = levels.insert(namespace.clone(), level_from_value(entries, namespace)?);
        }
        Ok(Self::from_levels(levels))
    }

    /// Parse a registry from a JSON document
    pub fn from_json_str(json: &str) -> PomResult<Self> {
        let value = parse_json(json)?;
        Self::from_value(&value)
    }

    /// Parse a registry from a YAML document
    pub fn from_yaml_str(yaml: &str) -> PomResult<Self> {
        let value = parse_yaml(yaml)?;
        Self::from_value(&value)
    }

    fn from_levels(elements: IndexMap<String, IndexMap<String, String>>) -> Self {
        debug!(
            namespaces = elements.len(),
            elements = elements.values().map(IndexMap::len).sum::<usize>(),
            "nested registry created"
        );
        Self {
            elements,
            origin: OriginScope::new(),
        }
    }

    /// Resolve `namespace`/`key` to a locator in the current browsing context
    pub fn resolve(&self, namespace: impl AsRef<str>, key: impl AsRef<str>) -> PomResult<Locator> {
        self.selector(namespace.as_ref(), key.as_ref())
            .map(Locator::new)
    }

    /// Attach the cross-origin scope used by [`Self::resolve_scoped`].
    ///
    /// Only the first origin sticks; later calls return `self` unchanged.
    pub fn with_origin(&self, origin: &str) -> PomResult<&Self> {
        let _ = self.origin.attach(origin)?;
        Ok(self)
    }

    /// Resolve `namespace`/`key` to a locator bound to the attached origin.
    pub fn resolve_scoped(
        &self,
        namespace: impl AsRef<str>,
        key: impl AsRef<str>,
    ) -> PomResult<Locator> {
        let origin = self.origin.require()?;
        let (namespace, key) = (namespace.as_ref(), key.as_ref());
        let selector = self.selector(namespace, key)?;
        debug!(namespace, key, origin, "scoped element resolved");
        Ok(Locator::new(selector).with_origin(origin))
    }

    /// Read-only view of the whole mapping
    #[must_use]
    pub const fn all(&self) -> &IndexMap<String, IndexMap<String, String>> {
        &self.elements
    }

    /// Read-only view of one namespace
    pub fn namespace(&self, namespace: &str) -> PomResult<&IndexMap<String, String>> {
        self.elements
            .get(namespace)
            .ok_or_else(|| PomError::namespace_not_found(namespace))
    }

    /// Namespaces in insertion order
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    /// Attached origin, if any
    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.origin.get()
    }

    /// Whether `namespace`/`key` is registered
    #[must_use]
    pub fn contains(&self, namespace: &str, key: &str) -> bool {
        self.elements
            .get(namespace)
            .is_some_and(|level| level.contains_key(key))
    }

    /// Number of namespaces
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether there are no namespaces
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of elements across all namespaces
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.values().map(IndexMap::len).sum()
    }

    fn selector(&self, namespace: &str, key: &str) -> PomResult<&str> {
        self.namespace(namespace)?
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| PomError::element_not_found(key))
    }
}
