//! Single-level registry: `name -> selector`.

use super::{collect_level, level_from_value, OriginScope, ELEMENTS_MUST_BE_OBJECT};
use crate::document::parse_json;
use crate::locator::Locator;
use crate::result::{PomError, PomResult};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

/// Flat mapping from element names to selectors.
///
/// # Example
///
/// ```
/// use pomkit::ElementRegistry;
///
/// let login = ElementRegistry::create([
///     ("USERNAME_INPUT", "input[data-testid=\"username-input\"]"),
///     ("SUBMIT_BUTTON", "button[data-testid=\"submit-button\"]"),
/// ])?;
///
/// let submit = login.resolve("SUBMIT_BUTTON")?;
/// assert_eq!(submit.selector(), "button[data-testid=\"submit-button\"]");
/// # Ok::<(), pomkit::PomError>(())
/// ```
#[derive(Debug)]
pub struct ElementRegistry {
    elements: IndexMap<String, String>,
    origin: OriginScope,
}

impl ElementRegistry {
    /// Create a registry from `(name, selector)` pairs.
    ///
    /// Fails with `InvalidArgument` on an empty or duplicated name.
    pub fn create<I, K, V>(elements: I) -> PomResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let elements = collect_level(elements, "registry")?;
        debug!(elements = elements.len(), "element registry created");
        Ok(Self {
            elements,
            origin: OriginScope::new(),
        })
    }

    /// Create a registry from dynamic JSON input.
    ///
    /// `null` (an absent mapping) and anything that is not an object of
    /// strings fail with `InvalidArgument`. An empty object is valid.
    pub fn from_value(elements: &Value) -> PomResult<Self> {
        if elements.is_null() {
            return Err(PomError::invalid_argument(ELEMENTS_MUST_BE_OBJECT));
        }
        let elements = level_from_value(elements, "registry")?;
        debug!(elements = elements.len(), "element registry created from value");
        Ok(Self {
            elements,
            origin: OriginScope::new(),
        })
    }

    /// Parse a registry from a JSON document
    pub fn from_json_str(json: &str) -> PomResult<Self> {
        let value = parse_json(json)?;
        Self::from_value(&value)
    }

    /// Resolve a name to a locator in the current browsing context
    pub fn resolve(&self, key: impl AsRef<str>) -> PomResult<Locator> {
        let key = key.as_ref();
        self.selector(key).map(Locator::new)
    }

    /// Attach the cross-origin scope used by [`Self::resolve_scoped`].
    ///
    /// Only the first origin sticks; later calls return `self` unchanged.
    pub fn with_origin(&self, origin: &str) -> PomResult<&Self> {
        let _ = self.origin.attach(origin)?;
        Ok(self)
    }

    /// Resolve a name to a locator bound to the attached origin.
    ///
    /// Fails with `PreconditionFailed` when no origin is attached, whatever
    /// the key, and with `KeyNotFound` for unknown names.
    pub fn resolve_scoped(&self, key: impl AsRef<str>) -> PomResult<Locator> {
        let origin = self.origin.require()?;
        let key = key.as_ref();
        let selector = self.selector(key)?;
        debug!(key, origin, "scoped element resolved");
        Ok(Locator::new(selector).with_origin(origin))
    }

    /// Read-only view of every entry
    #[must_use]
    pub const fn all(&self) -> &IndexMap<String, String> {
        &self.elements
    }

    /// Attached origin, if any
    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.origin.get()
    }

    /// Whether a name is registered
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.elements.contains_key(key)
    }

    /// Registered names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the registry has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn selector(&self, key: &str) -> PomResult<&str> {
        self.elements
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| PomError::element_not_found(key))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::result::KeyKind;
    use serde_json::json;

    fn site() -> ElementRegistry {
        ElementRegistry::create([
            ("NAVIGATE", "ul.navbar-nav > li.nav-item:nth-child(1) > a.nav-link"),
            ("ITEMS", "div#tbodyid > div"),
            ("NEXT_ITEMS", "ul.pagination > li > button#next2"),
            ("PREV_ITEMS", "ul.pagination > li > button#prev2"),
        ])
        .unwrap()
    }

    mod create_tests {
        use super::*;

        #[test]
        fn test_create_from_pairs() {
            let registry = site();
            assert_eq!(registry.len(), 4);
            assert!(!registry.is_empty());
            assert!(registry.origin().is_none());
        }

        #[test]
        fn test_create_empty_is_valid() {
            let registry = ElementRegistry::create(Vec::<(String, String)>::new()).unwrap();
            assert!(registry.is_empty());
        }

        #[test]
        fn test_create_rejects_empty_key() {
            let err = ElementRegistry::create([("", "div")]).unwrap_err();
            assert!(matches!(err, PomError::InvalidArgument { .. }));
        }

        #[test]
        fn test_from_value_null_rejected() {
            let err = ElementRegistry::from_value(&Value::Null).unwrap_err();
            assert!(matches!(err, PomError::InvalidArgument { .. }));
            assert!(err.to_string().contains("The elements must be an object"));
        }

        #[test]
        fn test_from_value_non_object_rejected() {
            for value in [json!(false), json!(0), json!("div"), json!(["div"])] {
                assert!(matches!(
                    ElementRegistry::from_value(&value),
                    Err(PomError::InvalidArgument { .. })
                ));
            }
        }

        #[test]
        fn test_from_json_str() {
            let registry =
                ElementRegistry::from_json_str(r#"{"ITEMS": "div#list > div", "NEXT": "button#next"}"#)
                    .unwrap();
            let keys: Vec<_> = registry.keys().collect();
            assert_eq!(keys, vec!["ITEMS", "NEXT"]);
        }

        #[test]
        fn test_from_json_str_rejects_repeated_key() {
            let err = ElementRegistry::from_json_str(r#"{"A": "x", "A": "y"}"#).unwrap_err();
            assert!(matches!(err, PomError::InvalidArgument { .. }));
            assert!(err.to_string().contains("duplicate key A"));
        }
    }

    mod resolve_tests {
        use super::*;

        #[test]
        fn test_resolve_known_key() {
            let locator = site().resolve("ITEMS").unwrap();
            assert_eq!(locator.selector(), "div#tbodyid > div");
            assert!(!locator.is_scoped());
        }

        #[test]
        fn test_resolve_unknown_key() {
            let err = site().resolve("ITEM_9").unwrap_err();
            match err {
                PomError::KeyNotFound { kind, key } => {
                    assert_eq!(kind, KeyKind::Element);
                    assert_eq!(key, "ITEM_9");
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn test_empty_selector_is_found() {
            let registry = ElementRegistry::create([("PLACEHOLDER", "")]).unwrap();
            assert_eq!(registry.resolve("PLACEHOLDER").unwrap().selector(), "");
        }

        #[test]
        fn test_resolve_ignores_origin() {
            let registry = site();
            let _ = registry.with_origin("https://shop.example.com").unwrap();
            assert!(!registry.resolve("ITEMS").unwrap().is_scoped());
        }

        #[test]
        fn test_all_is_read_only_view() {
            let registry = site();
            assert_eq!(
                registry.all().get("NEXT_ITEMS").map(String::as_str),
                Some("ul.pagination > li > button#next2")
            );
        }
    }

    mod origin_tests {
        use super::*;

        #[test]
        fn test_with_origin_is_sticky() {
            let registry = site();
            let same = registry
                .with_origin("https://a.example.com")
                .unwrap()
                .with_origin("https://b.example.com")
                .unwrap();
            assert!(std::ptr::eq(same, &registry));
            assert_eq!(registry.origin(), Some("https://a.example.com"));
        }

        #[test]
        fn test_with_origin_rejects_empty() {
            let registry = site();
            assert!(matches!(
                registry.with_origin(""),
                Err(PomError::InvalidArgument { .. })
            ));
            assert!(registry.origin().is_none());
        }

        #[test]
        fn test_resolve_scoped_without_origin() {
            let registry = site();
            for key in ["ITEMS", "MISSING"] {
                assert!(matches!(
                    registry.resolve_scoped(key),
                    Err(PomError::PreconditionFailed { .. })
                ));
            }
        }

        #[test]
        fn test_resolve_scoped_with_origin() {
            let registry = site();
            let _ = registry.with_origin("https://shop.example.com").unwrap();
            let locator = registry.resolve_scoped("NEXT_ITEMS").unwrap();
            assert_eq!(locator.origin(), Some("https://shop.example.com"));
            assert_eq!(locator.selector(), "ul.pagination > li > button#next2");
            assert!(registry.resolve_scoped("MISSING").unwrap_err().is_key_not_found());
        }
    }
}
