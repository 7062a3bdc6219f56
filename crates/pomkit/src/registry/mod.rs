//! Selector registries (page objects as data)
//!
//! A registry maps logical element names to selector strings so tests never
//! spell a CSS selector twice. Two shapes are supported:
//!
//! - [`ElementRegistry`]: `name -> selector`
//! - [`NestedRegistry`]: `namespace -> name -> selector`, where a namespace is
//!   a page, a form or a product feature
//!
//! Both are immutable after construction. The only post-construction state
//! is the [`OriginScope`], which can be attached once and never replaced.
//!
//! Keys are checked by membership, never by selector truthiness: an empty
//! selector string is a legal, findable entry.
//!
//! # Example
//!
//! ```
//! use pomkit::elements;
//!
//! let site = elements! {
//!     ITEMS => "div#tbodyid > div",
//!     NEXT => "ul.pagination > li > button#next2",
//! }?;
//!
//! assert_eq!(site.resolve("ITEMS")?.selector(), "div#tbodyid > div");
//! assert!(site.resolve("PREV").is_err());
//! # Ok::<(), pomkit::PomError>(())
//! ```

mod flat;
mod nested;

pub use flat::ElementRegistry;
pub use nested::NestedRegistry;

use crate::result::{PomError, PomResult};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::debug;

/// Message used whenever the elements argument is absent or not a mapping.
pub(crate) const ELEMENTS_MUST_BE_OBJECT: &str = "The elements must be an object";

/// One-time origin assignment shared by both registry shapes.
///
/// The first non-empty origin wins. Later assignments are accepted and
/// ignored, so a registry handed to several helpers keeps the origin its
/// owner gave it.
#[derive(Debug, Default)]
pub struct OriginScope {
    origin: OnceLock<String>,
}

impl OriginScope {
    /// Create an empty scope
    #[must_use]
    pub const fn new() -> Self {
        Self {
            origin: OnceLock::new(),
        }
    }

    /// Attach an origin. Returns `true` if this call set it.
    pub fn attach(&self, origin: &str) -> PomResult<bool> {
        if origin.is_empty() {
            return Err(PomError::invalid_argument("The origin must be a non-empty string"));
        }
        match self.origin.set(origin.to_string()) {
            Ok(()) => {
                debug!(origin, "origin scope attached");
                Ok(true)
            }
            Err(ignored) => {
                debug!(
                    kept = self.get().unwrap_or_default(),
                    ignored = %ignored,
                    "origin scope already attached, keeping first value"
                );
                Ok(false)
            }
        }
    }

    /// Get the attached origin
    #[must_use]
    pub fn get(&self) -> Option<&str> {
        self.origin.get().map(String::as_str)
    }

    /// Get the attached origin or fail with `PreconditionFailed`
    pub fn require(&self) -> PomResult<&str> {
        self.get().ok_or_else(|| {
            PomError::precondition_failed(
                "scoped resolution requires an origin; call with_origin first",
            )
        })
    }
}

/// Check that a registry key is usable.
///
/// Keys must be non-empty and not consist solely of whitespace.
pub fn validate_key(key: &str) -> PomResult<()> {
    if key.trim().is_empty() {
        return Err(PomError::invalid_argument(format!(
            "registry keys must be non-empty (got {key:?})"
        )));
    }
    Ok(())
}

/// Collect `(key, selector)` pairs into one validated registry level.
pub(crate) fn collect_level<I, K, V>(entries: I, context: &str) -> PomResult<IndexMap<String, String>>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut level = IndexMap::new();
    for (key, selector) in entries {
        let key = key.into();
        validate_key(&key)?;
        if level.contains_key(&key) {
            return Err(PomError::invalid_argument(format!(
                "duplicate key {key} in {context}"
            )));
        }
        let _ = level.insert(key, selector.into());
    }
    Ok(level)
}

/// Read one registry level out of a JSON object.
pub(crate) fn level_from_value(value: &Value, context: &str) -> PomResult<IndexMap<String, String>> {
    let Value::Object(map) = value else {
        return Err(PomError::invalid_argument(format!(
            "{ELEMENTS_MUST_BE_OBJECT} ({context} is {})",
            value_kind(value)
        )));
    };
    let mut level = IndexMap::with_capacity(map.len());
    for (key, selector) in map {
        validate_key(key)?;
        let Value::String(selector) = selector else {
            return Err(PomError::invalid_argument(format!(
                "selector for {key} in {context} must be a string (got {})",
                value_kind(selector)
            )));
        };
        let _ = level.insert(key.clone(), selector.clone());
    }
    Ok(level)
}

pub(crate) const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Build an [`ElementRegistry`] from `NAME => selector` pairs.
///
/// Expands to a `PomResult<ElementRegistry>`.
#[macro_export]
macro_rules! elements {
    ($($key:ident => $selector:expr),* $(,)?) => {{
        let entries: ::std::vec::Vec<(::std::string::String, ::std::string::String)> =
            ::std::vec![$((
                ::std::string::String::from(::std::stringify!($key)),
                ::std::string::String::from($selector),
            )),*];
        $crate::registry::ElementRegistry::create(entries)
    }};
}

/// Build a [`NestedRegistry`] from `NAMESPACE => { NAME => selector }` blocks.
///
/// Expands to a `PomResult<NestedRegistry>`.
#[macro_export]
macro_rules! nested_elements {
    ($($namespace:ident => { $($key:ident => $selector:expr),* $(,)? }),* $(,)?) => {{
        let namespaces: ::std::vec::Vec<(
            ::std::string::String,
            ::std::vec::Vec<(::std::string::String, ::std::string::String)>,
        )> = ::std::vec![$((
            ::std::string::String::from(::std::stringify!($namespace)),
            ::std::vec![$((
                ::std::string::String::from(::std::stringify!($key)),
                ::std::string::String::from($selector),
            )),*],
        )),*];
        $crate::registry::NestedRegistry::create(namespaces)
    }};
}
