//! Property tests for registry invariants

#![allow(clippy::expect_used, clippy::unwrap_used)]

use pomkit::{ElementRegistry, KeyKind, NestedRegistry, PomError};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn key() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9_]{0,11}"
}

fn selector() -> impl Strategy<Value = String> {
    "[a-z#.>: \\[\\]=\"-]{0,24}"
}

fn flat_map() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(key(), selector(), 0..12)
}

fn nested_map() -> impl Strategy<Value = BTreeMap<String, BTreeMap<String, String>>> {
    prop::collection::btree_map(key(), flat_map(), 0..6)
}

proptest! {
    #[test]
    fn prop_every_registered_key_resolves_to_its_selector(elements in flat_map()) {
        let registry = ElementRegistry::create(elements.clone()).unwrap();
        prop_assert_eq!(registry.len(), elements.len());
        for (key, selector) in &elements {
            let locator = registry.resolve(key).unwrap();
            prop_assert_eq!(locator.selector(), selector.as_str());
            prop_assert!(!locator.is_scoped());
        }
    }

    #[test]
    fn prop_unregistered_key_is_element_miss(elements in flat_map(), wanted in key()) {
        prop_assume!(!elements.contains_key(&wanted));
        let registry = ElementRegistry::create(elements).unwrap();
        match registry.resolve(&wanted) {
            Err(PomError::KeyNotFound { kind, key }) => {
                prop_assert_eq!(kind, KeyKind::Element);
                prop_assert_eq!(key, wanted);
            }
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }

    #[test]
    fn prop_first_origin_wins(elements in flat_map(), first in "https://[a-z]{1,8}\\.test", second in "https://[a-z]{1,8}\\.test") {
        let registry = ElementRegistry::create(elements.clone()).unwrap();
        let _ = registry.with_origin(&first).unwrap().with_origin(&second).unwrap();
        prop_assert_eq!(registry.origin(), Some(first.as_str()));
        for key in elements.keys() {
            let scoped = registry.resolve_scoped(key).unwrap();
            prop_assert_eq!(scoped.origin(), Some(first.as_str()));
        }
    }

    #[test]
    fn prop_scoped_without_origin_always_fails(elements in flat_map(), wanted in key()) {
        let registry = ElementRegistry::create(elements).unwrap();
        let failed_precondition = matches!(
            registry.resolve_scoped(&wanted),
            Err(PomError::PreconditionFailed { .. })
        );
        prop_assert!(failed_precondition);
    }

    #[test]
    fn prop_nested_resolution_checks_both_levels(elements in nested_map(), ns in key(), wanted in key()) {
        let registry = NestedRegistry::create(elements.clone()).unwrap();
        prop_assert_eq!(
            registry.element_count(),
            elements.values().map(BTreeMap::len).sum::<usize>()
        );

        let expected = match elements.get(&ns) {
            None => Err(KeyKind::Namespace),
            Some(level) => level.get(&wanted).cloned().ok_or(KeyKind::Element),
        };
        let actual = match registry.resolve(&ns, &wanted) {
            Ok(locator) => Ok(locator.selector().to_string()),
            Err(PomError::KeyNotFound { kind, .. }) => Err(kind),
            Err(other) => return Err(TestCaseError::fail(format!("unexpected {other}"))),
        };
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_json_round_trip_preserves_order(elements in flat_map()) {
        let json = serde_json::to_string(&elements).unwrap();
        let registry = ElementRegistry::from_json_str(&json).unwrap();
        let keys: Vec<&str> = registry.keys().collect();
        let expected: Vec<&str> = elements.keys().map(String::as_str).collect();
        prop_assert_eq!(keys, expected);
    }
}
