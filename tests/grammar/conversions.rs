//! Conversion graph tests over the standard registry.

use briar::foundation::{Value, ValueKind};
use briar::stdlib::standard_registry;
use proptest::prelude::*;

#[test]
fn standard_edges_exist() {
    let registry = standard_registry().unwrap();
    assert!(registry.types.conversion_exists(ValueKind::Int, ValueKind::Float));
    assert!(registry.types.conversion_exists(ValueKind::Int, ValueKind::String));
    assert!(registry.types.conversion_exists(ValueKind::Float, ValueKind::String));
    assert!(!registry.types.conversion_exists(ValueKind::String, ValueKind::Int));
}

#[test]
fn missing_edge_is_an_error() {
    let registry = standard_registry().unwrap();
    let err = registry
        .types
        .convert(&Value::Bool(true), ValueKind::Bool, ValueKind::Int)
        .unwrap_err();
    assert!(err.to_string().contains("no converter"));
}

proptest! {
    #[test]
    fn int_to_string_matches_display(n in any::<i64>()) {
        let registry = standard_registry().unwrap();
        let converted = registry
            .types
            .convert(&Value::Int(n), ValueKind::Int, ValueKind::String)
            .unwrap();
        let expected = n.to_string();
        prop_assert_eq!(converted.as_str(), Some(expected.as_str()));
    }

    #[test]
    fn existing_edges_convert_matching_values(n in any::<i64>()) {
        let registry = standard_registry().unwrap();
        // An edge that exists never fails for a value of its source kind.
        for to in [ValueKind::Float, ValueKind::String] {
            prop_assert!(registry.types.conversion_exists(ValueKind::Int, to));
            prop_assert!(
                registry
                    .types
                    .convert(&Value::Int(n), ValueKind::Int, to)
                    .is_ok()
            );
        }
    }
}
