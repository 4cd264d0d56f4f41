//! Load phase tests: literals, wrapping, conversion, and idempotence.

use briar::foundation::{Value, ValueKind};
use briar::grammar::runtime::RuntimeExpr;
use briar::grammar::{Loader, Resolver, SlotType};
use briar::stdlib::standard_registry;

#[test]
fn single_literal_in_a_plural_slot_loads_as_a_list() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);
    let loader = Loader::new(&registry);

    let node = resolver
        .resolve_expression("\"hi\"", SlotType::plural(ValueKind::String))
        .unwrap();
    let expr = loader.load(&node).unwrap();
    assert_eq!(
        expr.as_literal(),
        Some(&Value::List(vec![Value::from("hi")]))
    );
}

#[test]
fn integer_literal_widens_into_a_number_slot() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);
    let loader = Loader::new(&registry);

    let node = resolver
        .resolve_expression("42", SlotType::single(ValueKind::Float))
        .unwrap();
    let expr = loader.load(&node).unwrap();
    assert_eq!(expr.as_literal(), Some(&Value::Float(42.0)));
}

#[test]
fn expression_into_string_slot_wraps_in_conversion() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);
    let loader = Loader::new(&registry);

    let node = resolver
        .resolve_expression("8 plus 3", SlotType::single(ValueKind::String))
        .unwrap();
    let expr = loader.load(&node).unwrap();
    assert!(matches!(
        expr,
        RuntimeExpr::Converted {
            from: ValueKind::Int,
            to: ValueKind::String,
            ..
        }
    ));
}

#[test]
fn list_literal_loads_as_an_aggregate() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);
    let loader = Loader::new(&registry);

    let node = resolver
        .resolve_expression("1, 2 or 3", SlotType::plural(ValueKind::Int))
        .unwrap();
    let expr = loader.load(&node).unwrap();
    let RuntimeExpr::Aggregate {
        children,
        conjunction,
        kind,
    } = expr
    else {
        panic!("expected an aggregate");
    };
    assert_eq!(children.len(), 3);
    assert!(!conjunction);
    assert_eq!(kind, ValueKind::Int);
}

#[test]
fn replace_effect_decodes_its_form_at_init() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);
    let loader = Loader::new(&registry);

    let node = resolver
        .resolve_effect("replace first occurrence of \"a\" with \"b\" in {msg::*}")
        .unwrap();
    let expr = loader.load(&node).unwrap();
    let RuntimeExpr::Element { element, .. } = &expr else {
        panic!("expected an element");
    };
    let debug = format!("{element:?}");
    assert!(debug.contains("ReplaceEffect"));
    assert!(debug.contains("First"));
}

#[test]
fn loading_is_repeatable() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);
    let loader = Loader::new(&registry);

    let node = resolver
        .resolve_effect("say \"a\" and \"b\"")
        .unwrap();
    let first = loader.load(&node).unwrap();
    let second = loader.load(&node).unwrap();
    assert_eq!(format!("{first:?}"), format!("{second:?}"));
}

#[test]
fn variables_load_as_references() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);
    let loader = Loader::new(&registry);

    let node = resolver
        .resolve_expression("{scores::*}", SlotType::plural(ValueKind::Int))
        .unwrap();
    let expr = loader.load(&node).unwrap();
    let RuntimeExpr::Variable { name, list, kind } = expr else {
        panic!("expected a variable reference");
    };
    assert_eq!(name, "scores");
    assert!(list);
    assert_eq!(kind, ValueKind::Int);
}
