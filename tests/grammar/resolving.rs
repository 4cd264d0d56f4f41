//! Resolution ladder tests: literals, variables, lists, and diagnostics.

use briar::foundation::ValueKind;
use briar::grammar::diagnostics::Severity;
use briar::grammar::{AstNode, Resolver, SlotType};
use briar::stdlib::standard_registry;

#[test]
fn literals_resolve_by_type_parser() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);

    let node = resolver
        .resolve_expression("42", SlotType::single(ValueKind::Int))
        .unwrap();
    assert!(node.is_literal());
    assert_eq!(node.return_kind(), ValueKind::Int);

    let node = resolver
        .resolve_expression("\"hi\"", SlotType::single(ValueKind::String))
        .unwrap();
    assert_eq!(node.return_kind(), ValueKind::String);
}

#[test]
fn literal_of_convertible_kind_is_accepted() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);

    // An integer literal satisfies a number slot through widening.
    let node = resolver
        .resolve_expression("42", SlotType::single(ValueKind::Float))
        .unwrap();
    assert!(node.is_literal());
}

#[test]
fn variables_resolve_with_their_plurality() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);

    let node = resolver
        .resolve_expression("{counter}", SlotType::single(ValueKind::Int))
        .unwrap();
    assert!(node.is_variable());
    assert!(node.is_single());

    let node = resolver
        .resolve_expression("{items::*}", SlotType::plural(ValueKind::String))
        .unwrap();
    assert!(node.is_variable());
    assert!(!node.is_single());
}

#[test]
fn list_variable_in_single_slot_is_fatal() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);

    let node = resolver.resolve_expression("{items::*}", SlotType::single(ValueKind::Int));
    assert!(node.is_none());

    let diagnostics = resolver.take_diagnostics();
    assert!(
        diagnostics
            .iter()
            .any(|d| d.severity == Severity::Fatal
                && d.message.contains("a single value was expected"))
    );
}

#[test]
fn and_list_resolves_as_conjunction() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);

    let node = resolver
        .resolve_expression("\"a\", \"b\" and \"c\"", SlotType::plural(ValueKind::String))
        .unwrap();
    let AstNode::List(list) = node else {
        panic!("expected a list");
    };
    assert!(list.conjunction);
    assert!(list.all_literal);
    assert_eq!(list.kind, ValueKind::String);
    assert_eq!(list.children.len(), 3);
}

#[test]
fn or_list_resolves_as_disjunction() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);

    let node = resolver
        .resolve_expression("1 or 2", SlotType::plural(ValueKind::Int))
        .unwrap();
    let AstNode::List(list) = node else {
        panic!("expected a list");
    };
    assert!(!list.conjunction);
}

#[test]
fn nor_list_resolves_as_conjunction() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);

    let node = resolver
        .resolve_expression("1 nor 2", SlotType::plural(ValueKind::Int))
        .unwrap();
    let AstNode::List(list) = node else {
        panic!("expected a list");
    };
    assert!(list.conjunction);
}

#[test]
fn parenthesized_members_nest() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);

    let node = resolver
        .resolve_expression("(1 and 2) and 3", SlotType::plural(ValueKind::Int))
        .unwrap();
    let AstNode::List(outer) = node else {
        panic!("expected a list");
    };
    assert_eq!(outer.children.len(), 2);
    let AstNode::List(inner) = &outer.children[0] else {
        panic!("expected a nested list");
    };
    assert_eq!(inner.children.len(), 2);
}

#[test]
fn variables_exclude_a_list_from_all_literal() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);

    let node = resolver
        .resolve_expression("\"a\" and {b}", SlotType::plural(ValueKind::String))
        .unwrap();
    let AstNode::List(list) = node else {
        panic!("expected a list");
    };
    assert!(!list.all_literal);
}

#[test]
fn lists_never_fill_single_slots() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);

    let node = resolver.resolve_expression("1 and 2", SlotType::single(ValueKind::Int));
    assert!(node.is_none());
}

#[test]
fn exhaustion_reports_one_diagnostic() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);

    let node = resolver.resolve_expression("gibberish", SlotType::single(ValueKind::Int));
    assert!(node.is_none());

    let diagnostics = resolver.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.contains("no expression matching 'gibberish'"));
}

#[test]
fn successful_resolution_leaves_no_diagnostics() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);

    resolver
        .resolve_effect("say \"hello\" and \"goodbye\"")
        .unwrap();
    assert!(!resolver.has_errors());
}

#[test]
fn conditional_slot_accepts_a_bare_condition() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);

    let node = resolver.resolve_scope("if 5 is greater than 3").unwrap();
    let AstNode::Expression(scope) = node else {
        panic!("expected an expression");
    };
    assert_eq!(scope.children.len(), 1);
    let AstNode::Expression(condition) = &scope.children[0] else {
        panic!("expected a condition child");
    };
    assert_eq!(
        condition.returns,
        Some(SlotType::single(ValueKind::Bool))
    );
}

#[test]
fn statements_fall_back_from_effects_to_conditions() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);

    assert!(resolver.resolve_statement("say \"hi\"").is_some());
    assert!(resolver.resolve_statement("1 is 1").is_some());
    assert!(resolver.resolve_statement("dance wildly").is_none());
}
