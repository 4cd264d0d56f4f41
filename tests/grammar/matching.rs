//! Line matching tests: alternatives, marks, captures, and slot scanning.

use briar::foundation::ValueKind;
use briar::grammar::{AstNode, Resolver, SlotType};
use briar::stdlib::standard_registry;

use crate::common::sink;

#[test]
fn optional_groups_may_vanish() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);

    for line in [
        "replace all \"a\" with \"b\" in {msg::*}",
        "replace every \"a\" with \"b\" in {msg::*}",
        "replace \"a\" with \"b\" in {msg::*}",
    ] {
        let node = resolver.resolve_effect(line);
        assert!(node.is_some(), "{line} should resolve");
    }
}

#[test]
fn alternatives_and_marks_are_reported() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);

    let node = resolver
        .resolve_effect("replace first occurrence of \"a\" with \"b\" in {msg::*}")
        .unwrap();
    let AstNode::Expression(expr) = node else {
        panic!("expected an expression");
    };
    assert_eq!(expr.capture.alternative, 1);
    assert_eq!(expr.capture.parse_mark, 1);
    assert_eq!(expr.children.len(), 3);

    let node = resolver
        .resolve_effect("replace last occurrence of \"a\" with \"b\" in {msg::*}")
        .unwrap();
    let AstNode::Expression(expr) = node else {
        panic!("expected an expression");
    };
    assert_eq!(expr.capture.parse_mark, 2);
}

#[test]
fn marks_combine_by_xor() {
    let mut registry = standard_registry().unwrap();
    registry
        .register_effect(&["turn (1:left|2:right) (4:slowly|8:sharply)"], sink, "test")
        .unwrap();
    let resolver = Resolver::new(&registry);

    let node = resolver.resolve_effect("turn right sharply").unwrap();
    let AstNode::Expression(expr) = node else {
        panic!("expected an expression");
    };
    assert_eq!(expr.capture.parse_mark, 2 ^ 8);
}

#[test]
fn inline_regex_captures_its_match() {
    let mut registry = standard_registry().unwrap();
    registry
        .register_effect(&["wait /[0-9]+/ tick[s]"], sink, "test")
        .unwrap();
    let resolver = Resolver::new(&registry);

    let node = resolver.resolve_effect("wait 42 ticks").unwrap();
    let AstNode::Expression(expr) = node else {
        panic!("expected an expression");
    };
    assert_eq!(expr.capture.captures, vec!["42".to_string()]);

    assert!(resolver.resolve_effect("wait 1 tick").is_some());
    assert!(resolver.resolve_effect("wait many ticks").is_none());
}

#[test]
fn matching_is_case_insensitive_with_flexible_whitespace() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);

    assert!(resolver.resolve_effect("SAY \"hello\"").is_some());
    assert!(resolver.resolve_effect("say   \"hello\"").is_some());
}

#[test]
fn adjacent_slots_never_match() {
    let mut registry = standard_registry().unwrap();
    registry
        .register_effect(&["pair %string% %string%"], sink, "test")
        .unwrap();
    let resolver = Resolver::new(&registry);

    assert!(resolver.resolve_effect("pair \"a\" \"b\"").is_none());
}

#[test]
fn slot_scan_takes_the_shortest_viable_candidate() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);

    // Both operands contain spaces around the separator word.
    let node = resolver
        .resolve_expression("8 plus 3", SlotType::single(ValueKind::Int))
        .unwrap();
    let AstNode::Expression(expr) = node else {
        panic!("expected an expression");
    };
    assert_eq!(expr.children.len(), 2);
    assert_eq!(expr.children[0].original(), "8");
    assert_eq!(expr.children[1].original(), "3");
}

#[test]
fn separator_scan_skips_parenthesized_text() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);

    // The first "plus" sits inside parentheses and must not split there.
    let node = resolver
        .resolve_expression("(1 plus 2) plus 3", SlotType::single(ValueKind::Int))
        .unwrap();
    let AstNode::Expression(expr) = node else {
        panic!("expected an expression");
    };
    let AstNode::Expression(inner) = &expr.children[0] else {
        panic!("expected a nested expression");
    };
    assert_eq!(inner.original, "1 plus 2");
    assert_eq!(expr.children[1].original(), "3");
}

#[test]
fn slot_before_skippable_choice_splits_at_the_trailing_literal() {
    let mut registry = standard_registry().unwrap();
    registry
        .register_effect(&["shout %string% ([quickly]|slowly) now"], sink, "test")
        .unwrap();
    let resolver = Resolver::new(&registry);

    assert!(resolver.resolve_effect("shout \"hi\" quickly now").is_some());
    assert!(resolver.resolve_effect("shout \"hi\" now").is_some());
}

#[test]
fn multibyte_separators_scan_cleanly() {
    let mut registry = standard_registry().unwrap();
    registry
        .register_expression(&["%integer% § %integer%"], ValueKind::Int, true, sink, "test")
        .unwrap();
    let resolver = Resolver::new(&registry);

    let node = resolver.resolve_expression("1 § 2", SlotType::single(ValueKind::Int));
    assert!(node.is_some());

    // The first separator candidate fails to resolve and the scan must
    // step over the multibyte character to try the next occurrence.
    let node = resolver.resolve_expression("x § 1 § 2", SlotType::single(ValueKind::Int));
    assert!(node.is_none());
}

#[test]
fn unconsumed_trailing_text_fails_the_match() {
    let registry = standard_registry().unwrap();
    let resolver = Resolver::new(&registry);

    assert!(resolver.resolve_effect("say \"hi\" loudly please").is_none());
}
