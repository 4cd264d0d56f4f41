//! Pattern compilation tests against the standard types.

use briar::foundation::ValueKind;
use briar::grammar::pattern::{Admission, PatternElement};
use briar::grammar::{SlotType, compiler};
use briar::stdlib::standard_registry;

#[test]
fn standard_types_resolve_in_slots() {
    let registry = standard_registry().unwrap();
    let p = compiler::compile("give %integer% %strings%", &registry.types).unwrap();
    let parts = p.flatten();

    let PatternElement::Slot(amount) = &parts[1] else {
        panic!("expected a slot");
    };
    assert_eq!(amount.types, vec![SlotType::single(ValueKind::Int)]);

    let PatternElement::Slot(names) = &parts[3] else {
        panic!("expected a slot");
    };
    assert_eq!(names.types, vec![SlotType::plural(ValueKind::String)]);
}

#[test]
fn admission_flags_compile() {
    let registry = standard_registry().unwrap();
    let p = compiler::compile("set %^object% to %~objects%", &registry.types).unwrap();
    let parts = p.flatten();

    let PatternElement::Slot(target) = &parts[1] else {
        panic!("expected a slot");
    };
    assert_eq!(target.admission, Admission::VariablesOnly);

    let PatternElement::Slot(value) = &parts[3] else {
        panic!("expected a slot");
    };
    assert_eq!(value.admission, Admission::ExpressionsOnly);
    assert!(!value.types[0].single);
}

#[test]
fn display_reconstructs_groups() {
    let registry = standard_registry().unwrap();
    let source = "replace [(all|every)] %strings%";
    let p = compiler::compile(source, &registry.types).unwrap();
    assert_eq!(p.to_string(), source);
}

#[test]
fn unknown_type_fails_compilation() {
    let registry = standard_registry().unwrap();
    let err = compiler::compile("summon %dragon%", &registry.types).unwrap_err();
    assert!(err.to_string().contains("unknown type \"dragon\""));
}

#[test]
fn unbalanced_groups_fail_compilation() {
    let registry = standard_registry().unwrap();
    for bad in ["say [%string%", "say (a|b", "say %string", "say /[0-9]+"] {
        assert!(
            compiler::compile(bad, &registry.types).is_err(),
            "{bad} should not compile"
        );
    }
}
