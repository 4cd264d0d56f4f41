//! Value kind acceptance tests.

use briar::foundation::ValueKind;

#[test]
fn any_sits_on_top() {
    for kind in [
        ValueKind::Any,
        ValueKind::Bool,
        ValueKind::Int,
        ValueKind::Float,
        ValueKind::String,
    ] {
        assert!(ValueKind::Any.accepts(kind));
    }
}

#[test]
fn no_implicit_widening_between_concrete_kinds() {
    assert!(!ValueKind::Float.accepts(ValueKind::Int));
    assert!(!ValueKind::String.accepts(ValueKind::Int));
    assert!(!ValueKind::Int.accepts(ValueKind::Any));
}

#[test]
fn display_names_match_the_standard_types() {
    assert_eq!(ValueKind::Any.to_string(), "object");
    assert_eq!(ValueKind::Bool.to_string(), "boolean");
    assert_eq!(ValueKind::Float.to_string(), "float");
}
