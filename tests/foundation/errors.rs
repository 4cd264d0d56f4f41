//! Error construction and context tests.

use briar::foundation::{Error, ErrorContext, ErrorKind, ValueKind};

#[test]
fn pattern_syntax_error_names_pattern_and_offset() {
    let err = Error::pattern_syntax("say (a|b", 4, "unclosed choice group");
    let msg = err.to_string();
    assert!(msg.contains("say (a|b"));
    assert!(msg.contains("offset 4"));
    assert!(msg.contains("unclosed choice group"));
}

#[test]
fn conversion_errors_distinguish_edge_from_value() {
    let missing = Error::no_converter(ValueKind::Bool, ValueKind::Int);
    assert!(matches!(missing.kind, ErrorKind::NoConverter { .. }));

    let rejected = Error::type_mismatch(ValueKind::Int, ValueKind::String);
    assert!(matches!(rejected.kind, ErrorKind::TypeMismatch { .. }));
}

#[test]
fn context_carries_source_and_line() {
    let err = Error::load("bad inputs").with_context(
        ErrorContext::new().with_source("tour.br").with_line(7),
    );
    let ctx = err.context.as_ref().unwrap();
    assert_eq!(ctx.to_string(), "at tour.br:7");
}

#[test]
fn context_without_source_still_names_the_line() {
    let ctx = ErrorContext::new().with_line(12);
    assert_eq!(ctx.to_string(), "at line 12");
}
