//! Script parse-phase tests.

use briar::grammar::script::{ScopeBody, ScriptParser, Statement};
use briar::grammar::{Registry, SyntaxElement};
use briar::grammar::runtime::{InitContext, RuntimeExpr};
use briar::stdlib::standard_registry;

const TOUR: &str = r#"
options:
    greeting: "hello"

on load:
    say {@greeting}
    set {count} to 5
    if {count} is 5:
        say "five"
"#;

#[test]
fn a_full_script_parses_cleanly() {
    let registry = standard_registry().unwrap();
    let parser = ScriptParser::new(&registry);

    let parsed = parser.parse("tour.br", TOUR);
    assert!(parser.take_diagnostics().is_empty());

    assert_eq!(parsed.symbols.options.get("greeting").map(String::as_str), Some("\"hello\""));
    assert_eq!(parsed.triggers.len(), 1);

    let trigger = &parsed.triggers[0];
    assert_eq!(trigger.statements.len(), 3);
    let Statement::Scope { body, .. } = &trigger.statements[2] else {
        panic!("expected a scope statement");
    };
    let ScopeBody::Parsed(inner) = body else {
        panic!("expected a parsed body");
    };
    assert_eq!(inner.len(), 1);
}

#[test]
fn failed_lines_are_local() {
    let registry = standard_registry().unwrap();
    let parser = ScriptParser::new(&registry);

    let parsed = parser.parse(
        "broken.br",
        "on load:\n    say \"ok\"\n    frobnicate widget\n\non script load:\n    say \"also ok\"\n",
    );

    assert_eq!(parsed.triggers.len(), 2);
    assert_eq!(parsed.triggers[0].statements.len(), 1);
    assert_eq!(parsed.triggers[1].statements.len(), 1);

    let diagnostics = parser.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].line, Some(3));
    assert!(diagnostics[0].message.contains("frobnicate widget"));
}

#[test]
fn unknown_event_headers_report_and_skip() {
    let registry = standard_registry().unwrap();
    let parser = ScriptParser::new(&registry);

    let parsed = parser.parse("bad.br", "on teleport:\n    say \"never\"\n");
    assert!(parsed.triggers.is_empty());

    let diagnostics = parser.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.contains("no event matching"));
}

#[test]
fn stray_top_level_lines_report() {
    let registry = standard_registry().unwrap();
    let parser = ScriptParser::new(&registry);

    let parsed = parser.parse("stray.br", "say \"hi\"\n");
    assert!(parsed.triggers.is_empty());

    let diagnostics = parser.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.contains("expected an event"));
}

#[test]
fn function_signatures_are_collected_not_triggered() {
    let registry = standard_registry().unwrap();
    let parser = ScriptParser::new(&registry);

    let parsed = parser.parse(
        "funcs.br",
        "function greet(name, times):\n    say \"hi\"\n",
    );
    assert!(parsed.triggers.is_empty());
    assert!(parser.take_diagnostics().is_empty());

    assert_eq!(parsed.symbols.functions.len(), 1);
    let signature = &parsed.symbols.functions[0];
    assert_eq!(signature.name, "greet");
    assert_eq!(signature.parameters, vec!["name", "times"]);
}

#[test]
fn options_substitute_into_headers_and_bodies() {
    let registry = standard_registry().unwrap();
    let parser = ScriptParser::new(&registry);

    let parsed = parser.parse(
        "opts.br",
        "options:\n    when: load\n\non {@when}:\n    say \"up\"\n",
    );
    assert!(parser.take_diagnostics().is_empty());
    assert_eq!(parsed.triggers.len(), 1);
}

#[derive(Debug, Default)]
struct RawBlock;

impl SyntaxElement for RawBlock {
    fn init(
        &mut self,
        _inputs: Vec<RuntimeExpr>,
        _ctx: &InitContext<'_>,
    ) -> Result<(), String> {
        Ok(())
    }
}

fn verbatim_registry() -> Registry {
    let mut registry = standard_registry().unwrap();
    registry
        .register_scope(&["embed"], || Box::new(RawBlock), "test", true)
        .unwrap();
    registry
}

#[test]
fn verbatim_scopes_keep_their_raw_lines() {
    let registry = verbatim_registry();
    let parser = ScriptParser::new(&registry);

    let parsed = parser.parse(
        "raw.br",
        "on load:\n    embed:\n        anything goes here\n        nested:\n            even this\n",
    );
    assert!(parser.take_diagnostics().is_empty());

    let Statement::Scope { body, .. } = &parsed.triggers[0].statements[0] else {
        panic!("expected a scope statement");
    };
    let ScopeBody::Raw(lines) = body else {
        panic!("expected a raw body");
    };
    let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["anything goes here", "nested:", "even this"]);
}
