//! Resolves source text into parse-phase AST nodes.
//!
//! For an expression slot the resolver tries, in order: a literal of any
//! type whose kind can reach the expectation, a variable reference, a list
//! literal when several values are wanted, and finally every registered
//! expression whose return kind fits. The first success wins. Failed
//! candidates leave no trace: the diagnostic log is marked before the
//! attempt and rolled back after, keeping only fatal entries and, on
//! exhaustion, a single report naming the text that resolved to nothing.

use std::cell::{Cell, RefCell};
use std::sync::LazyLock;

use briar_foundation::ValueKind;
use regex::Regex;

use crate::ast::{AstNode, ExpressionNode, ListNode, LiteralNode};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::matcher;
use crate::pattern::{Admission, SlotSpec};
use crate::syntax::{Registry, SyntaxKind};
use crate::types::SlotType;

/// Splits list literals on `,`, `and`, `or`, and `nor`.
static LIST_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\s*,\s*|\s+(?i:(and|or|nor))\s+)").expect("valid regex"));

/// Resolves lines and slot candidates against a registry.
///
/// Holds the diagnostic log behind interior mutability so the matcher can
/// call back into it while a pattern walk borrows it.
pub struct Resolver<'a> {
    registry: &'a Registry,
    diagnostics: RefCell<Diagnostics>,
    line: Cell<Option<usize>>,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over the given registry.
    #[must_use]
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            diagnostics: RefCell::new(Diagnostics::new()),
            line: Cell::new(None),
        }
    }

    /// The registry this resolver reads.
    #[must_use]
    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Sets the line number attached to subsequent diagnostics.
    pub fn set_line(&self, line: Option<usize>) {
        self.line.set(line);
    }

    /// Takes every collected diagnostic, leaving the log empty.
    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow_mut().drain()
    }

    /// Whether any diagnostic has been collected.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.borrow().has_errors()
    }

    /// Reports a free-form error at the current line.
    pub fn report(&self, message: impl Into<String>) {
        self.diagnostics.borrow_mut().error(self.line.get(), message);
    }

    fn report_fatal(&self, message: String) {
        self.diagnostics.borrow_mut().fatal(self.line.get(), message);
    }

    /// Resolves an expression expected by the surrounding context.
    ///
    /// Exhaustion reports a single diagnostic naming the text.
    pub fn resolve_expression(&self, text: &str, expected: SlotType) -> Option<AstNode> {
        let mark = self.diagnostics.borrow().mark();
        let node = self.try_expression(text, expected, Admission::Any);
        self.diagnostics.borrow_mut().rollback(mark);
        if node.is_none() {
            self.report(format!("no expression matching '{}' was found", text.trim()));
        }
        node
    }

    /// Resolves an effect line.
    pub fn resolve_effect(&self, text: &str) -> Option<AstNode> {
        self.resolve_line(text, SyntaxKind::Effect, "effect")
    }

    /// Resolves a condition line.
    pub fn resolve_condition(&self, text: &str) -> Option<AstNode> {
        self.resolve_line(text, SyntaxKind::Condition, "condition")
    }

    /// Resolves an event header.
    pub fn resolve_event(&self, text: &str) -> Option<AstNode> {
        self.resolve_line(text, SyntaxKind::Event, "event")
    }

    /// Resolves a scope header.
    pub fn resolve_scope(&self, text: &str) -> Option<AstNode> {
        self.resolve_line(text, SyntaxKind::Scope, "section")
    }

    /// Resolves a statement line: an effect, or a bare condition.
    pub fn resolve_statement(&self, text: &str) -> Option<AstNode> {
        let mark = self.diagnostics.borrow().mark();
        let node = self
            .try_kind(text, SyntaxKind::Effect)
            .or_else(|| self.try_kind(text, SyntaxKind::Condition));
        self.diagnostics.borrow_mut().rollback(mark);
        if node.is_none() {
            self.report(format!("no statement matching '{}' was found", text.trim()));
        }
        node
    }

    fn resolve_line(&self, text: &str, kind: SyntaxKind, what: &str) -> Option<AstNode> {
        let mark = self.diagnostics.borrow().mark();
        let node = self.try_kind(text, kind);
        self.diagnostics.borrow_mut().rollback(mark);
        if node.is_none() {
            self.report(format!("no {what} matching '{}' was found", text.trim()));
        }
        node
    }

    /// Resolves a slot candidate during a pattern walk. Routine failures
    /// report nothing; the surrounding walk tries other candidates.
    pub(crate) fn resolve_slot(&self, text: &str, spec: &SlotSpec) -> Option<AstNode> {
        for ty in &spec.types {
            if let Some(node) = self.try_expression(text, *ty, spec.admission) {
                return Some(node);
            }
        }
        if spec.accepts_conditional && spec.types.iter().any(|t| t.kind == ValueKind::Bool) {
            return self.try_kind(text, SyntaxKind::Condition);
        }
        None
    }

    /// The resolution ladder for one expected type.
    fn try_expression(
        &self,
        text: &str,
        expected: SlotType,
        admission: Admission,
    ) -> Option<AstNode> {
        let text = strip_parens(text);
        if text.is_empty() {
            return None;
        }

        if matches!(admission, Admission::Any | Admission::LiteralsOnly) {
            if let Some(node) = self.try_literal(text, expected) {
                return Some(node);
            }
        }

        if admission != Admission::LiteralsOnly {
            if let Some((name, list)) = parse_variable(text) {
                if list && expected.single {
                    self.report_fatal(format!(
                        "a single value was expected, but {text} represents multiple values"
                    ));
                    return None;
                }
                return Some(AstNode::Literal(LiteralNode {
                    text: text.to_string(),
                    source_type: None,
                    kind: ValueKind::Any,
                    expected,
                    single: !list,
                    is_variable: true,
                }));
            }
        }
        if admission == Admission::VariablesOnly {
            return None;
        }

        if !expected.single {
            if let Some(node) = self.try_list(text, expected, admission) {
                return Some(node);
            }
        }
        if admission == Admission::LiteralsOnly {
            return None;
        }

        self.try_syntax_expression(text, expected)
    }

    /// Tries every literal parser whose kind can reach the expectation.
    fn try_literal(&self, text: &str, expected: SlotType) -> Option<AstNode> {
        for (id, descriptor) in self.registry.types.iter() {
            if descriptor.literal_parser.is_none()
                || !self.registry.types.reachable(descriptor.kind, expected.kind)
            {
                continue;
            }
            if self.registry.types.parse_literal(text, id).is_some() {
                return Some(AstNode::Literal(LiteralNode {
                    text: text.to_string(),
                    source_type: Some(id),
                    kind: descriptor.kind,
                    expected,
                    single: expected.single,
                    is_variable: false,
                }));
            }
        }
        None
    }

    /// Tries to read the text as a list literal, e.g. `1, 2 and 3`.
    fn try_list(&self, text: &str, expected: SlotType, admission: Admission) -> Option<AstNode> {
        let (parts, conjunction) = split_list(text)?;
        if parts.len() < 2 {
            return None;
        }
        let member_type = SlotType::single(expected.kind);
        let mut children = Vec::with_capacity(parts.len());
        for part in parts {
            children.push(self.try_expression(part, member_type, admission)?);
        }

        let all_literal = children.iter().all(AstNode::is_literal);
        let mut kinds = children.iter().map(AstNode::return_kind);
        let kind = match kinds.next() {
            Some(first) if kinds.all(|k| k == first) => first,
            _ => ValueKind::Any,
        };
        Some(AstNode::List(ListNode {
            original: text.to_string(),
            kind,
            all_literal,
            conjunction,
            children,
        }))
    }

    /// Tries every compatible registered expression, in registration order.
    fn try_syntax_expression(&self, text: &str, expected: SlotType) -> Option<AstNode> {
        for id in self.registry.expressions_compatible(expected.kind) {
            let descriptor = self.registry.get(id);
            if expected.single && !descriptor.single {
                continue;
            }
            for (alternative, pattern) in descriptor.compiled.iter().enumerate() {
                if let Some((children, capture)) =
                    matcher::match_line(self, pattern, text, alternative)
                {
                    return Some(AstNode::Expression(ExpressionNode {
                        original: text.to_string(),
                        syntax: id,
                        returns: Some(expected),
                        capture,
                        children,
                    }));
                }
            }
        }
        None
    }

    /// Tries every registered syntax of one category against a whole line.
    fn try_kind(&self, text: &str, kind: SyntaxKind) -> Option<AstNode> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let returns = match kind {
            SyntaxKind::Condition => Some(SlotType::single(ValueKind::Bool)),
            _ => None,
        };
        for &id in self.registry.of_kind(kind) {
            let descriptor = self.registry.get(id);
            for (alternative, pattern) in descriptor.compiled.iter().enumerate() {
                if let Some((children, capture)) =
                    matcher::match_line(self, pattern, text, alternative)
                {
                    return Some(AstNode::Expression(ExpressionNode {
                        original: text.to_string(),
                        syntax: id,
                        returns,
                        capture,
                        children,
                    }));
                }
            }
        }
        None
    }
}

/// Strips any number of fully enclosing parenthesis pairs.
fn strip_parens(text: &str) -> &str {
    let mut text = text.trim();
    while let Some(inner) = enclosed_by_parens(text) {
        text = inner.trim();
    }
    text
}

/// When the whole text sits inside one `(...)` pair, returns the inside.
fn enclosed_by_parens(text: &str) -> Option<&str> {
    if !text.starts_with('(') || !text.ends_with(')') || text.len() < 2 {
        return None;
    }
    let mut depth = 0i32;
    let mut in_string = false;
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'"' => in_string = !in_string,
            b'(' if !in_string => depth += 1,
            b')' if !in_string => {
                depth -= 1;
                if depth == 0 && i + 1 < text.len() {
                    return None;
                }
            }
            _ => {}
        }
    }
    if depth == 0 {
        Some(&text[1..text.len() - 1])
    } else {
        None
    }
}

/// Reads `{name}` or `{name::*}` as a variable reference.
///
/// The braces must enclose the whole text and balance; the `::*` suffix
/// names a list variable.
fn parse_variable(text: &str) -> Option<(&str, bool)> {
    if !text.starts_with('{') || !text.ends_with('}') {
        return None;
    }
    let mut depth = 0i32;
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 && i + 1 < text.len() {
                    return None;
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    let name = &text[1..text.len() - 1];
    if name.is_empty() {
        return None;
    }
    match name.strip_suffix("::*") {
        Some(base) if !base.is_empty() => Some((base, true)),
        Some(_) => None,
        None => Some((name, false)),
    }
}

/// Splits a candidate list literal at top level. Returns the member texts
/// and whether the list is a conjunction (and-list).
///
/// `None` when no top-level separator exists or a member is empty.
fn split_list(text: &str) -> Option<(Vec<&str>, bool)> {
    let mut parts = Vec::new();
    let mut start = 0usize;
    let mut depth = 0i32;
    let mut in_string = false;
    let mut saw_and = false;
    let mut saw_or = false;

    let bytes = text.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'"' => in_string = !in_string,
            b'(' | b'{' if !in_string => depth += 1,
            b')' | b'}' if !in_string => depth -= 1,
            _ => {}
        }
        if depth == 0
            && !in_string
            && (b == b',' || b.is_ascii_whitespace())
            && text.is_char_boundary(i)
        {
            if let Some(caps) = LIST_SEPARATOR.captures(&text[i..]) {
                let part = text[start..i].trim();
                if part.is_empty() {
                    return None;
                }
                parts.push(part);
                // "nor" forces a conjunction just as "and" does.
                match caps.get(1).map(|m| m.as_str().to_ascii_lowercase()) {
                    Some(word) if word == "or" => saw_or = true,
                    Some(_) => saw_and = true,
                    None => {}
                }
                i += caps.get(0).map_or(1, |m| m.as_str().len());
                start = i;
                continue;
            }
        }
        i += 1;
    }
    let last = text[start..].trim();
    if last.is_empty() {
        return None;
    }
    parts.push(last);
    if parts.len() < 2 {
        return None;
    }
    let conjunction = !(saw_or && !saw_and);
    Some((parts, conjunction))
}
