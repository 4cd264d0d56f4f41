//! The load phase: turns parse-phase AST nodes into runtime expressions.
//!
//! Children load before parents, so an element's `init` always receives
//! fully loaded inputs. Kind mismatches that survived resolution are closed
//! here, by parsing literals into their expected kind or wrapping an
//! expression in its registered conversion.

use briar_foundation::{Error, Result, Value, ValueKind};

use crate::ast::{AstNode, ExpressionNode, ListNode, LiteralNode};
use crate::runtime::{InitContext, RuntimeExpr};
use crate::syntax::Registry;

/// Loads parse-phase nodes against a registry.
pub struct Loader<'a> {
    registry: &'a Registry,
}

impl<'a> Loader<'a> {
    /// Creates a loader over the given registry.
    #[must_use]
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Loads one node, post-order.
    ///
    /// # Errors
    /// Fails when a literal no longer parses, a required conversion is
    /// missing or rejects the value, or an element's `init` rejects its
    /// inputs.
    pub fn load(&self, node: &AstNode) -> Result<RuntimeExpr> {
        match node {
            AstNode::Literal(literal) => self.load_literal(literal),
            AstNode::Expression(expression) => self.load_expression(expression),
            AstNode::List(list) => self.load_list(list),
        }
    }

    fn load_literal(&self, literal: &LiteralNode) -> Result<RuntimeExpr> {
        if literal.is_variable {
            return Ok(RuntimeExpr::Variable {
                name: variable_name(&literal.text).to_string(),
                list: !literal.single,
                kind: literal.expected.kind,
            });
        }
        let id = literal
            .source_type
            .ok_or_else(|| Error::internal("literal node carries no source type"))?;
        let value = self
            .registry
            .types
            .parse_literal(&literal.text, id)
            .ok_or_else(|| {
                Error::internal(format!("literal '{}' no longer parses", literal.text))
            })?;
        let value = if literal.expected.kind.accepts(value.kind()) {
            value
        } else {
            self.registry
                .types
                .convert(&value, value.kind(), literal.expected.kind)?
        };
        // A plural slot always sees a list, even of one literal.
        let value = if literal.single {
            value
        } else {
            Value::List(vec![value])
        };
        Ok(RuntimeExpr::Literal {
            value,
            single: literal.single,
        })
    }

    fn load_expression(&self, expression: &ExpressionNode) -> Result<RuntimeExpr> {
        let descriptor = self.registry.get(expression.syntax);
        let mut inputs = Vec::with_capacity(expression.children.len());
        for child in &expression.children {
            inputs.push(self.load(child)?);
        }
        let mut element = (descriptor.factory)();
        let ctx = InitContext {
            alternative: expression.capture.alternative,
            parse_mark: expression.capture.parse_mark,
            captures: &expression.capture.captures,
        };
        element.init(inputs, &ctx).map_err(Error::load)?;

        let loaded = RuntimeExpr::Element {
            syntax: expression.syntax,
            alternative: expression.capture.alternative,
            element,
        };
        let Some(expected) = expression.returns else {
            return Ok(loaded);
        };
        let Some(declared) = descriptor.returns else {
            return Ok(loaded);
        };
        if declared == ValueKind::Any || expected.kind.accepts(declared) {
            return Ok(loaded);
        }
        if self.registry.types.conversion_exists(declared, expected.kind) {
            return Ok(RuntimeExpr::Converted {
                from: declared,
                to: expected.kind,
                inner: Box::new(loaded),
            });
        }
        Err(Error::type_mismatch(expected.kind, declared))
    }

    fn load_list(&self, list: &ListNode) -> Result<RuntimeExpr> {
        let mut children = Vec::with_capacity(list.children.len());
        for child in &list.children {
            children.push(self.load(child)?);
        }
        Ok(RuntimeExpr::Aggregate {
            children,
            conjunction: list.conjunction,
            kind: list.kind,
        })
    }
}

/// Strips braces and the list suffix from a variable reference's text.
fn variable_name(text: &str) -> &str {
    let inner = text
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .unwrap_or(text);
    inner.strip_suffix("::*").unwrap_or(inner)
}
