//! Runtime expression trees and the element initialization contract.
//!
//! The load phase turns parse-phase AST nodes into these. A host embeds the
//! engine by implementing [`SyntaxElement`] for each registered syntax; the
//! loader hands every element its resolved inputs exactly once, via `init`.

use std::fmt;

use briar_foundation::{Value, ValueKind};

use crate::syntax::SyntaxId;

/// How a pattern matched, as seen by an element's `init`.
#[derive(Debug)]
pub struct InitContext<'a> {
    /// Index of the pattern alternative that matched.
    pub alternative: usize,
    /// XOR of the parse marks of every matched choice branch.
    pub parse_mark: i32,
    /// Whole-match text of each inline regex, in pattern order.
    pub captures: &'a [String],
}

/// A registered syntax's runtime behavior.
///
/// `init` receives the loaded slot inputs in pattern order and may reject
/// them with a message; rejection fails the load of the surrounding line.
pub trait SyntaxElement: fmt::Debug {
    /// Accepts or rejects the element's resolved inputs.
    ///
    /// # Errors
    /// Returns a human-readable message when the inputs are unacceptable.
    fn init(
        &mut self,
        inputs: Vec<RuntimeExpr>,
        ctx: &InitContext<'_>,
    ) -> Result<(), String>;
}

/// A loaded, runnable expression tree.
#[derive(Debug)]
pub enum RuntimeExpr {
    /// A parsed literal value.
    Literal {
        /// The value.
        value: Value,
        /// Whether this produces a single value.
        single: bool,
    },
    /// A variable reference, resolved against host storage at run time.
    Variable {
        /// The variable name, without braces.
        name: String,
        /// Whether this names a list variable.
        list: bool,
        /// The kind the surrounding slot expects.
        kind: ValueKind,
    },
    /// An initialized syntax element with its own loaded inputs.
    Element {
        /// The registered syntax.
        syntax: SyntaxId,
        /// The pattern alternative that matched.
        alternative: usize,
        /// The initialized element.
        element: Box<dyn SyntaxElement>,
    },
    /// A loaded list literal.
    Aggregate {
        /// The member expressions, in source order.
        children: Vec<RuntimeExpr>,
        /// True for and-lists, false for or-lists.
        conjunction: bool,
        /// The common member kind, `Any` when mixed.
        kind: ValueKind,
    },
    /// A conversion applied around an inner expression.
    Converted {
        /// The inner expression's kind.
        from: ValueKind,
        /// The kind this wrapper produces.
        to: ValueKind,
        /// The wrapped expression.
        inner: Box<RuntimeExpr>,
    },
}

impl RuntimeExpr {
    /// The kind this expression produces.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Literal { value, .. } => value.kind(),
            Self::Variable { kind, .. } | Self::Aggregate { kind, .. } => *kind,
            Self::Element { .. } => ValueKind::Any,
            Self::Converted { to, .. } => *to,
        }
    }

    /// Extracts the literal value, when this is one.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Self::Literal { value, .. } => Some(value),
            _ => None,
        }
    }
}
