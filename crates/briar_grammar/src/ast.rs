//! Parse-phase AST nodes.
//!
//! Resolution produces these nodes without constructing any runtime state;
//! they carry everything the load phase needs and nothing else, so a parsed
//! script can be inspected, serialized, or discarded cheaply.

use briar_foundation::ValueKind;

use crate::syntax::SyntaxId;
use crate::types::{SlotType, TypeId};

/// How a pattern matched: which alternative, which marks, which captures.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParseCapture {
    /// Index of the pattern alternative that matched.
    pub alternative: usize,
    /// XOR of the parse marks of every matched choice branch.
    pub parse_mark: i32,
    /// Whole-match text of each inline regex, in pattern order.
    pub captures: Vec<String>,
}

/// A resolved literal or variable reference.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LiteralNode {
    /// The exact source text this node was resolved from.
    pub text: String,
    /// The type whose parser accepted the text; `None` for variables.
    pub source_type: Option<TypeId>,
    /// The kind this node produces.
    pub kind: ValueKind,
    /// The slot type the surrounding context expected.
    pub expected: SlotType,
    /// Whether this node produces a single value.
    pub single: bool,
    /// Whether this node is a variable reference rather than a literal.
    pub is_variable: bool,
}

/// A resolved expression: a syntax element plus its child inputs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpressionNode {
    /// The exact source text this node was resolved from.
    pub original: String,
    /// The registered syntax that matched.
    pub syntax: SyntaxId,
    /// The slot type expected by the surrounding context, when any.
    pub returns: Option<SlotType>,
    /// How the pattern matched.
    pub capture: ParseCapture,
    /// Resolved slot inputs, in pattern order.
    pub children: Vec<AstNode>,
}

/// A resolved list literal, e.g. `"a", "b" and "c"`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListNode {
    /// The exact source text this node was resolved from.
    pub original: String,
    /// The common kind of the members, `Any` when mixed.
    pub kind: ValueKind,
    /// Whether every member is a plain literal (variables excluded).
    pub all_literal: bool,
    /// True for and-lists, false for or-lists.
    pub conjunction: bool,
    /// The member nodes, in source order.
    pub children: Vec<AstNode>,
}

/// One node of the parse-phase tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AstNode {
    /// A literal or variable reference.
    Literal(LiteralNode),
    /// A matched syntax element.
    Expression(ExpressionNode),
    /// A list literal.
    List(ListNode),
}

impl AstNode {
    /// Whether this node is a plain literal (variables excluded).
    #[must_use]
    pub fn is_literal(&self) -> bool {
        match self {
            Self::Literal(lit) => !lit.is_variable,
            Self::List(list) => list.all_literal,
            Self::Expression(_) => false,
        }
    }

    /// Whether this node is a variable reference.
    #[must_use]
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Literal(lit) if lit.is_variable)
    }

    /// The kind this node produces.
    #[must_use]
    pub fn return_kind(&self) -> ValueKind {
        match self {
            Self::Literal(lit) => lit.kind,
            Self::Expression(expr) => expr
                .returns
                .map_or(ValueKind::Any, |slot| slot.kind),
            Self::List(list) => list.kind,
        }
    }

    /// Whether this node produces a single value.
    #[must_use]
    pub fn is_single(&self) -> bool {
        match self {
            Self::Literal(lit) => lit.single,
            Self::Expression(expr) => expr.returns.is_none_or(|slot| slot.single),
            Self::List(_) => false,
        }
    }

    /// The exact source text this node was resolved from.
    #[must_use]
    pub fn original(&self) -> &str {
        match self {
            Self::Literal(lit) => &lit.text,
            Self::Expression(expr) => &expr.original,
            Self::List(list) => &list.original,
        }
    }
}
