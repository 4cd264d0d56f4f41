//! The Briar grammar engine.
//!
//! Briar scripts are written in near-natural language; this crate turns a
//! registered grammar into a parser for them. A host registers types,
//! conversions, and syntax (conditions, effects, expressions, events, and
//! scopes), each syntax carrying one or more pattern strings. Scripts then
//! parse in two phases: resolution matches every line against the compiled
//! patterns and produces a plain AST, and loading instantiates the host's
//! runtime elements from that AST.
//!
//! The pattern language supports optional groups `[...]`, choice groups
//! `(a|b)` with parse marks, inline regexes `/.../`, and typed expression
//! slots `%type%` whose contents are resolved recursively.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod ast;
pub mod compiler;
pub mod diagnostics;
pub mod loader;
pub mod matcher;
pub mod pattern;
pub mod resolver;
pub mod runtime;
pub mod script;
pub mod source;
pub mod syntax;
pub mod types;

pub use ast::{AstNode, ExpressionNode, ListNode, LiteralNode, ParseCapture};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use loader::Loader;
pub use pattern::{Admission, PatternElement, SlotSpec};
pub use resolver::Resolver;
pub use runtime::{InitContext, RuntimeExpr, SyntaxElement};
pub use script::{
    LoadedScript, LoadedStatement, LoadedTrigger, ParsedScript, ScriptParser, load_script,
};
pub use syntax::{Registry, SyntaxDescriptor, SyntaxId, SyntaxKind};
pub use types::{SlotType, TypeDescriptor, TypeId, TypeRegistry};
