//! Integration tests for the briar_grammar crate.
//!
//! Tests for the grammar pipeline:
//! - Pattern compilation
//! - Line matching against registered syntax
//! - Expression resolution (literals, variables, lists, expressions)
//! - Conversions
//! - Loading parse-phase nodes into runtime expressions

mod common;
mod conversions;
mod loading;
mod matching;
mod patterns;
mod resolving;
