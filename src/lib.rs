//! Briar - A natural-language scripting engine
//!
//! This crate re-exports the layers of the Briar system for convenient
//! access, plus a standard grammar in [`stdlib`]. For detailed
//! documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: briar::stdlib     — Standard types, converters, and syntax
//! Layer 1: briar_grammar     — Patterns, matcher, resolver, AST, loader
//! Layer 0: briar_foundation  — Core types (Value, ValueKind, Error)
//! ```

pub use briar_foundation as foundation;
pub use briar_grammar as grammar;

pub mod stdlib;
