//! Integration tests for the briar_foundation crate.
//!
//! Tests for the core value model:
//! - Value construction, extraction, and comparison
//! - Value kinds and direct acceptance
//! - Error construction and context

mod errors;
mod kinds;
