//! Core types and values for the Briar scripting language.
//!
//! This crate provides:
//! - [`Value`] - The value type produced by literal parsers and converters
//! - [`ValueKind`] - The closed set of value kinds types are built over
//! - [`Error`] - Rich error types with source context
//!
//! "No match" is deliberately *not* an error in Briar: the grammar engine
//! treats failed candidates as routine negative information and models them
//! with `Option`, reserving [`Error`] for registration-time failures,
//! conversion failures, and load failures.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod kind;
pub mod value;

pub use error::{Error, ErrorContext, ErrorKind};
pub use kind::ValueKind;
pub use value::Value;

/// Convenient result alias for Briar operations.
pub type Result<T> = std::result::Result<T, Error>;
