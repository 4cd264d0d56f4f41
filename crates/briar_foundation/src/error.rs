//! Error types for the Briar grammar engine.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//!
//! Only genuinely fatal outcomes live here: malformed grammar patterns,
//! registration collisions, missing converters, rejected element
//! initialization and internal consistency violations. A candidate failing
//! to match is routine and is modeled with `Option`, never with [`Error`].

use std::fmt;

use thiserror::Error;

use crate::kind::ValueKind;

/// The main error type for Briar operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a pattern syntax error at the given byte position.
    #[must_use]
    pub fn pattern_syntax(pattern: impl Into<String>, position: usize, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PatternSyntax {
            pattern: pattern.into(),
            position,
            message: message.into(),
        })
    }

    /// Creates a duplicate name error.
    #[must_use]
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateName(name.into()))
    }

    /// Creates a missing converter error.
    #[must_use]
    pub fn no_converter(from: ValueKind, to: ValueKind) -> Self {
        Self::new(ErrorKind::NoConverter { from, to })
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: ValueKind, actual: ValueKind) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, actual })
    }

    /// Creates a load error carrying the element's own message.
    #[must_use]
    pub fn load(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Load(message.into()))
    }

    /// Creates an internal consistency error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A grammar pattern string is malformed. Registration-time, fatal to
    /// that registration only.
    #[error("malformed pattern at offset {position} in \"{pattern}\": {message}")]
    PatternSyntax {
        /// The offending pattern string.
        pattern: String,
        /// Byte offset of the offending span.
        position: usize,
        /// What went wrong.
        message: String,
    },

    /// A type display name collides with an already registered one.
    #[error("duplicate type name: {0}")]
    DuplicateName(String),

    /// No converter is registered between two kinds.
    #[error("no converter from {from} to {to}")]
    NoConverter {
        /// Source kind.
        from: ValueKind,
        /// Target kind.
        to: ValueKind,
    },

    /// A resolved value kind cannot reach the expected kind even via
    /// conversion.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The expected kind.
        expected: ValueKind,
        /// The actual kind encountered.
        actual: ValueKind,
    },

    /// Runtime initialization of a matched syntax element rejected its
    /// inputs.
    #[error("{0}")]
    Load(String),

    /// Internal consistency violation (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Script or registration origin name.
    pub source: Option<String>,
    /// Line number in the script.
    pub line: Option<usize>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source name.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line number.
    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
            if let Some(line) = self.line {
                write!(f, ":{line}")?;
            }
        } else if let Some(line) = self.line {
            write!(f, "at line {line}")?;
        }
        Ok(())
    }
}
