//! Structured diagnostics collected during resolution.
//!
//! Resolution tries many candidates, most of which fail routinely; their
//! diagnostics must not survive into what the user sees. Callers mark the
//! log before exploring a candidate and roll back afterwards. Fatal entries
//! survive a rollback: they describe errors that hold regardless of which
//! candidate wins, like a multi-value variable in a single-value slot.

/// Diagnostic severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// The candidate or line failed.
    Error,
    /// The line failed and no other candidate can rescue it.
    Fatal,
}

/// One collected diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity of this entry.
    pub severity: Severity,
    /// Script line, when known.
    pub line: Option<usize>,
    /// Human-readable message.
    pub message: String,
}

/// An append-only diagnostic log with mark/rollback.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an error.
    pub fn error(&mut self, line: Option<usize>, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            severity: Severity::Error,
            line,
            message: message.into(),
        });
    }

    /// Appends a fatal error; it survives rollbacks.
    pub fn fatal(&mut self, line: Option<usize>, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            severity: Severity::Fatal,
            line,
            message: message.into(),
        });
    }

    /// Returns a mark for later rollback.
    #[must_use]
    pub fn mark(&self) -> usize {
        self.entries.len()
    }

    /// Discards entries past the mark, retaining fatal ones.
    pub fn rollback(&mut self, mark: usize) {
        if mark >= self.entries.len() {
            return;
        }
        let retained: Vec<Diagnostic> = self
            .entries
            .drain(mark..)
            .filter(|d| d.severity == Severity::Fatal)
            .collect();
        self.entries.extend(retained);
    }

    /// Whether any entry has been collected.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }

    /// The collected entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Takes all collected entries, leaving the log empty.
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.entries)
    }
}
