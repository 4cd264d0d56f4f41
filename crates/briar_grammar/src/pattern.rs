//! The compiled pattern model.
//!
//! Patterns compile into a tree of [`PatternElement`]s. Matching consults the
//! tree directly; nothing here touches input text except the lookahead
//! helper, which computes what may legally follow a slot so the matcher can
//! bound its scan.

use std::fmt;

use regex::Regex;

use crate::types::SlotType;

/// How an expression slot admits candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// Literals, variables, and expressions all admitted.
    Any,
    /// Only non-literal expressions (and variables).
    ExpressionsOnly,
    /// Only literals.
    LiteralsOnly,
    /// Only variables.
    VariablesOnly,
}

/// A typed slot in a pattern, written `%type%` in pattern syntax.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotSpec {
    /// Acceptable slot types, in the order written.
    pub types: Vec<SlotType>,
    /// Which candidate categories are admitted.
    pub admission: Admission,
    /// Whether a bare condition may fill a boolean slot.
    pub accepts_conditional: bool,
}

/// A branch of a choice group, with its parse mark.
#[derive(Clone, Debug, PartialEq)]
pub struct ChoiceBranch {
    /// The branch's pattern.
    pub element: PatternElement,
    /// Mark combined into the match state by XOR when this branch matches.
    pub mark: i32,
}

/// One node of a compiled pattern.
#[derive(Clone, Debug)]
pub enum PatternElement {
    /// Literal text, matched case-insensitively with flexible whitespace.
    Text(String),
    /// An inline regular expression; its whole match is captured.
    Regex(Regex),
    /// An optional group, written `[...]`.
    Optional(Box<PatternElement>),
    /// A choice group, written `(a|b|...)`.
    Choice(Vec<ChoiceBranch>),
    /// A sequence of elements matched in order.
    Sequence(Vec<PatternElement>),
    /// A typed expression slot.
    Slot(SlotSpec),
}

impl PartialEq for PatternElement {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Regex(a), Self::Regex(b)) => a.as_str() == b.as_str(),
            (Self::Optional(a), Self::Optional(b)) => a == b,
            (Self::Choice(a), Self::Choice(b)) => a == b,
            (Self::Sequence(a), Self::Sequence(b)) => a == b,
            (Self::Slot(a), Self::Slot(b)) => a == b,
            _ => false,
        }
    }
}

impl PatternElement {
    /// Views this element as a slice of sequential parts.
    #[must_use]
    pub fn flatten(&self) -> &[PatternElement] {
        match self {
            Self::Sequence(parts) => parts,
            other => std::slice::from_ref(other),
        }
    }

    /// Counts the expression slots in this element, recursively.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        match self {
            Self::Text(_) | Self::Regex(_) => 0,
            Self::Slot(_) => 1,
            Self::Optional(inner) => inner.slot_count(),
            Self::Choice(branches) => branches.iter().map(|b| b.element.slot_count()).sum(),
            Self::Sequence(parts) => parts.iter().map(PatternElement::slot_count).sum(),
        }
    }
}

/// What may legally begin the input that follows a slot.
#[derive(Clone, Copy, Debug)]
pub enum PossibleInput<'a> {
    /// Nothing follows; the slot may run to the end of the line.
    EndOfLine,
    /// Literal text follows.
    Text(&'a str),
    /// A regular expression follows.
    Regex(&'a Regex),
    /// Another slot follows immediately.
    Slot(&'a SlotSpec),
}

/// Computes every input that may follow, given the elements after a slot.
///
/// Optional elements contribute their inputs and scanning continues past
/// them; the first mandatory element stops the scan. When every remaining
/// element is skippable the end of the line is also possible.
#[must_use]
pub fn possible_inputs(rest: &[PatternElement]) -> Vec<PossibleInput<'_>> {
    let mut inputs = Vec::new();
    if !fill_inputs(rest, &mut inputs) {
        inputs.push(PossibleInput::EndOfLine);
    }
    inputs
}

/// Returns true when a mandatory input was found.
pub(crate) fn fill_inputs<'a>(
    rest: &'a [PatternElement],
    inputs: &mut Vec<PossibleInput<'a>>,
) -> bool {
    for element in rest {
        match element {
            PatternElement::Text(text) => {
                if text.trim().is_empty() {
                    continue;
                }
                inputs.push(PossibleInput::Text(text));
                return true;
            }
            PatternElement::Regex(re) => {
                inputs.push(PossibleInput::Regex(re));
                return true;
            }
            PatternElement::Slot(spec) => {
                inputs.push(PossibleInput::Slot(spec));
                return true;
            }
            PatternElement::Sequence(parts) => {
                if fill_inputs(parts, inputs) {
                    return true;
                }
            }
            PatternElement::Choice(branches) => {
                let mut all_mandatory = true;
                for branch in branches {
                    if !fill_inputs(branch.element.flatten(), inputs) {
                        all_mandatory = false;
                    }
                }
                // A skippable branch lets the scan continue past the
                // choice, like an optional group.
                if all_mandatory {
                    return true;
                }
            }
            PatternElement::Optional(inner) => {
                // Contributes possibilities but never stops the scan.
                fill_inputs(inner.flatten(), inputs);
            }
        }
    }
    false
}

impl fmt::Display for PatternElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Regex(re) => write!(f, "/{}/", re.as_str()),
            Self::Optional(inner) => write!(f, "[{inner}]"),
            Self::Choice(branches) => {
                f.write_str("(")?;
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    if branch.mark != 0 {
                        write!(f, "{}:", branch.mark)?;
                    }
                    write!(f, "{}", branch.element)?;
                }
                f.write_str(")")
            }
            Self::Sequence(parts) => {
                for part in parts {
                    write!(f, "{part}")?;
                }
                Ok(())
            }
            Self::Slot(spec) => {
                f.write_str("%")?;
                match spec.admission {
                    Admission::Any => {}
                    Admission::ExpressionsOnly => f.write_str("~")?,
                    Admission::LiteralsOnly => f.write_str("*")?,
                    Admission::VariablesOnly => f.write_str("^")?,
                }
                if spec.accepts_conditional {
                    f.write_str("=")?;
                }
                for (i, ty) in spec.types.iter().enumerate() {
                    if i > 0 {
                        f.write_str("/")?;
                    }
                    write!(f, "{}{}", ty.kind, if ty.single { "" } else { "s" })?;
                }
                f.write_str("%")
            }
        }
    }
}
