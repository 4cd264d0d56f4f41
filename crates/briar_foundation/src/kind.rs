//! Value kinds for type registration and slot typing.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The closed set of value kinds.
///
/// Every registered type descriptor is identified by the kind of value it
/// produces. Kinds form a flat lattice: [`ValueKind::Any`] sits on top and
/// accepts everything, all other kinds only accept themselves. Widening
/// between concrete kinds goes through registered converters, never through
/// implicit subtyping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValueKind {
    /// Accepts any value; the kind of the universal `object` type.
    Any,
    /// Boolean values.
    Bool,
    /// 64-bit signed integers.
    Int,
    /// 64-bit floating point values.
    Float,
    /// String values.
    String,
}

impl ValueKind {
    /// Checks whether a value of `other` kind satisfies this kind directly,
    /// without conversion.
    #[must_use]
    pub fn accepts(self, other: ValueKind) -> bool {
        self == Self::Any || self == other
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "object"),
            Self::Bool => write!(f, "boolean"),
            Self::Int => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
        }
    }
}
