//! Type registry: named types, literal parsers, and the conversion graph.
//!
//! Types are registered once during start-up and read-only afterwards. Every
//! type is identified by the [`ValueKind`] it produces and carries a singular
//! and a plural display name; grammar patterns refer to types by either form,
//! and the form used decides whether a slot wants one value or many.

use std::collections::HashMap;

use briar_foundation::{Error, Result, Value, ValueKind};

/// Index of a registered type descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeId(pub(crate) usize);

/// Parses a literal of this type from raw text. `None` means "not a literal
/// of this type", which is routine negative information, not an error.
pub type LiteralParser = fn(&str) -> Option<Value>;

/// Renders a value of this type for user-facing messages.
pub type Stringifier = fn(&Value) -> String;

/// Converts a value from one kind to another. `None` means this particular
/// value cannot be converted even though the edge exists.
pub type Converter = fn(&Value) -> Option<Value>;

/// A registered type descriptor.
///
/// Immutable once registered; the registry owns it for the process lifetime.
#[derive(Clone, Debug)]
pub struct TypeDescriptor {
    /// The kind of value this type produces.
    pub kind: ValueKind,
    /// Singular display name, e.g. `"string"`.
    pub singular: String,
    /// Plural display name, e.g. `"strings"`.
    pub plural: String,
    /// Optional literal parser.
    pub literal_parser: Option<LiteralParser>,
    /// Optional stringifier for diagnostics.
    pub stringifier: Option<Stringifier>,
}

impl TypeDescriptor {
    /// Creates a descriptor with no literal parser and no stringifier.
    #[must_use]
    pub fn new(kind: ValueKind, singular: impl Into<String>, plural: impl Into<String>) -> Self {
        Self {
            kind,
            singular: singular.into(),
            plural: plural.into(),
            literal_parser: None,
            stringifier: None,
        }
    }

    /// Attaches a literal parser.
    #[must_use]
    pub fn with_literal_parser(mut self, parser: LiteralParser) -> Self {
        self.literal_parser = Some(parser);
        self
    }

    /// Attaches a stringifier.
    #[must_use]
    pub fn with_stringifier(mut self, stringifier: Stringifier) -> Self {
        self.stringifier = Some(stringifier);
        self
    }
}

/// A type as used by a pattern slot: a value kind plus a number.
///
/// A slot written with a plural type name wants multiple values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotType {
    /// The expected value kind.
    pub kind: ValueKind,
    /// Whether exactly one value is wanted.
    pub single: bool,
}

impl SlotType {
    /// A single value of the given kind.
    #[must_use]
    pub const fn single(kind: ValueKind) -> Self {
        Self { kind, single: true }
    }

    /// One or more values of the given kind.
    #[must_use]
    pub const fn plural(kind: ValueKind) -> Self {
        Self {
            kind,
            single: false,
        }
    }
}

/// Registry of type descriptors and the conversion graph between kinds.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: Vec<TypeDescriptor>,
    converters: HashMap<(ValueKind, ValueKind), Converter>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type descriptor.
    ///
    /// # Errors
    /// Returns a `DuplicateName` error when either display name collides,
    /// case-insensitively, with any already registered singular or plural
    /// form.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Result<TypeId> {
        for existing in &self.types {
            for name in [&descriptor.singular, &descriptor.plural] {
                if name.eq_ignore_ascii_case(&existing.singular)
                    || name.eq_ignore_ascii_case(&existing.plural)
                {
                    return Err(Error::duplicate_name(name.clone()));
                }
            }
        }
        let id = TypeId(self.types.len());
        self.types.push(descriptor);
        Ok(id)
    }

    /// Gets a descriptor by id.
    ///
    /// # Panics
    /// Panics when the id does not belong to this registry; ids are only
    /// produced by [`TypeRegistry::register`], so this indicates a bug.
    #[must_use]
    pub fn get(&self, id: TypeId) -> &TypeDescriptor {
        &self.types[id.0]
    }

    /// Iterates all registered descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeDescriptor)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, d)| (TypeId(i), d))
    }

    /// Looks a type up by display name, case-insensitively.
    ///
    /// Singular forms are checked before plural forms; the second component
    /// of the result tells whether the plural form matched.
    #[must_use]
    pub fn lookup_by_name(&self, name: &str) -> Option<(TypeId, bool)> {
        for (i, d) in self.types.iter().enumerate() {
            if name.eq_ignore_ascii_case(&d.singular) {
                return Some((TypeId(i), false));
            }
        }
        for (i, d) in self.types.iter().enumerate() {
            if name.eq_ignore_ascii_case(&d.plural) {
                return Some((TypeId(i), true));
            }
        }
        None
    }

    /// Resolves a type name from a pattern into a slot type. The number
    /// (single or plural) is taken from which form matched.
    #[must_use]
    pub fn slot_type(&self, name: &str) -> Option<SlotType> {
        let (id, plural) = self.lookup_by_name(name)?;
        Some(SlotType {
            kind: self.get(id).kind,
            single: !plural,
        })
    }

    /// Finds the first registered descriptor producing the given kind.
    #[must_use]
    pub fn by_kind(&self, kind: ValueKind) -> Option<(TypeId, &TypeDescriptor)> {
        self.iter().find(|(_, d)| d.kind == kind)
    }

    /// Registers a conversion edge between two kinds.
    pub fn register_converter(&mut self, from: ValueKind, to: ValueKind, converter: Converter) {
        self.converters.insert((from, to), converter);
    }

    /// Checks whether a conversion edge exists. O(1).
    #[must_use]
    pub fn conversion_exists(&self, from: ValueKind, to: ValueKind) -> bool {
        self.converters.contains_key(&(from, to))
    }

    /// Applies the registered conversion from one kind to another.
    ///
    /// # Errors
    /// `NoConverter` when no edge exists; `TypeMismatch` when the edge
    /// exists but rejects this particular value. Callers that merely probe
    /// candidates should check [`TypeRegistry::conversion_exists`] first and
    /// treat failure as "no match".
    pub fn convert(&self, value: &Value, from: ValueKind, to: ValueKind) -> Result<Value> {
        let converter = self
            .converters
            .get(&(from, to))
            .ok_or_else(|| Error::no_converter(from, to))?;
        converter(value).ok_or_else(|| Error::type_mismatch(to, from))
    }

    /// Checks whether a value of kind `from` can satisfy an expectation of
    /// kind `to`, directly or via a registered converter. Kind `Any` on
    /// either side always satisfies.
    #[must_use]
    pub fn reachable(&self, from: ValueKind, to: ValueKind) -> bool {
        from == ValueKind::Any || to.accepts(from) || self.conversion_exists(from, to)
    }

    /// Attempts to parse a literal of the given type.
    ///
    /// `None` both when the type has no literal parser and when the parser
    /// rejects the text.
    #[must_use]
    pub fn parse_literal(&self, text: &str, id: TypeId) -> Option<Value> {
        let parser = self.get(id).literal_parser?;
        parser(text)
    }

    /// Renders a value for user-facing messages using the stringifier of the
    /// first type matching the value's kind, falling back to `Display`.
    #[must_use]
    pub fn display(&self, value: &Value) -> String {
        if let Some((_, d)) = self.by_kind(value.kind()) {
            if let Some(stringifier) = d.stringifier {
                return stringifier(value);
            }
        }
        value.to_string()
    }
}
