//! Registered syntax: conditions, effects, expressions, events, and scopes.
//!
//! Registration compiles every pattern alternative eagerly so a malformed
//! pattern fails at registration time rather than on first use. The registry
//! is built once during start-up and then shared read-only by resolution.

use briar_foundation::{Result, ValueKind};

use crate::compiler;
use crate::pattern::PatternElement;
use crate::runtime::SyntaxElement;
use crate::types::TypeRegistry;

/// Index of a registered syntax descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyntaxId(pub(crate) usize);

/// The category of a registered syntax.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyntaxKind {
    /// A boolean test usable where a condition is expected.
    Condition,
    /// A statement with a side effect.
    Effect,
    /// A value-producing element usable inside slots.
    Expression,
    /// A trigger header introducing a section.
    Event,
    /// A section header for control flow, like `if` or `while`.
    Scope,
}

/// Creates a fresh, uninitialized element for a matched syntax.
pub type ElementFactory = fn() -> Box<dyn SyntaxElement>;

/// A registered syntax descriptor.
pub struct SyntaxDescriptor {
    /// The category this syntax belongs to.
    pub kind: SyntaxKind,
    /// The pattern alternatives, as written.
    pub patterns: Vec<String>,
    /// The compiled alternatives, in the same order.
    pub compiled: Vec<PatternElement>,
    /// The kind of value produced; only expressions carry one.
    pub returns: Option<ValueKind>,
    /// Whether expressions filling this slot produce a single value.
    pub single: bool,
    /// Factory for the runtime element.
    pub factory: ElementFactory,
    /// Registration origin, for diagnostics.
    pub origin: String,
    /// Whether this scope's body is kept as raw lines instead of parsed.
    pub verbatim: bool,
}

impl std::fmt::Debug for SyntaxDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxDescriptor")
            .field("kind", &self.kind)
            .field("patterns", &self.patterns)
            .field("returns", &self.returns)
            .field("single", &self.single)
            .field("origin", &self.origin)
            .field("verbatim", &self.verbatim)
            .finish_non_exhaustive()
    }
}

/// The full grammar: type registry plus every registered syntax.
#[derive(Debug, Default)]
pub struct Registry {
    /// The type registry patterns compile against.
    pub types: TypeRegistry,
    descriptors: Vec<SyntaxDescriptor>,
    conditions: Vec<SyntaxId>,
    effects: Vec<SyntaxId>,
    expressions: Vec<SyntaxId>,
    events: Vec<SyntaxId>,
    scopes: Vec<SyntaxId>,
}

impl Registry {
    /// Creates a registry over the given types.
    #[must_use]
    pub fn new(types: TypeRegistry) -> Self {
        Self {
            types,
            ..Self::default()
        }
    }

    fn register(
        &mut self,
        kind: SyntaxKind,
        patterns: &[&str],
        returns: Option<ValueKind>,
        single: bool,
        factory: ElementFactory,
        origin: &str,
        verbatim: bool,
    ) -> Result<SyntaxId> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            compiled.push(compiler::compile(pattern, &self.types)?);
        }
        let id = SyntaxId(self.descriptors.len());
        self.descriptors.push(SyntaxDescriptor {
            kind,
            patterns: patterns.iter().map(|&p| p.to_string()).collect(),
            compiled,
            returns,
            single,
            factory,
            origin: origin.to_string(),
            verbatim,
        });
        match kind {
            SyntaxKind::Condition => self.conditions.push(id),
            SyntaxKind::Effect => self.effects.push(id),
            SyntaxKind::Expression => self.expressions.push(id),
            SyntaxKind::Event => self.events.push(id),
            SyntaxKind::Scope => self.scopes.push(id),
        }
        Ok(id)
    }

    /// Registers a condition.
    ///
    /// # Errors
    /// Fails when any pattern alternative is malformed.
    pub fn register_condition(
        &mut self,
        patterns: &[&str],
        factory: ElementFactory,
        origin: &str,
    ) -> Result<SyntaxId> {
        self.register(
            SyntaxKind::Condition,
            patterns,
            Some(ValueKind::Bool),
            true,
            factory,
            origin,
            false,
        )
    }

    /// Registers an effect.
    ///
    /// # Errors
    /// Fails when any pattern alternative is malformed.
    pub fn register_effect(
        &mut self,
        patterns: &[&str],
        factory: ElementFactory,
        origin: &str,
    ) -> Result<SyntaxId> {
        self.register(SyntaxKind::Effect, patterns, None, true, factory, origin, false)
    }

    /// Registers an expression producing values of `returns`.
    ///
    /// # Errors
    /// Fails when any pattern alternative is malformed.
    pub fn register_expression(
        &mut self,
        patterns: &[&str],
        returns: ValueKind,
        single: bool,
        factory: ElementFactory,
        origin: &str,
    ) -> Result<SyntaxId> {
        self.register(
            SyntaxKind::Expression,
            patterns,
            Some(returns),
            single,
            factory,
            origin,
            false,
        )
    }

    /// Registers an event.
    ///
    /// # Errors
    /// Fails when any pattern alternative is malformed.
    pub fn register_event(
        &mut self,
        patterns: &[&str],
        factory: ElementFactory,
        origin: &str,
    ) -> Result<SyntaxId> {
        self.register(SyntaxKind::Event, patterns, None, true, factory, origin, false)
    }

    /// Registers a scope. Verbatim scopes keep their body as raw lines.
    ///
    /// # Errors
    /// Fails when any pattern alternative is malformed.
    pub fn register_scope(
        &mut self,
        patterns: &[&str],
        factory: ElementFactory,
        origin: &str,
        verbatim: bool,
    ) -> Result<SyntaxId> {
        self.register(SyntaxKind::Scope, patterns, None, true, factory, origin, verbatim)
    }

    /// Gets a descriptor by id.
    ///
    /// # Panics
    /// Panics when the id does not belong to this registry.
    #[must_use]
    pub fn get(&self, id: SyntaxId) -> &SyntaxDescriptor {
        &self.descriptors[id.0]
    }

    /// All registered syntax of the given category, in registration order.
    #[must_use]
    pub fn of_kind(&self, kind: SyntaxKind) -> &[SyntaxId] {
        match kind {
            SyntaxKind::Condition => &self.conditions,
            SyntaxKind::Effect => &self.effects,
            SyntaxKind::Expression => &self.expressions,
            SyntaxKind::Event => &self.events,
            SyntaxKind::Scope => &self.scopes,
        }
    }

    /// Expressions whose return kind can satisfy `expected`, directly or via
    /// a registered converter.
    pub fn expressions_compatible(
        &self,
        expected: ValueKind,
    ) -> impl Iterator<Item = SyntaxId> + '_ {
        self.expressions
            .iter()
            .copied()
            .filter(move |&id| match self.descriptors[id.0].returns {
                Some(returns) => self.types.reachable(returns, expected),
                None => false,
            })
    }
}
