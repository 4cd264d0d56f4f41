//! The standard Briar grammar: types, conversions, and core syntax.
//!
//! Hosts usually start from [`standard_registry`] and register their own
//! syntax on top. The standard grammar stays small: the basic value types
//! with their literal forms, numeric widening and stringification, and the
//! handful of statements every script ends up using.

use briar_foundation::{Result, Value, ValueKind};
use briar_grammar::runtime::{InitContext, RuntimeExpr, SyntaxElement};
use briar_grammar::syntax::Registry;
use briar_grammar::types::{TypeDescriptor, TypeRegistry};

const ORIGIN: &str = "briar:stdlib";

/// Builds a registry holding the standard types and syntax.
///
/// # Errors
/// Fails only on registration collisions or malformed patterns, which would
/// be a bug here rather than a user error.
pub fn standard_registry() -> Result<Registry> {
    let mut types = TypeRegistry::new();
    types.register(TypeDescriptor::new(ValueKind::Any, "object", "objects"))?;
    types.register(
        TypeDescriptor::new(ValueKind::Bool, "boolean", "booleans")
            .with_literal_parser(parse_boolean),
    )?;
    types.register(
        TypeDescriptor::new(ValueKind::Int, "integer", "integers")
            .with_literal_parser(parse_integer),
    )?;
    types.register(
        TypeDescriptor::new(ValueKind::Float, "number", "numbers")
            .with_literal_parser(parse_number),
    )?;
    types.register(
        TypeDescriptor::new(ValueKind::String, "string", "strings")
            .with_literal_parser(parse_quoted_string)
            .with_stringifier(quote_string),
    )?;
    types.register_converter(ValueKind::Int, ValueKind::Float, int_to_float);
    types.register_converter(ValueKind::Int, ValueKind::String, int_to_string);
    types.register_converter(ValueKind::Float, ValueKind::String, float_to_string);

    let mut registry = Registry::new(types);
    registry.register_event(&["[on] [script] load"], || Box::new(LoadEvent), ORIGIN)?;
    registry.register_effect(
        &["(say|print|broadcast) %strings%"],
        || Box::new(SayEffect::default()),
        ORIGIN,
    )?;
    registry.register_effect(
        &["set %^object% to %objects%"],
        || Box::new(SetEffect::default()),
        ORIGIN,
    )?;
    registry.register_effect(
        &[
            "replace [(all|every)] %strings% with %string% in %^strings%",
            "replace (1:first|2:last) occurrence of %strings% with %string% in %^strings%",
        ],
        || Box::new(ReplaceEffect::default()),
        ORIGIN,
    )?;
    registry.register_expression(
        &["join %strings% [with [delimiter] %string%]"],
        ValueKind::String,
        true,
        || Box::new(JoinExpression::default()),
        ORIGIN,
    )?;
    registry.register_expression(
        &["%integer% (plus|1:minus) %integer%"],
        ValueKind::Int,
        true,
        || Box::new(ArithmeticExpression::default()),
        ORIGIN,
    )?;
    registry.register_condition(
        &["%object% (1:is not|is) %object%"],
        || Box::new(EqualsCondition::default()),
        ORIGIN,
    )?;
    registry.register_condition(
        &["%number% is (greater|1:less) than %number%"],
        || Box::new(CompareCondition::default()),
        ORIGIN,
    )?;
    registry.register_scope(&["if %=boolean%"], || Box::new(IfScope::default()), ORIGIN, false)?;
    registry.register_scope(
        &["while %=boolean%"],
        || Box::new(WhileScope::default()),
        ORIGIN,
        false,
    )?;
    Ok(registry)
}

// Literal parsers

fn parse_boolean(text: &str) -> Option<Value> {
    if text.eq_ignore_ascii_case("true") {
        Some(Value::Bool(true))
    } else if text.eq_ignore_ascii_case("false") {
        Some(Value::Bool(false))
    } else {
        None
    }
}

fn parse_integer(text: &str) -> Option<Value> {
    text.parse::<i64>().ok().map(Value::Int)
}

fn parse_number(text: &str) -> Option<Value> {
    text.parse::<f64>().ok().map(Value::Float)
}

/// Parses a double-quoted string; `""` inside escapes one quote.
fn parse_quoted_string(text: &str) -> Option<Value> {
    let inner = text.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '"' {
            if chars.next()? != '"' {
                return None;
            }
            out.push('"');
        } else {
            out.push(c);
        }
    }
    Some(Value::from(out))
}

fn quote_string(value: &Value) -> String {
    format!("\"{value}\"")
}

// Converters

#[allow(clippy::cast_precision_loss)]
fn int_to_float(value: &Value) -> Option<Value> {
    value.as_int().map(|n| Value::Float(n as f64))
}

fn int_to_string(value: &Value) -> Option<Value> {
    value.as_int().map(|n| Value::from(n.to_string()))
}

fn float_to_string(value: &Value) -> Option<Value> {
    value.as_float().map(|n| Value::from(n.to_string()))
}

// Init helpers

fn take<const N: usize>(inputs: Vec<RuntimeExpr>) -> std::result::Result<[RuntimeExpr; N], String> {
    let len = inputs.len();
    <[RuntimeExpr; N]>::try_from(inputs).map_err(|_| format!("expected {N} inputs, got {len}"))
}

/// `on load` — fires once when the script loads.
#[derive(Debug, Default)]
pub struct LoadEvent;

impl SyntaxElement for LoadEvent {
    fn init(
        &mut self,
        inputs: Vec<RuntimeExpr>,
        _ctx: &InitContext<'_>,
    ) -> std::result::Result<(), String> {
        take::<0>(inputs).map(|_| ())
    }
}

/// `say %strings%`
#[derive(Debug, Default)]
pub struct SayEffect {
    /// The messages to emit.
    pub messages: Option<RuntimeExpr>,
}

impl SyntaxElement for SayEffect {
    fn init(
        &mut self,
        inputs: Vec<RuntimeExpr>,
        _ctx: &InitContext<'_>,
    ) -> std::result::Result<(), String> {
        let [messages] = take(inputs)?;
        self.messages = Some(messages);
        Ok(())
    }
}

/// `set %^object% to %objects%`
#[derive(Debug, Default)]
pub struct SetEffect {
    /// The target variable.
    pub target: Option<RuntimeExpr>,
    /// The value to assign.
    pub value: Option<RuntimeExpr>,
}

impl SyntaxElement for SetEffect {
    fn init(
        &mut self,
        inputs: Vec<RuntimeExpr>,
        _ctx: &InitContext<'_>,
    ) -> std::result::Result<(), String> {
        let [target, value] = take(inputs)?;
        if !matches!(target, RuntimeExpr::Variable { .. }) {
            return Err("the assignment target must be a variable".to_string());
        }
        self.target = Some(target);
        self.value = Some(value);
        Ok(())
    }
}

/// Which occurrences a replacement touches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReplaceMode {
    /// Every occurrence.
    #[default]
    All,
    /// Only the first occurrence.
    First,
    /// Only the last occurrence.
    Last,
}

/// `replace [all] %strings% with %string% in %^strings%`
#[derive(Debug, Default)]
pub struct ReplaceEffect {
    /// Which occurrences to replace.
    pub mode: ReplaceMode,
    /// The texts to search for.
    pub needles: Option<RuntimeExpr>,
    /// The replacement text.
    pub replacement: Option<RuntimeExpr>,
    /// The variable holding the haystacks.
    pub target: Option<RuntimeExpr>,
}

impl SyntaxElement for ReplaceEffect {
    fn init(
        &mut self,
        inputs: Vec<RuntimeExpr>,
        ctx: &InitContext<'_>,
    ) -> std::result::Result<(), String> {
        let [needles, replacement, target] = take(inputs)?;
        self.mode = match (ctx.alternative, ctx.parse_mark) {
            (0, _) => ReplaceMode::All,
            (1, 1) => ReplaceMode::First,
            (1, 2) => ReplaceMode::Last,
            (alternative, mark) => {
                return Err(format!(
                    "unrecognized replace form (alternative {alternative}, mark {mark})"
                ));
            }
        };
        self.needles = Some(needles);
        self.replacement = Some(replacement);
        self.target = Some(target);
        Ok(())
    }
}

/// `join %strings% [with [delimiter] %string%]`
#[derive(Debug, Default)]
pub struct JoinExpression {
    /// The strings to join.
    pub parts: Option<RuntimeExpr>,
    /// The delimiter, when one was given.
    pub delimiter: Option<RuntimeExpr>,
}

impl SyntaxElement for JoinExpression {
    fn init(
        &mut self,
        mut inputs: Vec<RuntimeExpr>,
        _ctx: &InitContext<'_>,
    ) -> std::result::Result<(), String> {
        if inputs.is_empty() || inputs.len() > 2 {
            return Err(format!("expected 1 or 2 inputs, got {}", inputs.len()));
        }
        if inputs.len() == 2 {
            self.delimiter = inputs.pop();
        }
        self.parts = inputs.pop();
        Ok(())
    }
}

/// `%integer% plus %integer%` and `%integer% minus %integer%`
#[derive(Debug, Default)]
pub struct ArithmeticExpression {
    /// True for subtraction.
    pub subtract: bool,
    /// Left operand.
    pub left: Option<RuntimeExpr>,
    /// Right operand.
    pub right: Option<RuntimeExpr>,
}

impl SyntaxElement for ArithmeticExpression {
    fn init(
        &mut self,
        inputs: Vec<RuntimeExpr>,
        ctx: &InitContext<'_>,
    ) -> std::result::Result<(), String> {
        let [left, right] = take(inputs)?;
        self.subtract = ctx.parse_mark == 1;
        self.left = Some(left);
        self.right = Some(right);
        Ok(())
    }
}

/// `%object% is %object%` and `%object% is not %object%`
#[derive(Debug, Default)]
pub struct EqualsCondition {
    /// True for the negated form.
    pub negated: bool,
    /// Left operand.
    pub left: Option<RuntimeExpr>,
    /// Right operand.
    pub right: Option<RuntimeExpr>,
}

impl SyntaxElement for EqualsCondition {
    fn init(
        &mut self,
        inputs: Vec<RuntimeExpr>,
        ctx: &InitContext<'_>,
    ) -> std::result::Result<(), String> {
        let [left, right] = take(inputs)?;
        self.negated = ctx.parse_mark == 1;
        self.left = Some(left);
        self.right = Some(right);
        Ok(())
    }
}

/// `%number% is greater than %number%` and the `less` form.
#[derive(Debug, Default)]
pub struct CompareCondition {
    /// True for the `less` form.
    pub less: bool,
    /// Left operand.
    pub left: Option<RuntimeExpr>,
    /// Right operand.
    pub right: Option<RuntimeExpr>,
}

impl SyntaxElement for CompareCondition {
    fn init(
        &mut self,
        inputs: Vec<RuntimeExpr>,
        ctx: &InitContext<'_>,
    ) -> std::result::Result<(), String> {
        let [left, right] = take(inputs)?;
        self.less = ctx.parse_mark == 1;
        self.left = Some(left);
        self.right = Some(right);
        Ok(())
    }
}

/// `if %=boolean%:`
#[derive(Debug, Default)]
pub struct IfScope {
    /// The guard condition.
    pub condition: Option<RuntimeExpr>,
}

impl SyntaxElement for IfScope {
    fn init(
        &mut self,
        inputs: Vec<RuntimeExpr>,
        _ctx: &InitContext<'_>,
    ) -> std::result::Result<(), String> {
        let [condition] = take(inputs)?;
        self.condition = Some(condition);
        Ok(())
    }
}

/// `while %=boolean%:`
#[derive(Debug, Default)]
pub struct WhileScope {
    /// The loop condition.
    pub condition: Option<RuntimeExpr>,
}

impl SyntaxElement for WhileScope {
    fn init(
        &mut self,
        inputs: Vec<RuntimeExpr>,
        _ctx: &InitContext<'_>,
    ) -> std::result::Result<(), String> {
        let [condition] = take(inputs)?;
        self.condition = Some(condition);
        Ok(())
    }
}
