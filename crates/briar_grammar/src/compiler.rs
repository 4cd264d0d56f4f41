//! Compiles pattern strings into [`PatternElement`] trees.
//!
//! Pattern syntax:
//!
//! * `[...]` — optional group
//! * `(a|b)` — choice group; branches may carry `N:` parse marks
//! * `%type%` — expression slot; `~` admits only expressions, `*` only
//!   literals, `^` only variables, `=` lets a bare condition fill a boolean
//!   slot, and `/` separates acceptable types
//! * `/regex/` — inline regular expression
//! * `\x` — escapes any character into literal text
//!
//! Compilation happens once per registered pattern; a malformed pattern
//! fails the registration with a [`PatternSyntax`](briar_foundation::ErrorKind::PatternSyntax)
//! error naming the offending offset.

use briar_foundation::{Error, Result};
use regex::Regex;

use crate::pattern::{Admission, ChoiceBranch, PatternElement, SlotSpec};
use crate::types::TypeRegistry;

/// Compiles one pattern string against the given type registry.
///
/// # Errors
/// Returns a `PatternSyntax` error on unbalanced delimiters, an empty or
/// unknown slot type, an invalid inline regex, or a malformed parse mark.
pub fn compile(pattern: &str, types: &TypeRegistry) -> Result<PatternElement> {
    let mut compiler = Compiler {
        pattern,
        bytes: pattern.as_bytes(),
        pos: 0,
        types,
    };
    compiler.sequence(&[])
}

struct Compiler<'a> {
    pattern: &'a str,
    bytes: &'a [u8],
    pos: usize,
    types: &'a TypeRegistry,
}

impl Compiler<'_> {
    fn error(&self, position: usize, message: impl Into<String>) -> Error {
        Error::pattern_syntax(self.pattern, position, message)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Parses a sequence until one of `stops` or the end of the pattern.
    /// Single-element sequences collapse to the element itself.
    fn sequence(&mut self, stops: &[u8]) -> Result<PatternElement> {
        let mut parts = Vec::new();
        let mut text = String::new();

        while let Some(b) = self.peek() {
            if stops.contains(&b) {
                break;
            }
            match b {
                b'\\' => {
                    self.pos += 1;
                    match self.next_char() {
                        Some(c) => text.push(c),
                        None => {
                            return Err(self.error(self.pos - 1, "dangling escape"));
                        }
                    }
                }
                b'[' => {
                    let open = self.pos;
                    self.flush(&mut text, &mut parts);
                    self.pos += 1;
                    let inner = self.sequence(&[b']'])?;
                    if self.peek() != Some(b']') {
                        return Err(self.error(open, "unclosed optional group"));
                    }
                    self.pos += 1;
                    parts.push(PatternElement::Optional(Box::new(inner)));
                }
                b'(' => {
                    let open = self.pos;
                    self.flush(&mut text, &mut parts);
                    self.pos += 1;
                    parts.push(self.choice(open)?);
                }
                b'%' => {
                    let open = self.pos;
                    self.flush(&mut text, &mut parts);
                    self.pos += 1;
                    parts.push(self.slot(open)?);
                }
                b'/' => {
                    let open = self.pos;
                    self.flush(&mut text, &mut parts);
                    self.pos += 1;
                    parts.push(self.regex(open)?);
                }
                b']' | b')' | b'|' => {
                    return Err(self.error(self.pos, "unmatched closing delimiter"));
                }
                _ => match self.next_char() {
                    Some(c) => text.push(c),
                    None => break,
                },
            }
        }
        self.flush(&mut text, &mut parts);

        Ok(match parts.len() {
            0 => PatternElement::Text(String::new()),
            1 => parts.pop().unwrap_or(PatternElement::Text(String::new())),
            _ => PatternElement::Sequence(parts),
        })
    }

    /// Consumes and returns the char at the current position.
    fn next_char(&mut self) -> Option<char> {
        let c = self.pattern[self.pos..].chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn flush(&self, text: &mut String, parts: &mut Vec<PatternElement>) {
        if !text.is_empty() {
            parts.push(PatternElement::Text(std::mem::take(text)));
        }
    }

    /// Parses a choice group; the opening `(` is already consumed.
    fn choice(&mut self, open: usize) -> Result<PatternElement> {
        let mut branches = Vec::new();
        loop {
            let mark = self.parse_mark();
            let element = self.sequence(&[b'|', b')'])?;
            branches.push(ChoiceBranch { element, mark });
            match self.peek() {
                Some(b'|') => self.pos += 1,
                Some(b')') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.error(open, "unclosed choice group")),
            }
        }
        Ok(PatternElement::Choice(branches))
    }

    /// Parses an optional leading `digits:` parse mark for a choice branch.
    fn parse_mark(&mut self) -> i32 {
        let start = self.pos;
        let mut end = self.pos;
        while let Some(b) = self.bytes.get(end) {
            if b.is_ascii_digit() {
                end += 1;
            } else {
                break;
            }
        }
        if end > start && self.bytes.get(end) == Some(&b':') {
            if let Ok(mark) = self.pattern[start..end].parse::<i32>() {
                self.pos = end + 1;
                return mark;
            }
        }
        0
    }

    /// Parses an expression slot; the opening `%` is already consumed.
    fn slot(&mut self, open: usize) -> Result<PatternElement> {
        let admission = match self.peek() {
            Some(b'~') => {
                self.pos += 1;
                Admission::ExpressionsOnly
            }
            Some(b'*') => {
                self.pos += 1;
                Admission::LiteralsOnly
            }
            Some(b'^') => {
                self.pos += 1;
                Admission::VariablesOnly
            }
            _ => Admission::Any,
        };
        let accepts_conditional = if self.peek() == Some(b'=') {
            self.pos += 1;
            true
        } else {
            false
        };

        let start = self.pos;
        let Some(close) = self.pattern[start..].find('%').map(|i| start + i) else {
            return Err(self.error(open, "unclosed expression slot"));
        };
        let body = &self.pattern[start..close];
        self.pos = close + 1;

        if body.trim().is_empty() {
            return Err(self.error(open, "empty expression slot"));
        }
        let mut types = Vec::new();
        for name in body.split('/') {
            let name = name.trim();
            match self.types.slot_type(name) {
                Some(ty) => types.push(ty),
                None => {
                    return Err(self.error(open, format!("unknown type \"{name}\"")));
                }
            }
        }
        Ok(PatternElement::Slot(SlotSpec {
            types,
            admission,
            accepts_conditional,
        }))
    }

    /// Parses an inline regex; the opening `/` is already consumed.
    fn regex(&mut self, open: usize) -> Result<PatternElement> {
        let start = self.pos;
        let Some(close) = self.pattern[start..].find('/').map(|i| start + i) else {
            return Err(self.error(open, "unclosed regular expression"));
        };
        let body = &self.pattern[start..close];
        self.pos = close + 1;

        match Regex::new(body) {
            Ok(re) => Ok(PatternElement::Regex(re)),
            Err(e) => Err(self.error(open, format!("invalid regular expression: {e}"))),
        }
    }
}
