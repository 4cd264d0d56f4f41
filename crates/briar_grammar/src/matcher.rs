//! Matches input lines against compiled patterns.
//!
//! Literal text matches case-insensitively with flexible whitespace, so a
//! skipped optional group never strands a double space in the input. Slots
//! cannot see how much text they should consume; the matcher bounds them by
//! looking ahead at what may follow and scanning the input for it, trying
//! the shortest candidate first. Failure anywhere is an `Option::None`, and
//! optional and choice groups roll the match state back before retrying.

use crate::ast::{AstNode, ParseCapture};
use crate::pattern::{self, PatternElement, PossibleInput, SlotSpec};
use crate::resolver::Resolver;

#[derive(Default)]
struct MatchState {
    inputs: Vec<AstNode>,
    captures: Vec<String>,
    parse_mark: i32,
}

impl MatchState {
    fn snapshot(&self) -> (usize, usize, i32) {
        (self.inputs.len(), self.captures.len(), self.parse_mark)
    }

    fn restore(&mut self, (inputs, captures, parse_mark): (usize, usize, i32)) {
        self.inputs.truncate(inputs);
        self.captures.truncate(captures);
        self.parse_mark = parse_mark;
    }
}

/// Matches one line of text against one compiled pattern alternative.
///
/// On success returns the resolved slot inputs in pattern order together
/// with the capture record. The whole line must be consumed; trailing
/// whitespace is ignored.
#[must_use]
pub fn match_line(
    resolver: &Resolver<'_>,
    pattern: &PatternElement,
    text: &str,
    alternative: usize,
) -> Option<(Vec<AstNode>, ParseCapture)> {
    let mut state = MatchState::default();
    let end = match_sequence(resolver, pattern.flatten(), &[], text, 0, &mut state)?;
    if !text[end..].trim().is_empty() {
        return None;
    }
    Some((
        state.inputs,
        ParseCapture {
            alternative,
            parse_mark: state.parse_mark,
            captures: state.captures,
        },
    ))
}

/// Matches a run of sequential elements. `follow` stacks the unmatched
/// remainders of every enclosing sequence, innermost first; slots look
/// through it when their own remainder is all-optional.
fn match_sequence(
    resolver: &Resolver<'_>,
    parts: &[PatternElement],
    follow: &[&[PatternElement]],
    text: &str,
    mut pos: usize,
    state: &mut MatchState,
) -> Option<usize> {
    for (i, element) in parts.iter().enumerate() {
        let rest = &parts[i + 1..];
        pos = match_element(resolver, element, rest, follow, text, pos, state)?;
    }
    Some(pos)
}

fn match_element(
    resolver: &Resolver<'_>,
    element: &PatternElement,
    rest: &[PatternElement],
    follow: &[&[PatternElement]],
    text: &str,
    pos: usize,
    state: &mut MatchState,
) -> Option<usize> {
    match element {
        PatternElement::Text(literal) => match_text(literal, text, pos),
        PatternElement::Regex(re) => {
            let m = re.find_at(text, pos)?;
            if m.start() != pos {
                return None;
            }
            state.captures.push(m.as_str().to_string());
            Some(m.end())
        }
        PatternElement::Sequence(parts) => {
            let follow = push_follow(rest, follow);
            match_sequence(resolver, parts, &follow, text, pos, state)
        }
        PatternElement::Optional(inner) => {
            let snapshot = state.snapshot();
            let follow = push_follow(rest, follow);
            match match_sequence(resolver, inner.flatten(), &follow, text, pos, state) {
                Some(end) => Some(end),
                None => {
                    state.restore(snapshot);
                    Some(pos)
                }
            }
        }
        PatternElement::Choice(branches) => {
            let follow = push_follow(rest, follow);
            for branch in branches {
                let snapshot = state.snapshot();
                if let Some(end) =
                    match_sequence(resolver, branch.element.flatten(), &follow, text, pos, state)
                {
                    state.parse_mark ^= branch.mark;
                    return Some(end);
                }
                state.restore(snapshot);
            }
            None
        }
        PatternElement::Slot(spec) => match_slot(resolver, spec, rest, follow, text, pos, state),
    }
}

fn push_follow<'a>(
    rest: &'a [PatternElement],
    follow: &[&'a [PatternElement]],
) -> Vec<&'a [PatternElement]> {
    let mut stacked = Vec::with_capacity(follow.len() + 1);
    stacked.push(rest);
    stacked.extend_from_slice(follow);
    stacked
}

/// Matches literal text with flexible whitespace.
///
/// A run of spaces in the literal matches one or more whitespace characters
/// in the input, or nothing at all when the position already sits on a word
/// boundary. Everything else compares case-insensitively.
fn match_text(literal: &str, text: &str, mut pos: usize) -> Option<usize> {
    let mut chars = literal.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ' ' {
            while chars.peek() == Some(&' ') {
                chars.next();
            }
            let start = pos;
            while let Some(ch) = text[pos..].chars().next() {
                if !ch.is_whitespace() {
                    break;
                }
                pos += ch.len_utf8();
            }
            if pos == start {
                let at_boundary = pos == 0
                    || pos >= text.len()
                    || text[..pos].chars().next_back().is_some_and(char::is_whitespace);
                if !at_boundary {
                    return None;
                }
            }
        } else {
            let ch = text[pos..].chars().next()?;
            if !ch.eq_ignore_ascii_case(&c) {
                return None;
            }
            pos += ch.len_utf8();
        }
    }
    Some(pos)
}

/// Matches a slot by scanning the input for whatever may follow it.
fn match_slot(
    resolver: &Resolver<'_>,
    spec: &SlotSpec,
    rest: &[PatternElement],
    follow: &[&[PatternElement]],
    text: &str,
    pos: usize,
    state: &mut MatchState,
) -> Option<usize> {
    if pos >= text.len() {
        return None;
    }
    for input in gather_inputs(rest, follow) {
        match input {
            PossibleInput::EndOfLine => {
                // A slot covering the whole line would resolve itself
                // forever; leave that to the resolver's own candidates.
                if pos == 0 {
                    return None;
                }
                let candidate = text[pos..].trim();
                if candidate.is_empty() {
                    return None;
                }
                let node = resolver.resolve_slot(candidate, spec)?;
                state.inputs.push(node);
                return Some(text.len());
            }
            PossibleInput::Text(delimiter) => {
                let needle = delimiter.trim();
                if needle.is_empty() {
                    continue;
                }
                let mut from = pos;
                while let Some(at) = find_protected(text, from, needle) {
                    let candidate = text[pos..at].trim();
                    if !candidate.is_empty() {
                        if let Some(node) = resolver.resolve_slot(candidate, spec) {
                            state.inputs.push(node);
                            return Some(at);
                        }
                    }
                    match text[at..].chars().next() {
                        Some(c) => from = at + c.len_utf8(),
                        None => break,
                    }
                }
            }
            PossibleInput::Regex(re) => {
                let mut from = pos;
                while let Some(m) = re.find_at(text, from) {
                    if protected_depth(text, pos, m.start()) == 0 {
                        let candidate = text[pos..m.start()].trim();
                        if !candidate.is_empty() {
                            if let Some(node) = resolver.resolve_slot(candidate, spec) {
                                state.inputs.push(node);
                                return Some(m.start());
                            }
                        }
                    }
                    match text[m.start()..].chars().next() {
                        Some(c) => from = m.start() + c.len_utf8(),
                        None => break,
                    }
                }
            }
            // Two adjacent slots have no separator to scan for; the
            // pattern is ambiguous and never matches this way.
            PossibleInput::Slot(_) => {}
        }
    }
    None
}

/// Every input that may follow a slot, looking through the enclosing
/// sequences when the local remainder is entirely optional.
fn gather_inputs<'a>(
    rest: &'a [PatternElement],
    follow: &[&'a [PatternElement]],
) -> Vec<PossibleInput<'a>> {
    let mut inputs = Vec::new();
    if pattern::fill_inputs(rest, &mut inputs) {
        return inputs;
    }
    for outer in follow {
        if pattern::fill_inputs(outer, &mut inputs) {
            return inputs;
        }
    }
    inputs.push(PossibleInput::EndOfLine);
    inputs
}

/// Finds the next occurrence of `needle` at or after `from`, ASCII
/// case-insensitively, skipping text inside parentheses, braces, and
/// double-quoted strings.
fn find_protected(text: &str, from: usize, needle: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let pat = needle.as_bytes();
    let mut depth = protected_depth(text, 0, from);
    let mut in_string = text[..from].bytes().filter(|&b| b == b'"').count() % 2 == 1;
    let mut i = from;
    while i + pat.len() <= bytes.len() {
        match bytes[i] {
            b'"' => in_string = !in_string,
            b'(' | b'{' if !in_string => depth += 1,
            b')' | b'}' if !in_string => depth -= 1,
            _ => {}
        }
        if depth == 0
            && !in_string
            && text.is_char_boundary(i)
            && bytes[i..i + pat.len()].eq_ignore_ascii_case(pat)
        {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Nesting depth of parentheses and braces over `text[from..to]`, ignoring
/// anything inside double-quoted strings.
fn protected_depth(text: &str, from: usize, to: usize) -> i32 {
    let mut depth = 0;
    let mut in_string = false;
    for b in text[from..to].bytes() {
        match b {
            b'"' => in_string = !in_string,
            b'(' | b'{' if !in_string => depth += 1,
            b')' | b'}' if !in_string => depth -= 1,
            _ => {}
        }
    }
    depth
}
