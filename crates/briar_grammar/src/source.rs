//! The raw structure of a script: indented sections and lines.
//!
//! Nothing here knows about grammar. A script parses into a tree of
//! sections and lines first; resolution walks that tree afterwards, so
//! structural problems and grammar problems stay separate.

/// A plain line of script text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineNode {
    /// The line's text, comments stripped and trimmed.
    pub text: String,
    /// One-based line number in the source.
    pub line: usize,
}

/// An indented section introduced by a `header:` line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionNode {
    /// The header text, without the trailing colon.
    pub header: String,
    /// One-based line number of the header.
    pub line: usize,
    /// The section's body, in source order.
    pub children: Vec<Node>,
}

/// One node of the structural tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// An indented section.
    Section(SectionNode),
    /// A plain line.
    Line(LineNode),
}

impl Node {
    /// The one-based source line of this node.
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::Section(section) => section.line,
            Self::Line(line) => line.line,
        }
    }
}

struct RawLine<'a> {
    indent: usize,
    content: &'a str,
    line: usize,
}

/// Parses script text into a structural tree.
///
/// A line ending in `:` opens a section holding every following line with
/// deeper indentation. Blank lines vanish; `#` starts a comment unless it
/// sits inside a double-quoted string. Tabs count as four columns.
#[must_use]
pub fn parse_source(text: &str) -> Vec<Node> {
    let mut lines = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let stripped = strip_comment(raw);
        if stripped.trim().is_empty() {
            continue;
        }
        lines.push(RawLine {
            indent: indent_width(raw),
            content: stripped.trim(),
            line: i + 1,
        });
    }
    let mut pos = 0;
    parse_block(&lines, &mut pos, 0)
}

fn parse_block(lines: &[RawLine<'_>], pos: &mut usize, indent: usize) -> Vec<Node> {
    let mut nodes = Vec::new();
    while let Some(raw) = lines.get(*pos) {
        if raw.indent < indent {
            break;
        }
        *pos += 1;
        if let Some(header) = raw.content.strip_suffix(':') {
            let children = parse_block(lines, pos, raw.indent + 1);
            nodes.push(Node::Section(SectionNode {
                header: header.trim().to_string(),
                line: raw.line,
                children,
            }));
        } else {
            nodes.push(Node::Line(LineNode {
                text: raw.content.to_string(),
                line: raw.line,
            }));
        }
    }
    nodes
}

fn indent_width(raw: &str) -> usize {
    let mut width = 0;
    for c in raw.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += 4,
            _ => break,
        }
    }
    width
}

/// Cuts the line at the first `#` outside a double-quoted string.
fn strip_comment(raw: &str) -> &str {
    let mut in_string = false;
    for (i, b) in raw.bytes().enumerate() {
        match b {
            b'"' => in_string = !in_string,
            b'#' if !in_string => return &raw[..i],
            _ => {}
        }
    }
    raw
}

/// Splits a `key: value` entry at the first colon outside a string.
#[must_use]
pub fn split_entry(text: &str) -> Option<(&str, &str)> {
    let mut in_string = false;
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'"' => in_string = !in_string,
            b':' if !in_string => {
                return Some((text[..i].trim(), text[i + 1..].trim()));
            }
            _ => {}
        }
    }
    None
}
