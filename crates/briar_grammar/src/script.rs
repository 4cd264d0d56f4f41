//! Script parsing and loading: the two phases, end to end.
//!
//! The parse phase walks a script's structural tree, resolves every line
//! into parse-phase AST nodes, and collects symbols along the way. Nothing
//! runnable exists yet; a script that fails some lines still yields its
//! other triggers, with one diagnostic per failed line. The load phase then
//! instantiates runtime elements for a parsed script as a whole, and a
//! reload is a wholesale replacement of the previous result.

use std::collections::HashMap;

use briar_foundation::{Error, ErrorContext};

use crate::ast::AstNode;
use crate::diagnostics::Diagnostic;
use crate::loader::Loader;
use crate::resolver::Resolver;
use crate::runtime::RuntimeExpr;
use crate::source::{self, Node, SectionNode};
use crate::syntax::Registry;

/// A function signature collected during the symbol pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionSignature {
    /// The function's name.
    pub name: String,
    /// Parameter names, in declaration order.
    pub parameters: Vec<String>,
    /// One-based line of the declaration.
    pub line: usize,
}

/// Symbols a script declares: options, functions, and trigger headers.
#[derive(Debug, Default)]
pub struct SymbolTable {
    /// Option substitutions, applied as `{@name}`.
    pub options: HashMap<String, String>,
    /// Declared function signatures.
    pub functions: Vec<FunctionSignature>,
}

impl SymbolTable {
    /// Substitutes `{@name}` references with their option values.
    /// Unknown references stay as written.
    #[must_use]
    pub fn replace_options(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find("{@") {
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                break;
            };
            let name = &after[..end];
            match self.options.get(name) {
                Some(value) => {
                    out.push_str(&rest[..start]);
                    out.push_str(value);
                }
                None => out.push_str(&rest[..start + 2 + end + 1]),
            }
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        out
    }
}

/// One resolved statement of a trigger body.
#[derive(Debug)]
pub enum Statement {
    /// A plain line.
    Simple {
        /// The resolved node.
        node: AstNode,
        /// One-based source line.
        line: usize,
    },
    /// A nested scope with its body.
    Scope {
        /// The resolved scope header.
        scope: AstNode,
        /// One-based source line of the header.
        line: usize,
        /// The scope's body.
        body: ScopeBody,
    },
}

/// A scope's body: resolved statements, or raw lines for verbatim scopes.
#[derive(Debug)]
pub enum ScopeBody {
    /// Resolved statements, in source order.
    Parsed(Vec<Statement>),
    /// Raw body text, kept for the element to interpret itself.
    Raw(Vec<source::LineNode>),
}

/// A resolved trigger: an event header and its body.
#[derive(Debug)]
pub struct Trigger {
    /// The resolved event header.
    pub event: AstNode,
    /// One-based source line of the header.
    pub line: usize,
    /// The trigger's body.
    pub statements: Vec<Statement>,
}

/// The result of the parse phase.
#[derive(Debug)]
pub struct ParsedScript {
    /// The script's name, used in load error context.
    pub name: String,
    /// Collected symbols.
    pub symbols: SymbolTable,
    /// Resolved triggers, in source order.
    pub triggers: Vec<Trigger>,
}

/// Parses whole scripts against a registry.
pub struct ScriptParser<'a> {
    resolver: Resolver<'a>,
}

impl<'a> ScriptParser<'a> {
    /// Creates a parser over the given registry.
    #[must_use]
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            resolver: Resolver::new(registry),
        }
    }

    /// Parses a script. Failed lines each leave one diagnostic and are
    /// skipped; everything else still resolves.
    pub fn parse(&self, name: &str, text: &str) -> ParsedScript {
        let nodes = source::parse_source(text);
        let symbols = self.collect_symbols(&nodes);

        let mut triggers = Vec::new();
        for node in &nodes {
            let Node::Section(section) = node else {
                self.resolver.set_line(Some(node.line()));
                if let Node::Line(line) = node {
                    self.resolver.report(format!(
                        "expected an event or section header, got '{}'",
                        line.text
                    ));
                }
                continue;
            };
            if section.header.eq_ignore_ascii_case("options")
                || is_function_header(&section.header)
            {
                continue;
            }
            let header = symbols.replace_options(&section.header);
            self.resolver.set_line(Some(section.line));
            let Some(event) = self.resolver.resolve_event(&header) else {
                continue;
            };
            let statements = self.parse_body(&section.children, &symbols);
            triggers.push(Trigger {
                event,
                line: section.line,
                statements,
            });
        }
        ParsedScript {
            name: name.to_string(),
            symbols,
            triggers,
        }
    }

    /// Takes every diagnostic collected so far.
    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        self.resolver.take_diagnostics()
    }

    fn collect_symbols(&self, nodes: &[Node]) -> SymbolTable {
        let mut symbols = SymbolTable::default();
        for node in nodes {
            let Node::Section(section) = node else {
                continue;
            };
            if section.header.eq_ignore_ascii_case("options") {
                for child in &section.children {
                    if let Node::Line(line) = child {
                        if let Some((key, value)) = source::split_entry(&line.text) {
                            symbols.options.insert(key.to_string(), value.to_string());
                        }
                    }
                }
            } else if let Some(signature) = parse_function_header(&section.header, section.line) {
                symbols.functions.push(signature);
            }
        }
        symbols
    }

    fn parse_body(&self, nodes: &[Node], symbols: &SymbolTable) -> Vec<Statement> {
        let mut statements = Vec::new();
        for node in nodes {
            self.resolver.set_line(Some(node.line()));
            match node {
                Node::Line(line) => {
                    let text = symbols.replace_options(&line.text);
                    if let Some(resolved) = self.resolver.resolve_statement(&text) {
                        statements.push(Statement::Simple {
                            node: resolved,
                            line: line.line,
                        });
                    }
                }
                Node::Section(section) => {
                    let header = symbols.replace_options(&section.header);
                    let Some(scope) = self.resolver.resolve_scope(&header) else {
                        continue;
                    };
                    let body = if self.is_verbatim(&scope) {
                        ScopeBody::Raw(raw_lines(section))
                    } else {
                        ScopeBody::Parsed(self.parse_body(&section.children, symbols))
                    };
                    statements.push(Statement::Scope {
                        scope,
                        line: section.line,
                        body,
                    });
                }
            }
        }
        statements
    }

    fn is_verbatim(&self, scope: &AstNode) -> bool {
        match scope {
            AstNode::Expression(expr) => self.resolver.registry().get(expr.syntax).verbatim,
            _ => false,
        }
    }
}

fn raw_lines(section: &SectionNode) -> Vec<source::LineNode> {
    let mut lines = Vec::new();
    collect_raw(&section.children, &mut lines);
    lines
}

fn collect_raw(nodes: &[Node], lines: &mut Vec<source::LineNode>) {
    for node in nodes {
        match node {
            Node::Line(line) => lines.push(line.clone()),
            Node::Section(section) => {
                lines.push(source::LineNode {
                    text: format!("{}:", section.header),
                    line: section.line,
                });
                collect_raw(&section.children, lines);
            }
        }
    }
}

fn is_function_header(header: &str) -> bool {
    header.len() > 9
        && header
            .get(..9)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("function "))
}

fn parse_function_header(header: &str, line: usize) -> Option<FunctionSignature> {
    if !is_function_header(header) {
        return None;
    }
    let rest = header[9..].trim();
    let open = rest.find('(')?;
    let close = rest.rfind(')')?;
    if close < open {
        return None;
    }
    let name = rest[..open].trim();
    if name.is_empty() {
        return None;
    }
    let params = rest[open + 1..close].trim();
    let parameters = if params.is_empty() {
        Vec::new()
    } else {
        params.split(',').map(|p| p.trim().to_string()).collect()
    };
    Some(FunctionSignature {
        name: name.to_string(),
        parameters,
        line,
    })
}

/// A loaded, runnable script.
#[derive(Debug)]
pub struct LoadedScript {
    /// The script's name.
    pub name: String,
    /// The loaded triggers, in source order.
    pub triggers: Vec<LoadedTrigger>,
}

/// A loaded trigger.
#[derive(Debug)]
pub struct LoadedTrigger {
    /// The loaded event element.
    pub event: RuntimeExpr,
    /// The loaded body.
    pub statements: Vec<LoadedStatement>,
}

/// A loaded statement.
#[derive(Debug)]
pub enum LoadedStatement {
    /// A plain statement.
    Simple(RuntimeExpr),
    /// A scope and its loaded body. Verbatim scopes load with an empty
    /// body; their element received the raw lines at parse time and owns
    /// their meaning.
    Scope {
        /// The loaded scope element.
        scope: RuntimeExpr,
        /// The loaded body statements.
        body: Vec<LoadedStatement>,
    },
}

/// Loads a parsed script, instantiating every runtime element.
///
/// # Errors
/// Collects every load failure, each carrying the script name and line.
/// A reload of a previously loaded script is simply a fresh call; the new
/// result replaces the old wholesale.
pub fn load_script(registry: &Registry, parsed: &ParsedScript) -> Result<LoadedScript, Vec<Error>> {
    let loader = Loader::new(registry);
    let mut errors = Vec::new();
    let mut triggers = Vec::new();
    for trigger in &parsed.triggers {
        let event = match loader.load(&trigger.event) {
            Ok(event) => event,
            Err(e) => {
                errors.push(locate(e, &parsed.name, trigger.line));
                continue;
            }
        };
        let statements = load_body(&loader, &trigger.statements, &parsed.name, &mut errors);
        triggers.push(LoadedTrigger { event, statements });
    }
    if errors.is_empty() {
        Ok(LoadedScript {
            name: parsed.name.clone(),
            triggers,
        })
    } else {
        Err(errors)
    }
}

fn load_body(
    loader: &Loader<'_>,
    statements: &[Statement],
    name: &str,
    errors: &mut Vec<Error>,
) -> Vec<LoadedStatement> {
    let mut loaded = Vec::new();
    for statement in statements {
        match statement {
            Statement::Simple { node, line } => match loader.load(node) {
                Ok(expr) => loaded.push(LoadedStatement::Simple(expr)),
                Err(e) => errors.push(locate(e, name, *line)),
            },
            Statement::Scope { scope, line, body } => {
                let scope = match loader.load(scope) {
                    Ok(expr) => expr,
                    Err(e) => {
                        errors.push(locate(e, name, *line));
                        continue;
                    }
                };
                let body = match body {
                    ScopeBody::Parsed(statements) => {
                        load_body(loader, statements, name, errors)
                    }
                    ScopeBody::Raw(_) => Vec::new(),
                };
                loaded.push(LoadedStatement::Scope { scope, body });
            }
        }
    }
    loaded
}

fn locate(error: Error, name: &str, line: usize) -> Error {
    error.with_context(ErrorContext::new().with_source(name).with_line(line))
}
