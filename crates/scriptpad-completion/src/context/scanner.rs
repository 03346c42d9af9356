//! Buffer scanner
//!
//! Extracts user-defined names from the editor buffer. The buffer is parsed
//! with the tree-sitter Python grammar; when the parse fails or contains error
//! nodes (the usual state of a half-typed line) a regular-expression sweep is
//! used instead. The sweep is less precise but never fails.
//!
//! The scan runs on every keystroke. Buffers above the configured full-parse
//! limit skip tree-sitter and go straight to the sweep, which is linear in the
//! buffer length.

use crate::config::DEFAULT_FULL_PARSE_LIMIT;
use crate::providers::is_keyword;
use crate::types::*;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use tracing::debug;
use tree_sitter::{Node, Parser, Tree};

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]*\b").expect("invalid regex"));
static DEF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bdef\s+([A-Za-z_][A-Za-z0-9_]*)").expect("invalid regex"));
static CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bclass\s+([A-Za-z_][A-Za-z0-9_]*)").expect("invalid regex"));

/// Specificity of a user kind; the most specific kind seen for a name wins
fn specificity(kind: SymbolKind) -> u8 {
    match kind {
        SymbolKind::UserClass => 3,
        SymbolKind::UserFunction => 2,
        _ => 1,
    }
}

#[derive(Debug, Default)]
struct Collected {
    kinds: BTreeMap<String, SymbolKind>,
}

impl Collected {
    fn add(&mut self, name: &str, kind: SymbolKind) {
        if let Some(existing) = self.kinds.get_mut(name) {
            if specificity(kind) > specificity(*existing) {
                *existing = kind;
            }
            return;
        }
        if name.is_empty() || is_keyword(name) {
            return;
        }
        self.kinds.insert(name.to_string(), kind);
    }

    fn into_symbols(self) -> Vec<Symbol> {
        self.kinds
            .into_iter()
            .map(|(name, kind)| Symbol::new(name, kind))
            .collect()
    }
}

/// Scanner for user symbols in Python source
///
/// Holds one parser, reused across scans.
pub struct BufferScanner {
    parser: Mutex<Option<Parser>>,
    full_parse_limit: usize,
}

impl BufferScanner {
    pub fn new() -> Self {
        Self::with_parse_limit(DEFAULT_FULL_PARSE_LIMIT)
    }

    /// Scanner that parses buffers up to `limit` bytes; longer ones use the sweep
    pub fn with_parse_limit(limit: usize) -> Self {
        let mut parser = Parser::new();
        let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
        let parser = match parser.set_language(&language) {
            Ok(()) => Some(parser),
            Err(e) => {
                debug!("Python grammar unavailable, using regex scan only: {}", e);
                None
            }
        };
        Self {
            parser: Mutex::new(parser),
            full_parse_limit: limit,
        }
    }

    pub fn parse_limit(&self) -> usize {
        self.full_parse_limit
    }

    /// User symbols defined or referenced in `buffer`, sorted by name
    pub fn extract_user_symbols(&self, buffer: &str) -> Vec<Symbol> {
        if buffer.len() > self.full_parse_limit {
            return scan_with_regex(buffer);
        }

        match self.parse(buffer) {
            Some(tree) if !tree.root_node().has_error() => scan_tree(&tree, buffer),
            Some(_) => {
                debug!("Buffer has syntax errors, falling back to regex scan");
                scan_with_regex(buffer)
            }
            None => {
                debug!("Buffer could not be parsed, falling back to regex scan");
                scan_with_regex(buffer)
            }
        }
    }

    fn parse(&self, buffer: &str) -> Option<Tree> {
        let mut parser = self.parser.lock().unwrap_or_else(PoisonError::into_inner);
        parser.as_mut()?.parse(buffer, None)
    }
}

impl Default for BufferScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BufferScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferScanner")
            .field("full_parse_limit", &self.full_parse_limit)
            .finish_non_exhaustive()
    }
}

/// Collect user symbols from a syntax tree
pub fn scan_tree(tree: &Tree, source: &str) -> Vec<Symbol> {
    let mut collected = Collected::default();
    traverse(tree.root_node(), source, &mut collected);
    collected.into_symbols()
}

fn traverse(node: Node<'_>, source: &str, collected: &mut Collected) {
    match node.kind() {
        "function_definition" => add_name(node, source, SymbolKind::UserFunction, collected),
        "class_definition" => add_name(node, source, SymbolKind::UserClass, collected),
        "identifier" => {
            if let Ok(text) = node.utf8_text(source.as_bytes()) {
                collected.add(text, SymbolKind::UserVariable);
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        traverse(child, source, collected);
    }
}

fn add_name(node: Node<'_>, source: &str, kind: SymbolKind, collected: &mut Collected) {
    if let Some(name) = node
        .child_by_field_name("name")
        .and_then(|n| n.utf8_text(source.as_bytes()).ok())
    {
        collected.add(name, kind);
    }
}

/// Collect user symbols with regular expressions only
///
/// Works on any text, including buffers that do not parse.
pub fn scan_with_regex(source: &str) -> Vec<Symbol> {
    let mut collected = Collected::default();

    for m in IDENTIFIER_RE.find_iter(source) {
        collected.add(m.as_str(), SymbolKind::UserVariable);
    }
    for caps in DEF_RE.captures_iter(source) {
        if let Some(name) = caps.get(1) {
            collected.add(name.as_str(), SymbolKind::UserFunction);
        }
    }
    for caps in CLASS_RE.captures_iter(source) {
        if let Some(name) = caps.get(1) {
            collected.add(name.as_str(), SymbolKind::UserClass);
        }
    }

    collected.into_symbols()
}
