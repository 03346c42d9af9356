/// Core types for the suggestion engine
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type for completion operations
pub type CompletionResult<T> = Result<T, CompletionError>;

/// Errors raised by the suggestion engine
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Invalid cursor offset {offset} for buffer of length {len}")]
    InvalidOffset { offset: usize, len: usize },

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Classification of a completion candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    HostFunction,
    HostObject,
    BuiltinFunction,
    BuiltinObject,
    Keyword,
    Module,
    DunderMethod,
    Decorator,
    Exception,
    UserVariable,
    UserFunction,
    UserClass,
    Unknown,
}

impl SymbolKind {
    /// Short tag shown next to a candidate in the popup
    pub fn label(&self) -> &'static str {
        match self {
            SymbolKind::HostFunction => "host fn",
            SymbolKind::HostObject => "host",
            SymbolKind::BuiltinFunction => "builtin fn",
            SymbolKind::BuiltinObject => "builtin",
            SymbolKind::Keyword => "keyword",
            SymbolKind::Module => "module",
            SymbolKind::DunderMethod => "dunder",
            SymbolKind::Decorator => "decorator",
            SymbolKind::Exception => "exception",
            SymbolKind::UserVariable => "variable",
            SymbolKind::UserFunction => "function",
            SymbolKind::UserClass => "class",
            SymbolKind::Unknown => "?",
        }
    }

    /// Whether the kind comes from scanning the user's buffer
    pub fn is_user(&self) -> bool {
        matches!(
            self,
            SymbolKind::UserVariable | SymbolKind::UserFunction | SymbolKind::UserClass
        )
    }

    /// Whether a candidate of this kind can be called
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            SymbolKind::HostFunction
                | SymbolKind::BuiltinFunction
                | SymbolKind::DunderMethod
                | SymbolKind::UserFunction
                | SymbolKind::UserClass
        )
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single completion candidate
///
/// Symbols are created fresh on every scan and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Rendered parameter list for callables, default-value template for literals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_summary: Option<String>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
            signature_hint: None,
            doc_summary: None,
        }
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature_hint = Some(signature.into());
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc_summary = Some(doc.into());
        self
    }
}

/// Half-open byte range `[start, end)` in a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A completion request: buffer text plus a byte offset into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub buffer: String,
    pub cursor: usize,
}

impl CompletionRequest {
    pub fn new(buffer: impl Into<String>, cursor: usize) -> Self {
        Self {
            buffer: buffer.into(),
            cursor,
        }
    }

    /// Request with the cursor at the end of the buffer
    pub fn at_end(buffer: impl Into<String>) -> Self {
        let buffer = buffer.into();
        let cursor = buffer.len();
        Self { buffer, cursor }
    }
}

/// Ranked candidates for one request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionList {
    /// The typed prefix the candidates were matched against
    pub prefix: String,
    /// Span replaced when a candidate is accepted
    pub replace_range: TextRange,
    pub items: Vec<Symbol>,
}

impl CompletionList {
    pub fn empty(at: usize) -> Self {
        Self {
            prefix: String::new(),
            replace_range: TextRange::empty(at),
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.items.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Outcome of applying a completion to a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedCompletion {
    pub text: String,
    pub cursor: usize,
    /// The span of the original buffer that was replaced
    pub replaced: TextRange,
}

/// Inline ghost text anchored at the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhostText {
    /// The unseen remainder rendered after the cursor
    pub suffix: String,
    /// Cursor offset the suffix is anchored at
    pub anchor: usize,
    /// Full name of the candidate the suffix came from
    pub candidate: String,
}

impl GhostText {
    pub fn new(suffix: impl Into<String>, anchor: usize, candidate: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            anchor,
            candidate: candidate.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_builder() {
        let symbol = Symbol::new("createNode", SymbolKind::HostFunction)
            .with_signature("(node, knobs='', inpanel=True)")
            .with_doc("Creates a node");
        assert_eq!(symbol.name, "createNode");
        assert_eq!(symbol.signature_hint.as_deref(), Some("(node, knobs='', inpanel=True)"));
        assert_eq!(symbol.doc_summary.as_deref(), Some("Creates a node"));
    }

    #[test]
    fn test_symbol_kind_user() {
        assert!(SymbolKind::UserClass.is_user());
        assert!(!SymbolKind::HostObject.is_user());
        assert_eq!(SymbolKind::Keyword.to_string(), "keyword");
    }

    #[test]
    fn test_symbol_serde_omits_empty_hints() {
        let json = serde_json::to_string(&Symbol::new("nuke", SymbolKind::Module)).unwrap();
        assert_eq!(json, r#"{"name":"nuke","kind":"module"}"#);
    }

    #[test]
    fn test_request_at_end() {
        let request = CompletionRequest::at_end("nu");
        assert_eq!(request.cursor, 2);
    }
}
