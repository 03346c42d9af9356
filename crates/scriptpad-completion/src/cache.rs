/// JSON side-cache of reflected host symbols
///
/// Host reflection is slow, so the editor keeps the last scan on disk as a
/// flat list of `{name, kind}` records. A fresh session reads it back before
/// the live scan finishes. The file is rewritten wholesale on every save.
use crate::providers::{SourceCategory, SymbolProvider};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One cached symbol record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedSymbol {
    pub name: String,
    pub kind: SymbolKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_hint: Option<String>,
}

impl From<&Symbol> for CachedSymbol {
    fn from(symbol: &Symbol) -> Self {
        Self {
            name: symbol.name.clone(),
            kind: symbol.kind,
            signature_hint: symbol.signature_hint.clone(),
        }
    }
}

impl From<CachedSymbol> for Symbol {
    fn from(cached: CachedSymbol) -> Self {
        Symbol {
            name: cached.name,
            kind: cached.kind,
            signature_hint: cached.signature_hint,
            doc_summary: None,
        }
    }
}

/// Reader and writer for the side-cache file
pub struct SymbolCache;

impl SymbolCache {
    /// Load cached symbols; a missing file is an empty cache
    pub fn load(path: &Path) -> CompletionResult<Vec<Symbol>> {
        if !path.exists() {
            debug!("Symbol cache {} not found", path.display());
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(path)?;
        let records: Vec<CachedSymbol> = serde_json::from_str(&content)?;
        Ok(records.into_iter().map(Symbol::from).collect())
    }

    /// Replace the cache file with `symbols`
    pub fn save(path: &Path, symbols: &[Symbol]) -> CompletionResult<()> {
        let records: Vec<CachedSymbol> = symbols.iter().map(CachedSymbol::from).collect();
        let content = serde_json::to_string_pretty(&records)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Provider serving host symbols from the side-cache file
///
/// The file is re-read on every collection, so a registry refresh picks up a
/// newly written cache.
pub struct CachedSymbolProvider {
    path: PathBuf,
}

impl CachedSymbolProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SymbolProvider for CachedSymbolProvider {
    fn name(&self) -> &str {
        "host_api_cache"
    }

    fn category(&self) -> SourceCategory {
        SourceCategory::HostApi
    }

    fn collect(&self) -> CompletionResult<Vec<Symbol>> {
        SymbolCache::load(&self.path).map_err(|e| {
            warn!("Unreadable symbol cache {}: {}", self.path.display(), e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cache_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let symbols = SymbolCache::load(&dir.path().join("absent.json")).unwrap();
        assert!(symbols.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache").join("host_symbols.json");

        let symbols = vec![
            Symbol::new("createNode", SymbolKind::HostFunction)
                .with_signature("(node)")
                .with_doc("dropped on save"),
            Symbol::new("root", SymbolKind::HostObject),
        ];
        SymbolCache::save(&path, &symbols).unwrap();

        let loaded = SymbolCache::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "createNode");
        assert_eq!(loaded[0].signature_hint.as_deref(), Some("(node)"));
        assert!(loaded[0].doc_summary.is_none());
        assert_eq!(loaded[1].kind, SymbolKind::HostObject);
    }

    #[test]
    fn test_cache_file_is_flat_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host_symbols.json");
        SymbolCache::save(&path, &[Symbol::new("nuke", SymbolKind::Module)]).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!([{"name": "nuke", "kind": "module"}]));
    }

    #[test]
    fn test_provider_rereads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host_symbols.json");
        let provider = CachedSymbolProvider::new(&path);
        assert!(provider.collect().unwrap().is_empty());

        SymbolCache::save(&path, &[Symbol::new("selectedNode", SymbolKind::HostFunction)])
            .unwrap();
        let symbols = provider.collect().unwrap();
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].name, "selectedNode");
    }

    #[test]
    fn test_corrupt_cache_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host_symbols.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            CachedSymbolProvider::new(&path).collect(),
            Err(CompletionError::SerializationError(_))
        ));
    }
}
