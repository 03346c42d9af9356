//! Symbol source registry
//!
//! Merges the output of every registered [`SymbolProvider`] into one
//! [`SymbolSnapshot`]. Provider scans are expensive, so the merged result is
//! cached until [`SymbolRegistry::refresh`] is called. Readers that must not
//! block (ranking on a keystroke) use [`SymbolRegistry::snapshot`], which
//! returns whatever is cached, possibly nothing.
//!
//! # Merge order
//!
//! Providers are ordered by the configured category priority, then by
//! registration order. When two providers yield the same name the earlier one
//! wins. Buffer symbols are merged on top of a snapshot with
//! [`SymbolSnapshot::with_user_symbols`] and never replace an existing name.

use crate::config::EngineConfig;
use crate::providers::SymbolProvider;
use crate::types::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    position: usize,
    provider: Option<usize>,
}

/// Immutable merged view of all provider symbols
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolSnapshot {
    symbols: Arc<Vec<Symbol>>,
    index: Arc<HashMap<String, Entry>>,
}

impl SymbolSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot from symbols in priority order; the first occurrence of a name wins
    pub fn from_symbols(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        Self::from_sourced(symbols.into_iter().map(|symbol| (None, symbol)))
    }

    fn from_sourced(sourced: impl IntoIterator<Item = (Option<usize>, Symbol)>) -> Self {
        let mut symbols = Vec::new();
        let mut index = HashMap::new();

        for (provider, symbol) in sourced {
            if index.contains_key(&symbol.name) {
                continue;
            }
            index.insert(
                symbol.name.clone(),
                Entry {
                    position: symbols.len(),
                    provider,
                },
            );
            symbols.push(symbol);
        }

        Self {
            symbols: Arc::new(symbols),
            index: Arc::new(index),
        }
    }

    /// Merge buffer-derived symbols after everything else
    pub fn with_user_symbols(&self, user_symbols: impl IntoIterator<Item = Symbol>) -> Self {
        let existing = self.symbols.iter().map(|symbol| {
            let provider = self.index.get(&symbol.name).and_then(|e| e.provider);
            (provider, symbol.clone())
        });
        let user = user_symbols.into_iter().map(|symbol| (None, symbol));
        Self::from_sourced(existing.chain(user))
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Symbol> {
        self.symbols.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.index
            .get(name)
            .and_then(|entry| self.symbols.get(entry.position))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Position of a name in merge order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).map(|entry| entry.position)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Whether both values are clones of the same merge
    pub fn same_merge(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.symbols, &other.symbols) || (self.is_empty() && other.is_empty())
    }

    fn provider_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).and_then(|entry| entry.provider)
    }
}

impl<'a> IntoIterator for &'a SymbolSnapshot {
    type Item = &'a Symbol;
    type IntoIter = std::slice::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.iter()
    }
}

#[derive(Default)]
struct CacheState {
    snapshot: Option<SymbolSnapshot>,
    generation: u64,
}

/// Registry of symbol providers with a cached merged snapshot
pub struct SymbolRegistry {
    providers: Vec<Arc<dyn SymbolProvider>>,
    config: EngineConfig,
    cache: RwLock<CacheState>,
    /// Generation of the most recently requested scan
    requested: AtomicU64,
}

impl SymbolRegistry {
    /// Create an empty registry using the configured provider order
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            providers: Vec::new(),
            config: config.clone(),
            cache: RwLock::new(CacheState::default()),
            requested: AtomicU64::new(0),
        }
    }

    /// Create a registry with the given providers registered
    pub fn with_providers(
        providers: impl IntoIterator<Item = Arc<dyn SymbolProvider>>,
        config: &EngineConfig,
    ) -> Self {
        let mut registry = Self::new(config);
        for provider in providers {
            registry.register(provider);
        }
        registry
    }

    /// Register a provider; drops any cached snapshot
    pub fn register(&mut self, provider: Arc<dyn SymbolProvider>) {
        let priority = self.config.priority_of(provider.category());
        let at = self
            .providers
            .iter()
            .position(|p| self.config.priority_of(p.category()) > priority)
            .unwrap_or(self.providers.len());
        self.providers.insert(at, provider);
        self.invalidate();
    }

    /// Registered providers in merge order
    pub fn providers(&self) -> &[Arc<dyn SymbolProvider>] {
        &self.providers
    }

    /// Current cached snapshot, empty while the first scan is pending
    pub fn snapshot(&self) -> SymbolSnapshot {
        self.read_cache().snapshot.clone().unwrap_or_default()
    }

    /// Whether a scan has been published
    pub fn is_ready(&self) -> bool {
        self.read_cache().snapshot.is_some()
    }

    /// Cached snapshot, scanning synchronously on first access
    pub fn collect_symbols(&self) -> SymbolSnapshot {
        if let Some(snapshot) = self.read_cache().snapshot.clone() {
            return snapshot;
        }
        self.refresh()
    }

    /// Re-run all providers and replace the cache
    ///
    /// When a newer refresh superseded this one, the published snapshot is
    /// returned instead of the discarded scan.
    pub fn refresh(&self) -> SymbolSnapshot {
        let generation = self.next_generation();
        let snapshot = self.scan();
        if self.publish(generation, snapshot.clone()) {
            snapshot
        } else {
            self.snapshot()
        }
    }

    /// Refresh on the blocking pool
    ///
    /// Resolves to `true` when the scan was published, `false` when a newer
    /// refresh superseded it. Must be called from within a tokio runtime.
    pub fn spawn_refresh(self: &Arc<Self>) -> tokio::task::JoinHandle<bool> {
        let registry = Arc::clone(self);
        let generation = self.next_generation();
        tokio::task::spawn_blocking(move || {
            let snapshot = registry.scan();
            registry.publish(generation, snapshot)
        })
    }

    /// Drop the cached snapshot
    pub fn invalidate(&self) {
        let mut cache = self.write_cache();
        cache.snapshot = None;
    }

    /// Resolve the doc summary of a symbol, asking its provider if needed
    pub fn resolve_doc(&self, symbol: &Symbol) -> Option<String> {
        if let Some(doc) = &symbol.doc_summary {
            return Some(doc.clone());
        }
        let provider = self.snapshot().provider_of(&symbol.name)?;
        self.providers.get(provider)?.describe(&symbol.name)
    }

    fn next_generation(&self) -> u64 {
        self.requested.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn scan(&self) -> SymbolSnapshot {
        let mut sourced = Vec::new();

        for (i, provider) in self.providers.iter().enumerate() {
            match provider.collect() {
                Ok(symbols) => {
                    debug!("Provider {} yielded {} symbols", provider.name(), symbols.len());
                    sourced.extend(symbols.into_iter().map(|symbol| (Some(i), symbol)));
                }
                Err(e) => {
                    warn!("Provider {} failed, skipping: {}", provider.name(), e);
                }
            }
        }

        SymbolSnapshot::from_sourced(sourced)
    }

    fn publish(&self, generation: u64, snapshot: SymbolSnapshot) -> bool {
        let mut cache = self.write_cache();
        if generation < self.requested.load(Ordering::SeqCst) || generation < cache.generation {
            debug!("Discarding superseded symbol scan (generation {})", generation);
            return false;
        }

        info!("Symbol registry refreshed: {} symbols", snapshot.len());
        cache.snapshot = Some(snapshot);
        cache.generation = generation;
        true
    }

    fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, CacheState> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> std::sync::RwLockWriteGuard<'_, CacheState> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }
}
