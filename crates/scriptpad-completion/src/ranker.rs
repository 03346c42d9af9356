use std::cmp::Ordering;
use std::collections::HashSet;

/// Candidate ranking and filtering
use crate::config::{EngineConfig, DEFAULT_FUZZY_CUTOFF, DEFAULT_FUZZY_LIMIT};
use crate::history::UsageSnapshot;
use crate::registry::SymbolSnapshot;
use crate::types::*;
use similar::TextDiff;

/// Ranks symbols against a typed prefix
pub trait CompletionRanker: Send + Sync {
    /// Ordered candidates for `prefix`; an empty prefix yields nothing
    fn rank(&self, prefix: &str, symbols: &SymbolSnapshot, usage: &UsageSnapshot) -> Vec<Symbol>;
}

/// Closeness ratio `2*M/T` of two names, ignoring case
pub fn closeness(a: &str, b: &str) -> f32 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    TextDiff::from_chars(a.as_str(), b.as_str()).ratio()
}

/// Prefix ranker with optional fuzzy matching and usage weighting
#[derive(Debug, Clone)]
pub struct DefaultCompletionRanker {
    fuzzy_enabled: bool,
    fuzzy_cutoff: f32,
    fuzzy_limit: usize,
}

impl DefaultCompletionRanker {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            fuzzy_enabled: config.fuzzy_enabled,
            fuzzy_cutoff: config.fuzzy_cutoff,
            fuzzy_limit: config.fuzzy_limit,
        }
    }

    pub fn with_fuzzy(mut self, enabled: bool) -> Self {
        self.fuzzy_enabled = enabled;
        self
    }

    /// Symbols whose name starts with `prefix`, ignoring case
    fn prefix_matches<'a>(&self, prefix: &str, symbols: &'a SymbolSnapshot) -> Vec<&'a Symbol> {
        let lowered = prefix.to_lowercase();
        symbols
            .iter()
            .filter(|symbol| symbol.name != prefix)
            .filter(|symbol| symbol.name.to_lowercase().starts_with(&lowered))
            .collect()
    }

    /// The closest near-miss names not already matched by prefix
    fn fuzzy_matches<'a>(
        &self,
        prefix: &str,
        symbols: &'a SymbolSnapshot,
        exclude: &HashSet<&str>,
    ) -> Vec<&'a Symbol> {
        let mut scored: Vec<(f32, &Symbol)> = symbols
            .iter()
            .filter(|symbol| symbol.name != prefix && !exclude.contains(symbol.name.as_str()))
            .map(|symbol| (closeness(prefix, &symbol.name), symbol))
            .filter(|(score, _)| *score >= self.fuzzy_cutoff)
            .collect();

        // Stable sort keeps snapshot order among equal scores
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored.truncate(self.fuzzy_limit);
        scored.into_iter().map(|(_, symbol)| symbol).collect()
    }

    fn compare(a: &Symbol, b: &Symbol, usage: &UsageSnapshot) -> Ordering {
        let by_recency = match (usage.recency_rank(&a.name), usage.recency_rank(&b.name)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };

        by_recency
            .then_with(|| usage.usage_count(&b.name).cmp(&usage.usage_count(&a.name)))
            .then_with(|| a.name.cmp(&b.name))
    }
}

impl Default for DefaultCompletionRanker {
    fn default() -> Self {
        Self {
            fuzzy_enabled: false,
            fuzzy_cutoff: DEFAULT_FUZZY_CUTOFF,
            fuzzy_limit: DEFAULT_FUZZY_LIMIT,
        }
    }
}

impl CompletionRanker for DefaultCompletionRanker {
    fn rank(&self, prefix: &str, symbols: &SymbolSnapshot, usage: &UsageSnapshot) -> Vec<Symbol> {
        if prefix.is_empty() {
            return Vec::new();
        }

        let mut matched = self.prefix_matches(prefix, symbols);
        if self.fuzzy_enabled {
            let seen: HashSet<&str> = matched.iter().map(|s| s.name.as_str()).collect();
            let fuzzy = self.fuzzy_matches(prefix, symbols, &seen);
            matched.extend(fuzzy);
        }

        // Snapshots are already unique by name; buffer merges may not be
        let mut unique = HashSet::new();
        let mut ranked: Vec<Symbol> = matched
            .into_iter()
            .filter(|symbol| unique.insert(symbol.name.as_str()))
            .cloned()
            .collect();

        ranked.sort_by(|a, b| Self::compare(a, b, usage));
        ranked
    }
}
