/// Suggestion engine facade
///
/// Wires the registry, buffer scanner, ranker, applier and ghost-text
/// predictor behind one object the editor drives on every keystroke.
///
/// # Pipeline
///
/// 1. **Scan**: extract user symbols from the buffer, ignoring the word
///    under the cursor
/// 2. **Merge**: layer them under the registry snapshot
/// 3. **Rank**: order the candidates for the word left of the cursor
///
/// The merged candidates of the last buffer are memoised, so the completion
/// and ghost-text requests of one keystroke share a single scan.
///
/// Accepting a candidate goes through [`SuggestionEngine::apply`], which also
/// feeds the usage history used by later rankings.
///
/// # Example
///
/// ```ignore
/// use scriptpad_completion::*;
/// use std::sync::Arc;
///
/// let engine = SuggestionEngine::python(EngineConfig::default(), Arc::new(NullHost));
/// engine.warm_up();
///
/// let list = engine.complete(&CompletionRequest::at_end("import o"));
/// let applied = engine.apply("import o", 8, &list.items[0])?;
/// ```
use crate::apply::CompletionApplier;
use crate::config::EngineConfig;
use crate::context::scanner::BufferScanner;
use crate::context::utils::{current_word, word_range};
use crate::ghost_text::GhostTextPredictor;
use crate::history::{UsageHistory, UsageSnapshot};
use crate::host::{HostApiProvider, HostIntrospector};
use crate::providers::{python_providers, SymbolProvider};
use crate::ranker::{CompletionRanker, DefaultCompletionRanker};
use crate::registry::{SymbolRegistry, SymbolSnapshot};
use crate::types::*;
use std::borrow::Cow;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Candidates merged for one buffer state
struct ScanMemo {
    buffer: String,
    skipped: TextRange,
    registry: SymbolSnapshot,
    merged: SymbolSnapshot,
}

/// The suggestion engine
pub struct SuggestionEngine {
    config: EngineConfig,
    registry: Arc<SymbolRegistry>,
    scanner: BufferScanner,
    ranker: Arc<dyn CompletionRanker>,
    applier: CompletionApplier,
    predictor: GhostTextPredictor,
    memo: Mutex<Option<ScanMemo>>,
}

impl SuggestionEngine {
    /// Create an engine over an existing registry
    pub fn new(config: EngineConfig, registry: Arc<SymbolRegistry>) -> Self {
        Self {
            ranker: Arc::new(DefaultCompletionRanker::new(&config)),
            applier: CompletionApplier::new(UsageHistory::new(config.recency_capacity)),
            scanner: BufferScanner::with_parse_limit(config.full_parse_limit),
            predictor: GhostTextPredictor::new(),
            memo: Mutex::new(None),
            registry,
            config,
        }
    }

    /// Create an engine with the host API provider and the Python language providers
    pub fn python(config: EngineConfig, host: Arc<dyn HostIntrospector>) -> Self {
        let mut providers: Vec<Arc<dyn SymbolProvider>> = vec![Arc::new(HostApiProvider::new(host))];
        providers.extend(python_providers());
        let registry = SymbolRegistry::with_providers(providers, &config);
        Self::new(config, Arc::new(registry))
    }

    /// Replace the ranker
    pub fn with_ranker(mut self, ranker: Arc<dyn CompletionRanker>) -> Self {
        self.ranker = ranker;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<SymbolRegistry> {
        &self.registry
    }

    pub fn usage(&self) -> &UsageHistory {
        self.applier.history()
    }

    /// Run the first provider scan synchronously
    pub fn warm_up(&self) -> SymbolSnapshot {
        self.registry.collect_symbols()
    }

    /// User symbols in `buffer`
    pub fn user_symbols(&self, buffer: &str) -> Vec<Symbol> {
        self.scanner.extract_user_symbols(buffer)
    }

    /// Registry symbols with the buffer's user symbols merged last
    ///
    /// The word under `cursor` is still being typed and is left out of the
    /// scan.
    pub fn candidates(&self, buffer: &str, cursor: usize) -> SymbolSnapshot {
        let skipped = word_range(buffer, cursor).unwrap_or_else(|_| TextRange::empty(0));
        let registry = self.registry.snapshot();

        let mut memo = self.memo.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(hit) = memo.as_ref() {
            if hit.skipped == skipped && hit.registry.same_merge(&registry) && hit.buffer == buffer {
                return hit.merged.clone();
            }
        }

        let scanned = blank_range(buffer, skipped);
        let merged = registry.with_user_symbols(self.user_symbols(&scanned));
        *memo = Some(ScanMemo {
            buffer: buffer.to_string(),
            skipped,
            registry,
            merged: merged.clone(),
        });
        merged
    }

    /// Ranked candidates for the word left of the cursor
    ///
    /// Returns an empty list when the cursor offset is invalid.
    pub fn complete(&self, request: &CompletionRequest) -> CompletionList {
        let found = current_word(&request.buffer, request.cursor).and_then(|prefix| {
            word_range(&request.buffer, request.cursor).map(|range| (prefix, range))
        });
        let (prefix, replace_range) = match found {
            Ok(found) => found,
            Err(e) => {
                debug!("Completion request degraded to empty: {}", e);
                return CompletionList::empty(request.cursor.min(request.buffer.len()));
            }
        };

        if prefix.is_empty() {
            return CompletionList::empty(request.cursor);
        }

        let symbols = self.candidates(&request.buffer, request.cursor);
        let items = self.ranker.rank(prefix, &symbols, &self.usage_snapshot());
        debug!("{} candidates for prefix {:?}", items.len(), prefix);

        CompletionList {
            prefix: prefix.to_string(),
            replace_range,
            items,
        }
    }

    /// Accept `chosen` at `cursor`
    pub fn apply(&self, buffer: &str, cursor: usize, chosen: &Symbol) -> CompletionResult<AppliedCompletion> {
        self.applier.apply(buffer, cursor, chosen)
    }

    /// Ghost text for the cursor
    pub fn predict_ghost(&self, buffer: &str, cursor: usize) -> Option<GhostText> {
        let symbols = self.candidates(buffer, cursor);
        self.predictor
            .predict_ghost(buffer, cursor, &symbols, &self.usage_snapshot())
    }

    /// Ghost-text suffix for the cursor; empty when there is none
    pub fn predict(&self, buffer: &str, cursor: usize) -> String {
        self.predict_ghost(buffer, cursor)
            .map(|ghost| ghost.suffix)
            .unwrap_or_default()
    }

    /// Accept displayed ghost text, applying its full candidate name
    pub fn accept_ghost(&self, buffer: &str, ghost: &GhostText) -> CompletionResult<AppliedCompletion> {
        self.applier.apply_name(buffer, ghost.anchor, &ghost.candidate)
    }

    /// Documentation summary for a candidate
    pub fn resolve_doc(&self, symbol: &Symbol) -> Option<String> {
        self.registry.resolve_doc(symbol)
    }

    fn usage_snapshot(&self) -> UsageSnapshot {
        self.usage().snapshot().unwrap_or_else(|e| {
            debug!("Ranking without usage history: {}", e);
            UsageSnapshot::default()
        })
    }
}

/// `buffer` with `range` overwritten by spaces; byte offsets are unchanged
fn blank_range(buffer: &str, range: TextRange) -> Cow<'_, str> {
    if range.is_empty() {
        return Cow::Borrowed(buffer);
    }
    let mut blanked = String::with_capacity(buffer.len());
    blanked.push_str(&buffer[..range.start]);
    blanked.extend(std::iter::repeat(' ').take(range.len()));
    blanked.push_str(&buffer[range.end..]);
    Cow::Owned(blanked)
}
