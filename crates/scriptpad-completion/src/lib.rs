/// Scriptpad Completion Engine
///
/// Headless suggestion engine for the Python script editor embedded in a
/// compositing host. The editor hands it a buffer and a cursor; it returns
/// ranked candidates, applies the accepted one, and predicts inline ghost
/// text.
///
/// # Architecture
///
/// 1. **Symbol Sources**: Host API reflection and Python language tables, merged by
///    [`SymbolRegistry`] into a cached [`SymbolSnapshot`]
/// 2. **Buffer Scanning**: [`BufferScanner`] extracts user-defined names from the
///    current buffer, falling back to a regex sweep when it does not parse
/// 3. **Ranking**: [`DefaultCompletionRanker`] matches the typed prefix (optionally
///    fuzzy) and orders by recency and usage
/// 4. **Applying**: [`CompletionApplier`] replaces the word around the cursor and
///    records usage in [`UsageHistory`]
/// 5. **Ghost Text**: [`GhostTextPredictor`] offers the single best continuation;
///    [`GhostTextSession`] tracks it on screen
///
/// [`SuggestionEngine`] wires all of these together.
///
/// # Host Integration
///
/// The host API is reached only through the [`HostIntrospector`] trait. Outside
/// the host, [`NullHost`] reports no members and the remaining providers still
/// work. A JSON side-cache ([`CachedSymbolProvider`]) serves the last host scan
/// while a fresh one runs via [`SymbolRegistry::spawn_refresh`].
///
/// # Offsets
///
/// All cursor offsets are UTF-8 byte offsets into the buffer and must fall on a
/// character boundary.
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
/// let list = engine.complete(&CompletionRequest::new("pri", 3));
/// assert_eq!(list.items[0].name, "print");
///
/// let applied = engine.apply("pri", 3, &list.items[0])?;
/// assert_eq!(applied.text, "print");
/// assert_eq!(engine.predict("pri", 3), "nt");
/// ```
pub mod apply;
pub mod cache;
pub mod config;
pub mod context;
pub mod engine;
pub mod ghost_text;
pub mod ghost_text_state;
pub mod history;
pub mod host;
pub mod providers;
pub mod ranker;
pub mod registry;
pub mod types;

// Re-export public types and traits
pub use apply::{apply_completion, CompletionApplier};
pub use cache::{CachedSymbol, CachedSymbolProvider, SymbolCache};
pub use config::{ConfigFormat, ConfigLoader, EngineConfig};
pub use context::{current_word, word_range, BufferScanner};
pub use engine::SuggestionEngine;
pub use ghost_text::GhostTextPredictor;
pub use ghost_text_state::{GhostKey, GhostTextSession, GhostTextState, KeyOutcome};
pub use history::{UsageHistory, UsageSnapshot};
pub use host::{
    classify_member, HostApiProvider, HostIntrospector, HostMember, HostMemberShape, NullHost,
    StaticHost,
};
pub use providers::{python_providers, SourceCategory, SymbolProvider};
pub use ranker::{CompletionRanker, DefaultCompletionRanker};
pub use registry::{SymbolRegistry, SymbolSnapshot};
pub use types::*;
