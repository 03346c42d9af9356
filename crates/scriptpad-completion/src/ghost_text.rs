/// Ghost text prediction for inline suggestions
///
/// Ghost text is the unseen remainder of the single most likely name,
/// rendered faded after the cursor. It is a simpler path than ranking: plain
/// case-sensitive prefix matching, no fuzzy matching, one result.
use crate::context::utils::current_word;
use crate::history::UsageSnapshot;
use crate::registry::SymbolSnapshot;
use crate::types::*;
use std::cmp::Reverse;
use tracing::debug;

/// Predicts the inline continuation of the word being typed
#[derive(Debug, Default, Clone, Copy)]
pub struct GhostTextPredictor;

impl GhostTextPredictor {
    pub fn new() -> Self {
        Self
    }

    /// Ghost text for the cursor, or `None` when nothing extends the current word
    ///
    /// Among names strictly longer than the current word that start with it,
    /// the shortest wins; ties go to the most used, then to the earliest in
    /// `symbols`. Nothing is predicted when the winning suffix is already the
    /// text after the cursor.
    pub fn predict_ghost(
        &self,
        text: &str,
        offset: usize,
        symbols: &SymbolSnapshot,
        usage: &UsageSnapshot,
    ) -> Option<GhostText> {
        let word = match current_word(text, offset) {
            Ok(word) => word,
            Err(e) => {
                debug!("No ghost text: {}", e);
                return None;
            }
        };
        if word.is_empty() {
            return None;
        }

        let best = symbols
            .iter()
            .filter(|symbol| symbol.name.len() > word.len() && symbol.name.starts_with(word))
            .min_by_key(|symbol| {
                (
                    symbol.name.chars().count(),
                    Reverse(usage.usage_count(&symbol.name)),
                )
            })?;

        // Mid-identifier, the rest of the name may already follow the cursor
        let suffix = &best.name[word.len()..];
        if text[offset..].starts_with(suffix) {
            return None;
        }

        Some(GhostText::new(suffix, offset, &best.name))
    }

    /// Suffix to display after the cursor; empty when there is none
    pub fn predict(
        &self,
        text: &str,
        offset: usize,
        symbols: &SymbolSnapshot,
        usage: &UsageSnapshot,
    ) -> String {
        self.predict_ghost(text, offset, symbols, usage)
            .map(|ghost| ghost.suffix)
            .unwrap_or_default()
    }
}
