/// Applying an accepted completion to the buffer
use crate::context::utils::word_range;
use crate::history::UsageHistory;
use crate::types::*;
use tracing::debug;

/// Replace the word around `offset` with `name`, without recording usage
///
/// The replaced span is the identifier run left of the cursor plus, when that
/// run is non-empty, the run continuing to its right. The returned cursor
/// sits right after the inserted name.
pub fn apply_completion(text: &str, offset: usize, name: &str) -> CompletionResult<AppliedCompletion> {
    let replaced = word_range(text, offset)?;

    let mut new_text = String::with_capacity(text.len() - replaced.len() + name.len());
    new_text.push_str(&text[..replaced.start]);
    new_text.push_str(name);
    new_text.push_str(&text[replaced.end..]);

    Ok(AppliedCompletion {
        text: new_text,
        cursor: replaced.start + name.len(),
        replaced,
    })
}

/// Applies completions and records each acceptance in the usage history
#[derive(Debug, Clone)]
pub struct CompletionApplier {
    history: UsageHistory,
}

impl CompletionApplier {
    pub fn new(history: UsageHistory) -> Self {
        Self { history }
    }

    pub fn history(&self) -> &UsageHistory {
        &self.history
    }

    /// Apply `chosen` at `offset`
    pub fn apply(&self, text: &str, offset: usize, chosen: &Symbol) -> CompletionResult<AppliedCompletion> {
        self.apply_name(text, offset, &chosen.name)
    }

    /// Apply a bare name at `offset`
    pub fn apply_name(&self, text: &str, offset: usize, name: &str) -> CompletionResult<AppliedCompletion> {
        let applied = apply_completion(text, offset, name)?;
        self.history.record_usage(name)?;
        debug!(
            "Applied completion {} over {}..{}",
            name, applied.replaced.start, applied.replaced.end
        );
        Ok(applied)
    }
}

impl Default for CompletionApplier {
    fn default() -> Self {
        Self::new(UsageHistory::default())
    }
}
