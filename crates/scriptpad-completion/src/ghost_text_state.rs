/// Ghost text session state
///
/// Tracks the lifecycle of the ghost text shown in the editor: displayed after
/// a keystroke, accepted with Tab, dismissed with Escape or when the
/// prediction goes away.
use crate::engine::SuggestionEngine;
use crate::types::*;

/// Represents the state of ghost text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GhostTextState {
    /// No ghost text is currently displayed
    #[default]
    Dismissed,
    /// Ghost text is displayed and can be accepted
    Displayed(GhostText),
    /// Ghost text has been accepted
    Accepted(GhostText),
}

/// Keys the session reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostKey {
    Tab,
    Escape,
    Other,
}

/// Result of routing a key through the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Ghost text was accepted into the buffer
    Applied(AppliedCompletion),
    /// Ghost text was hidden
    Dismissed,
    /// The key is not for the session; the editor handles it
    PassThrough,
}

/// Ghost text state for one editor view
#[derive(Debug, Default)]
pub struct GhostTextSession {
    state: GhostTextState,
}

impl GhostTextSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GhostTextState {
        &self.state
    }

    pub fn is_displayed(&self) -> bool {
        matches!(self.state, GhostTextState::Displayed(_))
    }

    /// Ghost text currently on screen
    pub fn displayed(&self) -> Option<&GhostText> {
        match &self.state {
            GhostTextState::Displayed(ghost) => Some(ghost),
            _ => None,
        }
    }

    /// Show `ghost_text`, or dismiss when there is nothing to show
    pub fn update(&mut self, ghost_text: Option<GhostText>) {
        self.state = match ghost_text {
            Some(ghost) if !ghost.suffix.is_empty() => GhostTextState::Displayed(ghost),
            _ => GhostTextState::Dismissed,
        };
    }

    /// Re-predict after the buffer or cursor changed
    pub fn refresh(&mut self, engine: &SuggestionEngine, buffer: &str, cursor: usize) {
        self.update(engine.predict_ghost(buffer, cursor));
    }

    pub fn dismiss(&mut self) {
        self.state = GhostTextState::Dismissed;
    }

    /// Accept the displayed ghost text into `buffer`
    ///
    /// Returns `Ok(None)` when nothing is displayed. On error the ghost text
    /// stays displayed.
    pub fn accept(
        &mut self,
        engine: &SuggestionEngine,
        buffer: &str,
    ) -> CompletionResult<Option<AppliedCompletion>> {
        let ghost = match &self.state {
            GhostTextState::Displayed(ghost) => ghost.clone(),
            _ => return Ok(None),
        };

        let applied = engine.accept_ghost(buffer, &ghost)?;
        self.state = GhostTextState::Accepted(ghost);
        Ok(Some(applied))
    }

    /// Route a key press: Tab accepts, Escape dismisses
    pub fn handle_key(
        &mut self,
        key: GhostKey,
        engine: &SuggestionEngine,
        buffer: &str,
    ) -> CompletionResult<KeyOutcome> {
        if !self.is_displayed() {
            return Ok(KeyOutcome::PassThrough);
        }

        match key {
            GhostKey::Tab => Ok(self
                .accept(engine, buffer)?
                .map(KeyOutcome::Applied)
                .unwrap_or(KeyOutcome::PassThrough)),
            GhostKey::Escape => {
                self.dismiss();
                Ok(KeyOutcome::Dismissed)
            }
            GhostKey::Other => Ok(KeyOutcome::PassThrough),
        }
    }
}
