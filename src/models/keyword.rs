//! Keyword processing state machine.
//!
//! Each keyword in a batch moves through a fixed lifecycle:
//!
//! ```text
//! pending -> processing -> completed   (>=1 approach succeeded, 1 credit)
//!                       -> error       (every approach failed, 0 credits)
//! pending -> skipped                   (batch rejected before processing)
//! ```
//!
//! The states are a closed enum with an explicit transition check so an
//! illegal move (e.g. completed -> processing) is a programming error caught
//! at the call site, not a silently overwritten string field.

use serde::Serialize;

/// Processing state of a single keyword within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordState {
    Pending,
    Processing,
    Completed,
    Error,
    Skipped,
}

impl KeywordState {
    /// Whether moving from `self` to `next` is a legal lifecycle step.
    pub fn can_transition_to(self, next: KeywordState) -> bool {
        use KeywordState::*;
        matches!(
            (self, next),
            (Pending, Processing) | (Pending, Skipped) | (Processing, Completed) | (Processing, Error)
        )
    }
}

/// Per-keyword progress tracker used by the orchestrator.
///
/// Wraps the state enum so every state change goes through
/// [`KeywordProgress::advance`].
#[derive(Debug, Clone)]
pub struct KeywordProgress {
    keyword: String,
    state: KeywordState,
    error: Option<String>,
}

impl KeywordProgress {
    pub fn new(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            state: KeywordState::Pending,
            error: None,
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn state(&self) -> KeywordState {
        self.state
    }

    /// Move to `next`, panicking on an illegal transition.
    ///
    /// The orchestrator drives states in a straight line, so an illegal
    /// transition is a bug there, never a runtime condition.
    pub fn advance(&mut self, next: KeywordState) {
        assert!(
            self.state.can_transition_to(next),
            "illegal keyword state transition: {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
    }

    /// Move to `Error`, recording the failure message.
    pub fn fail(&mut self, message: String) {
        self.advance(KeywordState::Error);
        self.error = Some(message);
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Final per-keyword outcome reported back to the client.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordReport {
    pub keyword: String,
    pub state: KeywordState,
    /// Number of article variants produced for this keyword
    pub articles: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl KeywordReport {
    pub fn from_progress(progress: &KeywordProgress, articles: usize) -> Self {
        Self {
            keyword: progress.keyword().to_string(),
            state: progress.state(),
            articles,
            error: progress.error().map(str::to_string),
        }
    }
}
