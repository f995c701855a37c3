//! # Application State
//!
//! Core business state for pyassist. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── session: SessionState          // the UI state bag (serializable)
//! │   ├── input_text                 // question box contents
//! │   ├── response                   // answer paired with the selection
//! │   ├── selected_question
//! │   ├── selected_timestamp
//! │   ├── show_viewport              // response panel gate
//! │   └── history: Vec<HistoryEntry> // oldest first
//! ├── provider: Arc<dyn CompletionProvider>
//! ├── model_name: String
//! ├── system_prompt: String
//! ├── pending: Option<PendingQuestion> // request in flight
//! ├── error: Option<String>          // inline error under the submit control
//! └── status_message: String         // header status text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::history::HistoryEntry;
use crate::inference::CompletionProvider;

/// Everything the screen is a projection of.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub input_text: String,
    pub response: String,
    pub selected_question: String,
    pub selected_timestamp: String,
    pub show_viewport: bool,
    pub history: Vec<HistoryEntry>,
}

impl SessionState {
    pub fn new(history: Vec<HistoryEntry>) -> Self {
        Self {
            history,
            ..Default::default()
        }
    }

    /// Whether the response panel should be drawn.
    pub fn viewport_visible(&self) -> bool {
        self.show_viewport && !self.response.is_empty()
    }

    /// Entry at a newest-first display index.
    pub fn entry_at_display(&self, display_index: usize) -> Option<&HistoryEntry> {
        crate::core::history::display_to_storage(self.history.len(), display_index)
            .map(|i| &self.history[i])
    }
}

/// The question currently awaiting an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuestion {
    pub question: String,
    pub timestamp: String,
}

pub struct App {
    pub session: SessionState,
    pub provider: Arc<dyn CompletionProvider>,
    pub model_name: String,
    pub system_prompt: String,
    pub pending: Option<PendingQuestion>,
    pub error: Option<String>,
    pub status_message: String,
}

impl App {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        model_name: String,
        system_prompt: String,
        history: Vec<HistoryEntry>,
    ) -> Self {
        Self {
            session: SessionState::new(history),
            provider,
            model_name,
            system_prompt,
            pending: None,
            error: None,
            status_message: String::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Submit is enabled whenever there is text and nothing is in flight.
    pub fn can_submit(&self) -> bool {
        !self.session.input_text.is_empty() && !self.is_loading()
    }
}
