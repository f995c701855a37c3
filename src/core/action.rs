//! # Actions
//!
//! Everything that can happen in pyassist becomes an `Action`.
//! User presses Enter? That's `Action::Submit`.
//! The model answers? That's `Action::ResponseReceived(text)`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state, and returns an `Effect` describing the I/O the caller must perform.
//! No side effects here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info, warn};

use crate::core::history::{HistoryEntry, display_to_storage};
use crate::core::state::{App, PendingQuestion};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Question box contents changed.
    InputChanged(String),
    /// Ask a question. The timestamp is captured by the caller at submit time.
    Submit { text: String, timestamp: String },
    /// The model answered the pending question.
    ResponseReceived(String),
    /// The request for the pending question failed.
    ResponseFailed(String),
    /// Show a history entry (newest-first index).
    ViewEntry(usize),
    /// Remove a history entry (newest-first index).
    DeleteEntry(usize),
    CloseViewport,
    /// Writing the history file failed.
    HistorySaveFailed(String),
    Quit,
}

/// Side effect requested by `update()`, performed by the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    SpawnRequest { question: String },
    SaveHistory,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::InputChanged(text) => {
            app.session.input_text = text;
            Effect::None
        }
        Action::Submit { text, timestamp } => {
            if text.is_empty() || app.is_loading() {
                return Effect::None;
            }
            info!("Submitting question ({} bytes)", text.len());
            let session = &mut app.session;
            session.selected_question = text.clone();
            session.selected_timestamp = timestamp.clone();
            // The previous answer does not belong to the new question.
            session.response.clear();
            session.show_viewport = true;
            app.error = None;
            app.pending = Some(PendingQuestion {
                question: text.clone(),
                timestamp,
            });
            Effect::SpawnRequest { question: text }
        }
        Action::ResponseReceived(response) => {
            let Some(pending) = app.pending.take() else {
                warn!("Response arrived with no pending question; dropping it");
                return Effect::None;
            };
            debug!("Response received ({} bytes)", response.len());
            let session = &mut app.session;
            session.response = response.clone();
            session.history.push(HistoryEntry {
                question: pending.question,
                response,
                timestamp: pending.timestamp,
            });
            session.input_text.clear();
            app.status_message.clear();
            Effect::SaveHistory
        }
        Action::ResponseFailed(message) => {
            if app.pending.take().is_none() {
                return Effect::None;
            }
            warn!("Question failed: {}", message);
            // The panel would otherwise pair the new question with a stale answer.
            app.session.show_viewport = false;
            app.error = Some(message);
            Effect::None
        }
        Action::ViewEntry(display_index) => {
            let Some(entry) = app.session.entry_at_display(display_index).cloned() else {
                return Effect::None;
            };
            let timestamp = entry.display_timestamp().to_string();
            let session = &mut app.session;
            session.response = entry.response;
            session.selected_question = entry.question;
            session.selected_timestamp = timestamp;
            session.show_viewport = true;
            Effect::None
        }
        Action::DeleteEntry(display_index) => {
            let session = &mut app.session;
            let Some(index) = display_to_storage(session.history.len(), display_index) else {
                return Effect::None;
            };
            let removed = session.history.remove(index);
            info!("Deleted history entry from {}", removed.timestamp);
            // Any delete closes the viewport, whichever entry it was showing.
            if session.show_viewport {
                session.show_viewport = false;
            }
            Effect::SaveHistory
        }
        Action::CloseViewport => {
            app.session.show_viewport = false;
            Effect::None
        }
        Action::HistorySaveFailed(message) => {
            app.status_message = format!("History not saved: {message}");
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}
