//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Request Lifecycle
//!
//! A submitted question is answered on a tokio task, which reports back
//! through an mpsc channel as `ResponseReceived` or `ResponseFailed`. While
//! that request is in flight every interaction except Ctrl+C is dropped, so
//! the screen behaves as if the submit handler blocked.
//!
//! ## Redraw Strategy
//!
//! - **Loading**: draws every ~80ms so the spinner animates.
//! - **Idle**: sleeps up to 500ms, only redraws on events or terminal resize.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::Provider;
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::history::{HistoryEntry, HistoryStore, now_timestamp};
use crate::core::state::App;
use crate::inference::{
    CompletionProvider, CompletionRequest, LmStudioProvider, OllamaProvider, ProviderError,
};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    HistorySidebarState, InputBox, InputEvent, SidebarEvent, ViewportState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Which panel receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Sidebar,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub input_box: InputBox,
    pub sidebar: HistorySidebarState,
    pub viewport: ViewportState,
    pub focus: Focus,
}

impl TuiState {
    pub fn new(history_len: usize) -> Self {
        Self {
            input_box: InputBox::new(),
            sidebar: HistorySidebarState::new(history_len),
            viewport: ViewportState::new(),
            focus: Focus::Input, // User expects to type immediately
        }
    }

    /// Pull props from `App` before drawing or routing.
    fn sync(&mut self, app: &App) {
        self.input_box.sync(&app.session.input_text);
        self.sidebar.sync_len(app.session.history.len());
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol is ignored by terminals that lack it
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Build the provider selected in the resolved config.
pub fn build_provider(
    config: &ResolvedConfig,
) -> Result<Arc<dyn CompletionProvider>, ProviderError> {
    let provider: Arc<dyn CompletionProvider> = match config.provider {
        Provider::Ollama => Arc::new(OllamaProvider::new(
            Some(config.ollama_base_url.clone()),
            config.request_timeout,
        )?),
        Provider::LmStudio => Arc::new(LmStudioProvider::new(
            Some(config.lmstudio_base_url.clone()),
            config.request_timeout,
        )?),
    };
    info!(
        "Using provider {} with model {}",
        provider.name(),
        config.model_name
    );
    Ok(provider)
}

pub fn run(
    config: ResolvedConfig,
    store: HistoryStore,
    history: Vec<HistoryEntry>,
) -> std::io::Result<()> {
    let provider = build_provider(&config).map_err(std::io::Error::other)?;
    let mut app = App::new(
        provider,
        config.model_name.clone(),
        config.system_prompt.clone(),
        history,
    );
    let mut tui = TuiState::new(app.session.history.len());

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Answers from background requests
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true;

    loop {
        tui.sync(&app);

        let animating = app.is_loading();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            tui.sync(&app);
            if let Some(action) = route_event(&app, &mut tui, &event)
                && dispatch(&mut app, &store, &tx, action)
            {
                should_quit = true;
                break;
            }
        }

        if should_quit {
            break;
        }

        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut app, &store, &tx, action) {
                should_quit = true;
            }
        }

        if should_quit {
            break;
        }
    }

    ratatui::restore();
    Ok(())
}

/// Translate a terminal event into an action, updating presentation state on
/// the way. `None` means the event was absorbed by the TUI or dropped.
fn route_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    // Ctrl+C quits even mid-request
    if matches!(event, TuiEvent::ForceQuit) {
        return Some(Action::Quit);
    }
    if app.is_loading() {
        return None;
    }

    match event {
        TuiEvent::Resize => None,
        TuiEvent::ToggleFocus => {
            tui.focus = match tui.focus {
                Focus::Input => Focus::Sidebar,
                Focus::Sidebar => Focus::Input,
            };
            None
        }
        TuiEvent::Escape => Some(Action::CloseViewport),
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.viewport.handle_event(event);
            None
        }
        _ => match tui.focus {
            Focus::Input => match tui.input_box.handle_event(event)? {
                InputEvent::Changed(text) => Some(Action::InputChanged(text)),
                InputEvent::Submit => Some(Action::Submit {
                    text: app.session.input_text.clone(),
                    timestamp: now_timestamp(),
                }),
            },
            Focus::Sidebar => match tui.sidebar.handle_event(event)? {
                SidebarEvent::View(index) => Some(Action::ViewEntry(index)),
                SidebarEvent::Delete(index) => Some(Action::DeleteEntry(index)),
            },
        },
    }
}

/// Run an action through `update()` and perform the effect it asks for.
/// Returns true when the app should quit.
fn dispatch(
    app: &mut App,
    store: &HistoryStore,
    tx: &mpsc::Sender<Action>,
    action: Action,
) -> bool {
    match update(app, action) {
        Effect::None => false,
        Effect::Quit => true,
        Effect::SpawnRequest { question } => {
            spawn_request(app, question, tx.clone());
            false
        }
        Effect::SaveHistory => {
            if let Err(e) = store.save(&app.session.history) {
                warn!(
                    "Failed to save history to {}: {}",
                    store.path().display(),
                    e
                );
                update(app, Action::HistorySaveFailed(e.to_string()));
            }
            false
        }
    }
}

fn spawn_request(app: &App, question: String, tx: mpsc::Sender<Action>) {
    info!("Spawning request to {}", app.provider.name());

    let provider = app.provider.clone();
    let model = app.model_name.clone();
    let system_prompt = app.system_prompt.clone();

    tokio::spawn(async move {
        let started = Instant::now();
        let request = CompletionRequest {
            system_prompt: &system_prompt,
            question: &question,
            model: &model,
        };
        let action = match provider.complete(request).await {
            Ok(answer) => {
                info!(
                    "Answer received in {}ms ({} bytes)",
                    started.elapsed().as_millis(),
                    answer.len()
                );
                Action::ResponseReceived(answer)
            }
            Err(e) => {
                warn!("Request failed: {}", e);
                Action::ResponseFailed(e.to_string())
            }
        };
        if tx.send(action).is_err() {
            warn!("Failed to deliver answer: receiver dropped");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedProvider, entry, test_app, test_app_with};

    fn press(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Option<Action> {
        tui.sync(app);
        let action = route_event(app, tui, &event);
        if let Some(action) = action.clone() {
            update(app, action);
        }
        action
    }

    fn type_text(app: &mut App, tui: &mut TuiState, text: &str) {
        for c in text.chars() {
            press(app, tui, TuiEvent::InputChar(c));
        }
    }

    #[test]
    fn test_typing_then_enter_submits_input_text() {
        let mut app = test_app(vec![]);
        let mut tui = TuiState::new(0);
        type_text(&mut app, &mut tui, "why?");
        assert_eq!(app.session.input_text, "why?");

        let action = press(&mut app, &mut tui, TuiEvent::Submit);
        assert!(matches!(action, Some(Action::Submit { ref text, .. }) if text == "why?"));
        assert!(app.is_loading());
    }

    #[test]
    fn test_interactions_dropped_while_loading() {
        let mut app = test_app(vec![entry("old")]);
        let mut tui = TuiState::new(1);
        type_text(&mut app, &mut tui, "q");
        press(&mut app, &mut tui, TuiEvent::Submit);

        assert_eq!(press(&mut app, &mut tui, TuiEvent::InputChar('x')), None);
        assert_eq!(press(&mut app, &mut tui, TuiEvent::Escape), None);
        tui.focus = Focus::Sidebar;
        assert_eq!(press(&mut app, &mut tui, TuiEvent::InputChar('d')), None);
        assert_eq!(app.session.history.len(), 1);
        assert_eq!(app.session.input_text, "q");
    }

    #[test]
    fn test_ctrl_c_quits_while_loading() {
        let mut app = test_app(vec![]);
        let mut tui = TuiState::new(0);
        type_text(&mut app, &mut tui, "q");
        press(&mut app, &mut tui, TuiEvent::Submit);
        assert_eq!(
            press(&mut app, &mut tui, TuiEvent::ForceQuit),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_sidebar_view_and_delete_use_display_index() {
        let mut app = test_app(vec![entry("A"), entry("B"), entry("C")]);
        let mut tui = TuiState::new(3);
        press(&mut app, &mut tui, TuiEvent::ToggleFocus);
        assert_eq!(tui.focus, Focus::Sidebar);

        press(&mut app, &mut tui, TuiEvent::CursorDown);
        assert_eq!(
            press(&mut app, &mut tui, TuiEvent::InputChar('v')),
            Some(Action::ViewEntry(1))
        );
        assert_eq!(app.session.selected_question, "B");
        assert!(app.session.viewport_visible());

        assert_eq!(
            press(&mut app, &mut tui, TuiEvent::InputChar('d')),
            Some(Action::DeleteEntry(1))
        );
        let questions: Vec<_> = app.session.history.iter().map(|e| &e.question).collect();
        assert_eq!(questions, ["A", "C"]);
        assert!(!app.session.show_viewport);
    }

    #[test]
    fn test_typing_in_sidebar_does_not_edit_input() {
        let mut app = test_app(vec![]);
        let mut tui = TuiState::new(0);
        press(&mut app, &mut tui, TuiEvent::ToggleFocus);
        assert_eq!(press(&mut app, &mut tui, TuiEvent::InputChar('x')), None);
        assert_eq!(app.session.input_text, "");
    }

    #[test]
    fn test_escape_closes_viewport() {
        let mut app = test_app(vec![entry("A")]);
        let mut tui = TuiState::new(1);
        update(&mut app, Action::ViewEntry(0));
        press(&mut app, &mut tui, TuiEvent::Escape);
        assert!(!app.session.show_viewport);
    }

    #[test]
    fn test_dispatch_save_failure_sets_status() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the rename fail
        let path = dir.path().join("history.json");
        std::fs::create_dir(&path).unwrap();
        let store = HistoryStore::new(&path);
        let (tx, _rx) = mpsc::channel();

        let mut app = test_app(vec![entry("A")]);
        let quit = dispatch(&mut app, &store, &tx, Action::DeleteEntry(0));
        assert!(!quit);
        assert!(app.session.history.is_empty());
        assert!(app.status_message.starts_with("History not saved:"));
    }

    #[test]
    fn test_dispatch_save_writes_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        let (tx, _rx) = mpsc::channel();

        let mut app = test_app(vec![entry("A"), entry("B")]);
        dispatch(&mut app, &store, &tx, Action::DeleteEntry(0));
        let saved = store.load().unwrap();
        assert_eq!(saved, vec![entry("A")]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_spawned_request_reports_answer() {
        let provider = Arc::new(ScriptedProvider::answering("use a list"));
        let mut app = test_app_with(provider.clone(), vec![]);
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        let (tx, rx) = mpsc::channel();

        dispatch(
            &mut app,
            &store,
            &tx,
            Action::Submit {
                text: "how to store items?".to_string(),
                timestamp: "2024-06-01 12:00:00".to_string(),
            },
        );
        let action = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(action, Action::ResponseReceived("use a list".to_string()));
        assert_eq!(
            *provider.questions.lock().unwrap(),
            vec!["how to store items?".to_string()]
        );

        dispatch(&mut app, &store, &tx, action);
        assert_eq!(store.load().unwrap().len(), 1);
        assert_eq!(app.session.input_text, "");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_spawned_request_reports_failure() {
        let mut app = test_app_with(Arc::new(ScriptedProvider::failing("refused")), vec![]);
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        let (tx, rx) = mpsc::channel();

        app.session.input_text = "q".to_string();
        dispatch(
            &mut app,
            &store,
            &tx,
            Action::Submit {
                text: "q".to_string(),
                timestamp: "2024-06-01 12:00:00".to_string(),
            },
        );
        let action = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(action, Action::ResponseFailed(ref msg) if msg.contains("refused")));

        dispatch(&mut app, &store, &tx, action);
        assert_eq!(app.session.input_text, "q");
        assert!(app.session.history.is_empty());
        assert!(!store.path().exists());
    }
}
