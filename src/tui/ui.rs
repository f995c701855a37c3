//! Screen layout. Everything drawn here is a projection of `App` plus the
//! presentation state in `TuiState`.
//!
//! ```text
//! ┌ history ┐┌ header ─────────────────────────┐
//! │         ││ input box                       │
//! │         ││ [ 🚀 Submit ]  / spinner        │
//! │         ││ Error: ...                      │
//! │         ││ response viewer                 │
//! └─────────┘└─────────────────────────────────┘
//! ```

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{Header, HistorySidebar, ResponseViewport};
use crate::tui::{Focus, TuiState};

const SIDEBAR_PERCENT: u16 = 30;
const SUBMIT_LABEL: &str = "[ 🚀 Submit ]";
const THINKING_LABEL: &str = "🤖 AI is thinking...";
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let [sidebar_area, main_area] = Layout::horizontal([
        Constraint::Percentage(SIDEBAR_PERCENT),
        Constraint::Percentage(100 - SIDEBAR_PERCENT),
    ])
    .areas(frame.area());

    tui.sidebar.focused = tui.focus == Focus::Sidebar;
    tui.input_box.focused = tui.focus == Focus::Input && !app.is_loading();
    HistorySidebar::new(&mut tui.sidebar, &app.session.history).render(frame, sidebar_area);

    let input_height = tui.input_box.calculate_height(main_area.width);
    let error_height = if app.error.is_some() { 1 } else { 0 };
    let [header_area, input_area, submit_area, error_area, viewer_area] = Layout::vertical([
        Constraint::Length(Header::HEIGHT),
        Constraint::Length(input_height),
        Constraint::Length(1),
        Constraint::Length(error_height),
        Constraint::Min(0),
    ])
    .areas(main_area);

    Header {
        model_name: &app.model_name,
        status_message: &app.status_message,
    }
    .render(frame, header_area);

    tui.input_box.render(frame, input_area);
    frame.render_widget(Paragraph::new(submit_line(app, spinner_frame)), submit_area);

    if let Some(error) = &app.error {
        frame.render_widget(
            Paragraph::new(format!("Error: {error}"))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true }),
            error_area,
        );
    }

    let session = &app.session;
    if let Some(pending) = &app.pending {
        draw_pending(frame, viewer_area, &pending.question);
    } else if session.viewport_visible() {
        tui.viewport
            .show(&session.selected_question, &session.selected_timestamp);
        ResponseViewport {
            question: &session.selected_question,
            response: &session.response,
            timestamp: &session.selected_timestamp,
            state: &mut tui.viewport,
        }
        .render(frame, viewer_area);
    }
}

fn submit_line(app: &App, spinner_frame: usize) -> Line<'static> {
    if app.is_loading() {
        let frame = SPINNER[spinner_frame % SPINNER.len()];
        return Line::from(vec![
            Span::styled(format!("{frame} "), Style::default().fg(Color::Cyan)),
            Span::styled(THINKING_LABEL, Style::default().fg(Color::Cyan)),
        ]);
    }
    let style = if app.can_submit() {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
    };
    Line::from(vec![
        Span::styled(SUBMIT_LABEL, style),
        Span::styled(
            "  Enter to submit · Ctrl+J newline · Tab history",
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

/// While a request is in flight only the question is shown; there is no answer yet.
fn draw_pending(frame: &mut Frame, area: Rect, question: &str) {
    let text = vec![
        Line::from(Span::styled(
            "Question:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(question.to_string()),
    ];
    frame.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: false }),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::test_support::{entry, test_app};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen(app: &App, tui: &mut TuiState) -> String {
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui, 0)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn tui_for(app: &App) -> TuiState {
        let mut tui = TuiState::new(app.session.history.len());
        tui.input_box.sync(&app.session.input_text);
        tui
    }

    #[test]
    fn test_fresh_screen() {
        let app = test_app(vec![]);
        let mut tui = tui_for(&app);
        let text = screen(&app, &mut tui);
        assert!(text.contains("Python AI Assistant"));
        assert!(text.contains("Powered with test-model"));
        assert!(text.contains("Chat History"));
        assert!(text.contains("No questions yet."));
        assert!(text.contains("Submit"));
        assert!(!text.contains("Response Viewer"));
    }

    #[test]
    fn test_loading_shows_spinner_and_pending_question() {
        let mut app = test_app(vec![]);
        update(
            &mut app,
            Action::Submit {
                text: "what is a generator?".to_string(),
                timestamp: "2024-06-01 12:00:00".to_string(),
            },
        );
        let mut tui = tui_for(&app);
        let text = screen(&app, &mut tui);
        assert!(text.contains("AI is thinking..."));
        assert!(text.contains("what is a generator?"));
        assert!(!text.contains("Response Viewer"));
    }

    #[test]
    fn test_loading_after_view_hides_previous_answer() {
        let mut app = test_app(vec![entry("old")]);
        update(&mut app, Action::ViewEntry(0));
        update(
            &mut app,
            Action::Submit {
                text: "brand new".to_string(),
                timestamp: "2024-06-01 12:00:00".to_string(),
            },
        );
        let mut tui = tui_for(&app);
        let text = screen(&app, &mut tui);
        assert!(text.contains("brand new"));
        assert!(!text.contains("answer to old"));
        assert!(!text.contains("Response Viewer"));
    }

    #[test]
    fn test_viewed_entry_is_shown() {
        let mut app = test_app(vec![entry("first"), entry("second")]);
        update(&mut app, Action::ViewEntry(1));
        let mut tui = tui_for(&app);
        let text = screen(&app, &mut tui);
        assert!(text.contains("Response Viewer"));
        assert!(text.contains("Question: first"));
        assert!(text.contains("answer to first"));
        assert!(text.contains("Timestamp: 2024-05-01 10:00:00"));
    }

    #[test]
    fn test_error_line_replaces_viewer() {
        let mut app = test_app(vec![entry("old")]);
        update(&mut app, Action::ViewEntry(0));
        update(
            &mut app,
            Action::Submit {
                text: "q".to_string(),
                timestamp: "2024-06-01 12:00:00".to_string(),
            },
        );
        update(&mut app, Action::ResponseFailed("connection refused".to_string()));
        let mut tui = tui_for(&app);
        let text = screen(&app, &mut tui);
        assert!(text.contains("Error: connection refused"));
        assert!(!text.contains("Response Viewer"));
    }

    #[test]
    fn test_submit_style_tracks_input() {
        let mut app = test_app(vec![]);
        let idle = submit_line(&app, 0);
        assert!(idle.spans[0].style.add_modifier.contains(Modifier::DIM));

        app.session.input_text = "hi".to_string();
        let ready = submit_line(&app, 0);
        assert_eq!(ready.spans[0].style.bg, Some(Color::Green));
    }
}
