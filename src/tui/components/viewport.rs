//! # Response Viewer Component
//!
//! The panel that shows one question with its full answer. The answer is
//! rendered as Markdown and scrolls vertically inside a `ScrollView`.
//!
//! ```text
//! ╭ 🤖 Response Viewer ─────────────────────╮
//! │ Question: how do I read a file?         │
//! │ Response:                               │
//! │ ...markdown...                        ▐ │
//! │ Timestamp: 2024-05-01 10:00:00          │
//! ╰──── Close (Esc) · PgUp/PgDn scroll ────╯
//! ```

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::markdown;

/// Question lines shown before the question box starts clipping.
const MAX_QUESTION_LINES: u16 = 4;

/// Persistent scroll state for the viewer.
#[derive(Default)]
pub struct ViewportState {
    pub scroll: ScrollViewState,
    /// (question, timestamp) currently on screen; a change resets the scroll.
    shown: Option<(String, String)>,
}

impl ViewportState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note which entry is displayed, scrolling back to the top when it changes.
    pub fn show(&mut self, question: &str, timestamp: &str) {
        let changed = self
            .shown
            .as_ref()
            .is_none_or(|(q, t)| q != question || t != timestamp);
        if changed {
            self.scroll.scroll_to_top();
            self.shown = Some((question.to_string(), timestamp.to_string()));
        }
    }
}

impl EventHandler for ViewportState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<()> {
        match event {
            TuiEvent::ScrollUp => self.scroll.scroll_up(),
            TuiEvent::ScrollDown => self.scroll.scroll_down(),
            TuiEvent::ScrollPageUp => self.scroll.scroll_page_up(),
            TuiEvent::ScrollPageDown => self.scroll.scroll_page_down(),
            _ => {}
        }
        None
    }
}

/// Transient render wrapper: props plus borrowed scroll state.
pub struct ResponseViewport<'a> {
    pub question: &'a str,
    pub response: &'a str,
    pub timestamp: &'a str,
    pub state: &'a mut ViewportState,
}

impl Component for ResponseViewport<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Magenta))
            .title(" 🤖 Response Viewer ")
            .title_bottom(Line::from(" Close (Esc) · PgUp/PgDn scroll ").centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let question = Paragraph::new(Line::from(vec![
            Span::styled("Question: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(self.question),
        ]))
        .style(Style::default().fg(Color::LightBlue))
        .wrap(Wrap { trim: false });
        let question_height =
            content_height(question.line_count(inner.width)).clamp(1, MAX_QUESTION_LINES);

        let [question_area, label_area, body_area, caption_area] = Layout::vertical([
            Constraint::Length(question_height),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(inner);

        frame.render_widget(question, question_area);
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Response:",
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )),
            label_area,
        );

        self.render_body(frame, body_area);

        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("Timestamp: {}", self.timestamp),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )),
            caption_area,
        );
    }
}

impl ResponseViewport<'_> {
    fn render_body(&mut self, frame: &mut Frame, area: Rect) {
        // Leave one column for the scrollbar
        let content_width = area.width.saturating_sub(1);
        let body = Paragraph::new(markdown::render(self.response, Color::White))
            .wrap(Wrap { trim: false });
        let height = content_height(body.line_count(content_width));

        let mut scroll_view = ScrollView::new(Size::new(content_width, height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(body, Rect::new(0, 0, content_width, height));
        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll);
    }
}

/// Wrapped line count as a `ScrollView` height, saturating at `u16::MAX`.
fn content_height(lines: usize) -> u16 {
    u16::try_from(lines).unwrap_or(u16::MAX)
}
