//! # Header Component
//!
//! Title, header line, subheader and a rainbow divider. Stateless: the only
//! inputs are the model name and the transient status message, both props.
//!
//! ```text
//! 🐍 Python AI Assistant
//! Provide your Python code and get your doubts clarified here.
//! 🔮 Powered with llama3 | History not saved: disk full
//! ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//! ```

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

pub const TITLE: &str = "🐍 Python AI Assistant";
pub const HEADER: &str = "Provide your Python code and get your doubts clarified here.";

const RAINBOW: [Color; 6] = [
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Blue,
    Color::Magenta,
];

pub struct Header<'a> {
    pub model_name: &'a str,
    pub status_message: &'a str,
}

impl Header<'_> {
    pub const HEIGHT: u16 = 4;
}

impl Component for Header<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut subheader = vec![Span::styled(
            format!("🔮 Powered with {}", self.model_name),
            Style::default().fg(Color::Magenta),
        )];
        if !self.status_message.is_empty() {
            subheader.push(Span::raw(" | "));
            subheader.push(Span::styled(
                self.status_message.to_string(),
                Style::default().fg(Color::Yellow),
            ));
        }

        let lines = vec![
            Line::from(Span::styled(
                TITLE,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(HEADER),
            Line::from(subheader),
            rainbow_divider(area.width),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }
}

fn rainbow_divider(width: u16) -> Line<'static> {
    let width = width as usize;
    let band = width.div_ceil(RAINBOW.len()).max(1);
    let spans: Vec<Span> = RAINBOW
        .iter()
        .enumerate()
        .map(|(i, color)| {
            let len = band.min(width.saturating_sub(i * band));
            Span::styled("━".repeat(len), Style::default().fg(*color))
        })
        .filter(|span| !span.content.is_empty())
        .collect();
    Line::from(spans)
}
