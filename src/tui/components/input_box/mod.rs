//! # InputBox Component
//!
//! The question box. Multi-line, wrapped, with a movable cursor.
//!
//! ## State Management
//!
//! `SessionState::input_text` is the source of truth. The box keeps a working
//! copy so the cursor has something to index into; every edit is reported as
//! `InputEvent::Changed(text)` and fed back through the reducer. When the core
//! clears the text after a successful answer, `sync()` pulls the change in.

mod cursor;
mod text_wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::CursorState;
use text_wrap::{
    MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, inner_width, line_count, next_char_boundary,
    prev_char_boundary, wrapped_lines,
};

pub const INPUT_TITLE: &str = " 💬 Ask your questions here: ";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Text content changed
    Changed(String),
    /// Enter pressed
    Submit,
}

pub struct InputBox {
    buffer: String,
    cursor: CursorState,
    /// Whether keystrokes go here (Prop)
    pub focused: bool,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: CursorState::new(),
            focused: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Adopt `text` from application state if it differs; cursor moves to the end.
    pub fn sync(&mut self, text: &str) {
        if self.buffer != text {
            self.buffer = text.to_string();
            self.cursor.pos = self.buffer.len();
            self.cursor.scroll_offset = 0;
        }
    }

    /// Required height for the current content, clamped to the visible line limit.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let lines = line_count(&self.buffer, inner_width(area_width));
        lines.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn changed(&self) -> Option<InputEvent> {
        Some(InputEvent::Changed(self.buffer.clone()))
    }

    fn visible_text(&self, area_width: u16) -> String {
        let lines = wrapped_lines(&self.buffer, inner_width(area_width));
        let start = (self.cursor.scroll_offset as usize).min(lines.len());
        let end = (start + MAX_VISIBLE_LINES as usize).min(lines.len());
        lines[start..end].join("\n")
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.cursor.update_scroll_offset(&self.buffer, area.width);

        let border_style = if self.focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(INPUT_TITLE);

        let text_style = if self.focused {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
        };
        let paragraph = Paragraph::new(self.visible_text(area.width))
            .block(block)
            .style(text_style);
        frame.render_widget(paragraph, area);

        if self.focused {
            frame.set_cursor_position(self.cursor.screen_pos(&self.buffer, area));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor.pos, *c);
                self.cursor.pos += c.len_utf8();
                self.changed()
            }
            TuiEvent::Paste(text) => {
                // Terminals send CR for newlines inside pastes
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                self.buffer.insert_str(self.cursor.pos, &text);
                self.cursor.pos += text.len();
                self.changed()
            }
            TuiEvent::Backspace => {
                if self.cursor.pos == 0 {
                    return None;
                }
                let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(prev..self.cursor.pos);
                self.cursor.pos = prev;
                self.changed()
            }
            TuiEvent::Delete => {
                if self.cursor.pos >= self.buffer.len() {
                    return None;
                }
                let next = next_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(self.cursor.pos..next);
                self.changed()
            }
            TuiEvent::CursorLeft => {
                self.cursor.pos = prev_char_boundary(&self.buffer, self.cursor.pos);
                None
            }
            TuiEvent::CursorRight => {
                if self.cursor.pos < self.buffer.len() {
                    self.cursor.pos = next_char_boundary(&self.buffer, self.cursor.pos);
                }
                None
            }
            TuiEvent::CursorHome => {
                self.cursor.pos = self.buffer[..self.cursor.pos]
                    .rfind('\n')
                    .map_or(0, |i| i + 1);
                None
            }
            TuiEvent::CursorEnd => {
                self.cursor.pos = self.buffer[self.cursor.pos..]
                    .find('\n')
                    .map_or(self.buffer.len(), |i| self.cursor.pos + i);
                None
            }
            TuiEvent::Submit => Some(InputEvent::Submit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn typed(text: &str) -> InputBox {
        let mut input = InputBox::new();
        for c in text.chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
        input
    }

    #[test]
    fn test_typing_reports_full_text() {
        let mut input = typed("ab");
        let res = input.handle_event(&TuiEvent::InputChar('c'));
        assert_eq!(res, Some(InputEvent::Changed("abc".to_string())));
    }

    #[test]
    fn test_backspace_at_start_is_silent() {
        let mut input = InputBox::new();
        assert_eq!(input.handle_event(&TuiEvent::Backspace), None);
    }

    #[test]
    fn test_edit_in_the_middle() {
        let mut input = typed("pint");
        input.handle_event(&TuiEvent::CursorLeft);
        input.handle_event(&TuiEvent::CursorLeft);
        input.handle_event(&TuiEvent::CursorLeft);
        let res = input.handle_event(&TuiEvent::InputChar('r'));
        assert_eq!(res, Some(InputEvent::Changed("print".to_string())));
    }

    #[test]
    fn test_paste_normalizes_carriage_returns() {
        let mut input = InputBox::new();
        let res = input.handle_event(&TuiEvent::Paste("a\r\nb\rc".to_string()));
        assert_eq!(res, Some(InputEvent::Changed("a\nb\nc".to_string())));
    }

    #[test]
    fn test_submit_does_not_clear() {
        let mut input = typed("hello");
        assert_eq!(input.handle_event(&TuiEvent::Submit), Some(InputEvent::Submit));
        assert_eq!(input.text(), "hello");
    }

    #[test]
    fn test_sync_adopts_cleared_text() {
        let mut input = typed("hello");
        input.sync("");
        assert_eq!(input.text(), "");
        // Typing after a sync lands at the right place
        input.handle_event(&TuiEvent::InputChar('x'));
        assert_eq!(input.text(), "x");
    }

    #[test]
    fn test_height_grows_then_clamps() {
        let input = typed("one");
        assert_eq!(input.calculate_height(40), 1 + VERTICAL_OVERHEAD);
        let mut tall = InputBox::new();
        tall.sync(&"line\n".repeat(20));
        assert_eq!(tall.calculate_height(40), MAX_VISIBLE_LINES + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_render_shows_title_and_text() {
        let backend = TestBackend::new(40, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut input = typed("print(1)");

        terminal.draw(|f| input.render(f, f.area())).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Ask your questions here"));
        assert!(text.contains("print(1)"));
    }
}
