//! Cursor position and internal scroll for the question box.
//!
//! The text itself is owned by `InputBox`; every method takes it as `&str`.

use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

use super::text_wrap::{
    BORDER_OFFSET, MAX_VISIBLE_LINES, inner_width, line_count, wrapped_lines,
};

pub(super) struct CursorState {
    /// Byte offset into the buffer (0..=buffer.len())
    pub pos: usize,
    /// First visible wrapped line
    pub scroll_offset: u16,
}

impl CursorState {
    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
        }
    }

    /// (line, column) of the cursor in wrapped coordinates.
    pub fn line_and_col(&self, buffer: &str, area_width: u16) -> (u16, u16) {
        let width = inner_width(area_width);
        let before = &buffer[..self.pos.min(buffer.len())];
        let lines = wrapped_lines(before, width);
        let line = u16::try_from(lines.len().saturating_sub(1)).unwrap_or(u16::MAX);

        // textwrap drops trailing spaces, so measure the tail of the logical line
        let logical_start = before.rfind('\n').map_or(0, |i| i + 1);
        let logical = &before[logical_start..];
        let segments = wrapped_lines(logical, width);
        let consumed: usize = segments
            .iter()
            .take(segments.len().saturating_sub(1))
            .map(|s| s.chars().count())
            .sum();
        let tail: String = logical.chars().skip(consumed).collect();
        (line, u16::try_from(tail.width()).unwrap_or(u16::MAX))
    }

    pub fn update_scroll_offset(&mut self, buffer: &str, area_width: u16) {
        let total = line_count(buffer, inner_width(area_width));
        if total <= MAX_VISIBLE_LINES {
            self.scroll_offset = 0;
            return;
        }
        let (line, _) = self.line_and_col(buffer, area_width);
        if line < self.scroll_offset {
            self.scroll_offset = line;
        } else if line >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = line + 1 - MAX_VISIBLE_LINES;
        }
    }

    /// Screen position of the cursor inside `area`.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let (line, col) = self.line_and_col(buffer, area.width);
        let visible_line = line.saturating_sub(self.scroll_offset);
        (
            area.x + BORDER_OFFSET + col,
            area.y + BORDER_OFFSET + visible_line,
        )
    }
}
