//! # History Sidebar Component
//!
//! Collapsible list of past questions, newest first. Each row is labeled with
//! the start of the question; an expanded row shows the time, the full
//! question and the View / Delete controls.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `HistorySidebarState` lives in `TuiState`
//! - `HistorySidebar` is created each frame with borrowed state and the
//!   history as a prop
//!
//! Rows are keyed by display index, so expansion is reset whenever the
//! number of entries changes.

use std::collections::HashSet;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, List, ListItem, ListState, Padding, Paragraph};

use crate::core::history::{HistoryEntry, display_order, question_label};
use crate::tui::component::EventHandler;
use crate::tui::event::TuiEvent;

/// Persistent state for the sidebar.
pub struct HistorySidebarState {
    pub selected: usize,
    pub expanded: HashSet<usize>,
    pub list_state: ListState,
    /// Number of entries at last sync (Prop)
    len: usize,
    /// Whether keystrokes go here (Prop)
    pub focused: bool,
}

/// Events emitted by the sidebar, carrying newest-first display indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarEvent {
    View(usize),
    Delete(usize),
}

impl HistorySidebarState {
    pub fn new(len: usize) -> Self {
        let mut state = Self {
            selected: 0,
            expanded: HashSet::new(),
            list_state: ListState::default(),
            len,
            focused: false,
        };
        state.clamp_selection();
        state
    }

    /// Track the history length; a change invalidates row expansion.
    ///
    /// New entries land at display index 0, so growth shifts the selection
    /// down to keep the same entry highlighted.
    pub fn sync_len(&mut self, len: usize) {
        if len != self.len {
            self.expanded.clear();
            if len > self.len && self.len > 0 {
                self.selected += len - self.len;
            }
            self.len = len;
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.len;
        if len == 0 {
            self.selected = 0;
            self.list_state.select(None);
        } else {
            self.selected = self.selected.min(len - 1);
            self.list_state.select(Some(self.selected));
        }
    }

    pub fn is_expanded(&self, display_index: usize) -> bool {
        self.expanded.contains(&display_index)
    }

    fn select(&mut self, index: usize) {
        self.selected = index;
        self.list_state.select(Some(index));
    }
}

impl EventHandler for HistorySidebarState {
    type Event = SidebarEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<SidebarEvent> {
        if self.len == 0 {
            return None;
        }
        match event {
            TuiEvent::CursorUp => {
                self.select(self.selected.saturating_sub(1));
                None
            }
            TuiEvent::CursorDown => {
                self.select((self.selected + 1).min(self.len - 1));
                None
            }
            TuiEvent::InputChar(' ') => {
                if !self.expanded.remove(&self.selected) {
                    self.expanded.insert(self.selected);
                }
                None
            }
            TuiEvent::CursorRight => {
                self.expanded.insert(self.selected);
                None
            }
            TuiEvent::CursorLeft => {
                self.expanded.remove(&self.selected);
                None
            }
            TuiEvent::Submit | TuiEvent::InputChar('v') => Some(SidebarEvent::View(self.selected)),
            TuiEvent::InputChar('d') => Some(SidebarEvent::Delete(self.selected)),
            _ => None,
        }
    }
}

/// Transient render wrapper for the sidebar.
pub struct HistorySidebar<'a> {
    state: &'a mut HistorySidebarState,
    history: &'a [HistoryEntry],
}

impl<'a> HistorySidebar<'a> {
    pub fn new(state: &'a mut HistorySidebarState, history: &'a [HistoryEntry]) -> Self {
        Self { state, history }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.state.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let help = if self.state.focused {
            " ␣ expand  v view  d delete "
        } else {
            " Tab to browse "
        };
        let block = Block::bordered()
            .border_style(border_style)
            .title(" 📜 Chat History ")
            .title_bottom(Line::from(help).centered())
            .padding(Padding::horizontal(1));

        if self.history.is_empty() {
            let empty = Paragraph::new("No questions yet.")
                .style(Style::default().fg(Color::DarkGray))
                .centered()
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        // borders + padding
        let inner_width = area.width.saturating_sub(4) as usize;

        let items: Vec<ListItem> = display_order(self.history)
            .map(|(i, entry)| {
                let expanded = self.state.is_expanded(i);
                row(entry, expanded, i == self.state.selected && self.state.focused, inner_width)
            })
            .collect();

        let list = List::new(items).block(block);
        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}

fn row(entry: &HistoryEntry, expanded: bool, highlighted: bool, width: usize) -> ListItem<'static> {
    let marker = if expanded { "▾ " } else { "▸ " };
    let label_style = if highlighted {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(Color::Gray)
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(marker, label_style),
        Span::styled(format!("💭 {}", question_label(&entry.question)), label_style),
    ])];

    if expanded {
        let dim = Style::default().fg(Color::DarkGray);
        let indent = "  ";
        lines.push(Line::from(vec![
            Span::styled(format!("{indent}Time: "), dim.add_modifier(Modifier::BOLD)),
            Span::styled(entry.display_timestamp().to_string(), dim),
        ]));
        lines.push(Line::from(Span::styled(
            format!("{indent}Question:"),
            dim.add_modifier(Modifier::BOLD),
        )));
        let wrap_width = width.saturating_sub(indent.len()).max(1);
        for line in textwrap::wrap(&entry.question, wrap_width) {
            lines.push(Line::from(format!("{indent}{line}")));
        }
        lines.push(Line::from(vec![
            Span::raw(indent),
            Span::styled("[v] View", Style::default().fg(Color::Green)),
            Span::raw("   "),
            Span::styled("[d] Delete", Style::default().fg(Color::Red)),
        ]));
    }

    ListItem::new(Text::from(lines))
}
