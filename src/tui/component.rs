use ratatui::Frame;
use ratatui::layout::Rect;

use crate::tui::event::TuiEvent;

/// Something that draws itself into a `Rect`.
///
/// Props arrive as struct fields; persistent presentation state is borrowed
/// from `TuiState`. `render` takes `&mut self` because scroll offsets are
/// settled during the draw.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Turns raw `TuiEvent`s into component-level events.
pub trait EventHandler {
    type Event;

    /// `None` when the event was absorbed or ignored.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
