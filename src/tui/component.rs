use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// Something that draws itself into a region of the frame.
///
/// Components are built per frame from props (struct fields). Stateful ones
/// wrap a `&mut` to persistent state owned by `TuiState`, which is why
/// `render` takes `&mut self`: layout caches and scroll offsets are updated
/// during the render pass, the way ratatui's `StatefulWidget` works.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that reacts to terminal events.
pub trait EventHandler {
    /// High-level event emitted back to the run loop.
    type Event;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
