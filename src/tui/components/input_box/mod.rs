//! # InputBox Component
//!
//! The draft editor at the bottom of the screen.
//!
//! ## Responsibilities
//!
//! - Insert typed and pasted text at the cursor
//! - Edit (backspace, delete) and move the cursor (arrows, Home/End)
//! - Report Enter as a submit request
//! - Grow with the draft up to five lines, then scroll internally
//!
//! ## State Management
//!
//! The text is the core's `InputBuffer`; every edit goes through
//! `InputBuffer::update`. The box only owns presentation state
//! (`InputBoxState`: cursor and scroll). Whether a submit is accepted, and
//! clearing the draft afterwards, is the core's decision, so the cursor is
//! re-clamped against whatever text the core left behind.

mod cursor;
mod text_wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::core::input::InputBuffer;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme::THEME;

use cursor::CursorState;
use text_wrap::{
    MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, inner_width, next_char_boundary, prev_char_boundary,
    row_count, wrapped_rows,
};

/// High-level events emitted by the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Enter pressed; the core decides whether the draft goes out.
    Submit,
    /// Text or cursor changed.
    Edited,
}

/// Presentation state of the input box. Lives in `TuiState`.
pub struct InputBoxState {
    cursor: CursorState,
}

impl Default for InputBoxState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBoxState {
    pub fn new() -> Self {
        Self {
            cursor: CursorState::new(),
        }
    }

    /// Height of the box for `draft` at `width`, borders included.
    pub fn calculate_height(draft: &InputBuffer, width: u16) -> u16 {
        let rows = row_count(draft.text(), inner_width(width));
        rows.min(MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    /// Byte offset of the cursor in the draft.
    pub fn cursor_pos(&self) -> usize {
        self.cursor.pos
    }
}

/// Transient editor: applies one event to the draft.
pub struct DraftEditor<'a> {
    pub state: &'a mut InputBoxState,
    pub draft: &'a mut InputBuffer,
}

impl DraftEditor<'_> {
    fn splice(&mut self, range: std::ops::Range<usize>, insert: &str) {
        let mut text = self.draft.text().to_string();
        text.replace_range(range.clone(), insert);
        self.state.cursor.pos = range.start + insert.len();
        self.draft.update(text);
    }
}

impl EventHandler for DraftEditor<'_> {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        self.state.cursor.clamp(self.draft.text());
        let pos = self.state.cursor.pos;
        let len = self.draft.len();

        match event {
            TuiEvent::InputChar(c) => {
                self.splice(pos..pos, c.encode_utf8(&mut [0; 4]));
                Some(InputEvent::Edited)
            }
            TuiEvent::Paste(pasted) => {
                // Terminals send CRLF or bare CR for pasted line breaks
                let pasted = pasted.replace("\r\n", "\n").replace('\r', "\n");
                self.splice(pos..pos, &pasted);
                Some(InputEvent::Edited)
            }
            TuiEvent::Backspace if pos > 0 => {
                let prev = prev_char_boundary(self.draft.text(), pos);
                self.splice(prev..pos, "");
                Some(InputEvent::Edited)
            }
            TuiEvent::Delete if pos < len => {
                let next = next_char_boundary(self.draft.text(), pos);
                self.splice(pos..next, "");
                Some(InputEvent::Edited)
            }
            TuiEvent::CursorLeft if pos > 0 => {
                self.state.cursor.pos = prev_char_boundary(self.draft.text(), pos);
                Some(InputEvent::Edited)
            }
            TuiEvent::CursorRight if pos < len => {
                self.state.cursor.pos = next_char_boundary(self.draft.text(), pos);
                Some(InputEvent::Edited)
            }
            TuiEvent::CursorHome => {
                let text = self.draft.text();
                let line_start = text[..pos].rfind('\n').map_or(0, |i| i + 1);
                (pos != line_start).then(|| {
                    self.state.cursor.pos = line_start;
                    InputEvent::Edited
                })
            }
            TuiEvent::CursorEnd => {
                let text = self.draft.text();
                let line_end = text[pos..].find('\n').map_or(len, |i| pos + i);
                (pos != line_end).then(|| {
                    self.state.cursor.pos = line_end;
                    InputEvent::Edited
                })
            }
            TuiEvent::CursorUp | TuiEvent::CursorDown => {
                let direction = if matches!(event, TuiEvent::CursorUp) { -1 } else { 1 };
                let width = self.state.cursor.last_width;
                self.state
                    .cursor
                    .move_vertically(self.draft.text(), direction, width)
                    .then_some(InputEvent::Edited)
            }
            TuiEvent::Submit => Some(InputEvent::Submit),
            _ => None,
        }
    }
}

/// Renders the draft. Props come from `App`; state from `TuiState`.
pub struct InputBox<'a> {
    pub state: &'a mut InputBoxState,
    pub draft: &'a InputBuffer,
    pub placeholder: &'a str,
    /// A reply is outstanding; the draft is editable but won't submit.
    pub waiting: bool,
}

impl InputBox<'_> {
    fn visible_text(&self, width: u16) -> String {
        let rows = wrapped_rows(self.draft.text(), inner_width(width));
        let start = usize::from(self.state.cursor.scroll_offset).min(rows.len());
        let end = (start + usize::from(MAX_VISIBLE_LINES)).min(rows.len());
        rows[start..end].join("\n")
    }

    fn render_scrollbar(&self, frame: &mut Frame, area: Rect) {
        use ratatui::widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState};

        let total = row_count(self.draft.text(), inner_width(area.width));
        if total <= MAX_VISIBLE_LINES {
            return;
        }
        // content_length is the max scroll position, not the row count
        let mut scrollbar_state = ScrollbarState::default()
            .content_length(usize::from(total - MAX_VISIBLE_LINES))
            .position(usize::from(self.state.cursor.scroll_offset));
        let scrollbar_area = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            scrollbar_area,
            &mut scrollbar_state,
        );
    }
}

impl Component for InputBox<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let text = self.draft.text();
        self.state.cursor.clamp(text);
        self.state.cursor.last_width = area.width;
        self.state.cursor.follow(text, area.width);

        let border = if self.waiting {
            THEME.secondary()
        } else {
            Style::default().fg(THEME.accent)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border)
            .padding(Padding::horizontal(1));

        let paragraph = if self.draft.is_empty() {
            Paragraph::new(self.placeholder)
                .style(THEME.secondary().add_modifier(Modifier::ITALIC))
        } else {
            Paragraph::new(self.visible_text(area.width))
                .style(Style::default().fg(THEME.user_fg))
        };

        frame.render_widget(paragraph.block(block), area);
        self.render_scrollbar(frame, area);

        let (x, y) = self.state.cursor.screen_pos(text, area);
        frame.set_cursor_position((x, y));
    }
}
