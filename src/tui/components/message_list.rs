//! # MessageList Component
//!
//! Scrollable view of the transcript.
//!
//! ## Responsibilities
//!
//! - Lay out one bubble per turn, plus the typing indicator while waiting
//! - Cache bubble heights (turns never change once appended)
//! - Own the scroll position and glide it toward the bottom when asked
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and a transcript snapshot
//! (props). `MessageListState` is the transcript's [`ScrollOwner`]:
//! `AutoScroll` calls `scroll_to_end()` on it and the next frames glide the
//! offset down instead of jumping.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::scroll::ScrollOwner;
use crate::inference::{Role, Turn};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::{Message, TypingIndicator};
use crate::tui::event::TuiEvent;

/// Rows per frame the glide covers at most.
const GLIDE_MAX_STEP: u16 = 6;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// Follow the bottom of the transcript. Set by `scroll_to_end`, cleared
    /// when the user scrolls up.
    pub stick_to_bottom: bool,
    /// Still moving toward the bottom (drives the redraw rate).
    pub gliding: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Content height of the last frame, typing indicator included.
    pub canvas_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            gliding: false,
            viewport_height: 0,
            canvas_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.canvas_height.saturating_sub(self.viewport_height)
    }

    /// True when part of the transcript lies below the viewport.
    pub fn has_unseen_content(&self) -> bool {
        self.scroll_state.offset().y < self.max_offset()
    }

    /// Advance the glide by one frame. Covers half the remaining distance,
    /// at least one row and at most `GLIDE_MAX_STEP`.
    fn glide(&mut self) {
        let target = self.max_offset();
        let current = self.scroll_state.offset().y;
        let next = if current < target {
            let step = ((target - current) / 2).clamp(1, GLIDE_MAX_STEP);
            current + step
        } else {
            target
        };
        self.scroll_state.set_offset(Position { x: 0, y: next });
        self.gliding = next != target;
    }

    /// Keep the offset inside the content.
    fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-pin when a downward scroll reaches the end.
    fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        if self.scroll_state.offset().y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position { x: 0, y: max_y });
        }
    }
}

impl ScrollOwner for MessageListState {
    fn scroll_to_end(&mut self) {
        self.stick_to_bottom = true;
        self.gliding = true;
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub turns: &'a [Turn],
    pub user_label: &'a str,
    pub assistant_label: &'a str,
    pub is_loading: bool,
    pub frame_index: usize,
}

impl MessageList<'_> {
    fn label(&self, role: Role) -> &str {
        match role {
            Role::User => self.user_label,
            Role::Assistant => self.assistant_label,
        }
    }
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // scrollbar column

        // 1. Measure only what the cache doesn't already know
        self.state.layout.measure(self.turns, content_width);

        let indicator_height = if self.is_loading {
            TypingIndicator::HEIGHT
        } else {
            0
        };
        let total_height = self.state.layout.total();
        self.state.canvas_height = total_height.saturating_add(indicator_height);
        self.state.viewport_height = area.height;

        // 2. Position the viewport
        if self.state.stick_to_bottom {
            self.state.glide();
        } else {
            self.state.gliding = false;
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Draw visible bubbles into the scroll canvas
        let mut scroll_view = ScrollView::new(Size::new(content_width, self.state.canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y = self.state.layout.top_of(visible.start);
        for i in visible {
            let height = self.state.layout.heights[i];
            let turn = &self.turns[i];
            let message = Message::new(turn, self.label(turn.role));
            scroll_view.render_widget(message, Rect::new(0, y, content_width, height));
            y = y.saturating_add(height);
        }

        if self.is_loading {
            let indicator = TypingIndicator {
                label: self.assistant_label,
                frame_index: self.frame_index,
            };
            scroll_view.render_widget(
                indicator,
                Rect::new(0, total_height, content_width, indicator_height),
            );
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// EventHandler lives on `MessageListState` because scrolling mutates
/// persistent state; `MessageList` is rebuilt every frame.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
                self.gliding = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
                self.gliding = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => self.scroll_to_end(),
            _ => {}
        }
        None
    }
}

/// Cached bubble heights.
///
/// Turns are immutable and the transcript only grows, so cached heights
/// stay valid until the width changes or the transcript shrinks (a new
/// session).
#[derive(Default)]
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    content_width: u16,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many cached heights can be kept for `turn_count` turns at `width`.
    pub fn reusable_count(&self, turn_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width || turn_count < self.heights.len() {
            0
        } else {
            self.heights.len()
        }
    }

    /// Bring the cache up to date with `turns`.
    pub fn measure(&mut self, turns: &[Turn], content_width: u16) {
        let reusable = self.reusable_count(turns.len(), content_width);
        if reusable == turns.len() && self.prefix_heights.len() == reusable {
            return;
        }
        self.heights.truncate(reusable);
        for turn in &turns[reusable..] {
            self.heights.push(Message::calculate_height(turn, content_width));
        }
        self.content_width = content_width;
        self.rebuild_prefix_heights();
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Canvas row where item `index` starts.
    pub fn top_of(&self, index: usize) -> u16 {
        match index {
            0 => 0,
            i => self.prefix_heights.get(i - 1).copied().unwrap_or_else(|| self.total()),
        }
    }

    /// Items intersecting the viewport, padded by half a viewport each way.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end.max(start)
    }
}
