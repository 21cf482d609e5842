//! Cursor tracking for the input box.
//!
//! The draft itself lives in the core's `InputBuffer`; this only knows a
//! byte offset into it plus the box's internal scroll. Every method takes
//! the current text explicitly, because the core may replace or clear it
//! between two frames.

use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

use super::text_wrap::{
    MAX_VISIBLE_LINES, TEXT_INSET_X, TEXT_INSET_Y, floor_char_boundary, inner_width, row_count,
    wrapped_rows,
};

pub(super) struct CursorState {
    /// Byte offset into the draft, always on a char boundary.
    pub pos: usize,
    /// First wrapped row shown when the draft is taller than the box.
    pub scroll_offset: u16,
    /// Outer width of the box at the last render.
    pub last_width: u16,
}

impl CursorState {
    const DEFAULT_WIDTH: u16 = 80;

    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
            last_width: Self::DEFAULT_WIDTH,
        }
    }

    /// Pull `pos` back inside `text`, e.g. after the core cleared the draft.
    pub fn clamp(&mut self, text: &str) {
        self.pos = floor_char_boundary(text, self.pos);
        if text.is_empty() {
            self.scroll_offset = 0;
        }
    }

    /// Wrapped row (0-based) holding the cursor.
    pub fn row(&self, text: &str, outer_width: u16) -> u16 {
        let width = inner_width(outer_width);
        if width == 0 {
            return 0;
        }
        row_count(&text[..self.pos], width).saturating_sub(1)
    }

    /// Display column of the cursor within its wrapped row.
    ///
    /// Counted from the last newline rather than from the wrapped row,
    /// because wrapping trims the spaces the user just typed.
    pub fn column(&self, text: &str, outer_width: u16) -> u16 {
        let width = inner_width(outer_width);
        let before = &text[..self.pos];
        let logical = before.rfind('\n').map_or(before, |i| &before[i + 1..]);
        if width == 0 || logical.is_empty() {
            return 0;
        }

        let segments = textwrap::wrap(logical, super::text_wrap::wrap_options(width));
        let consumed: usize = segments
            .iter()
            .take(segments.len().saturating_sub(1))
            .map(|s| s.width())
            .sum();
        let column = logical.width().saturating_sub(consumed);
        column.min(usize::from(width)) as u16
    }

    /// Move one wrapped row up (`-1`) or down (`1`), keeping the column
    /// where the target row is long enough. Returns whether it moved.
    pub fn move_vertically(&mut self, text: &str, direction: i16, outer_width: u16) -> bool {
        let width = inner_width(outer_width);
        if width == 0 || text.is_empty() {
            return false;
        }

        let rows = wrapped_rows(text, width);
        // Byte offset where each wrapped row starts. A row is followed by
        // either the newline that ended it or the space wrapping dropped.
        let mut starts = Vec::with_capacity(rows.len());
        let mut offset = 0;
        for row in &rows {
            starts.push(offset.min(text.len()));
            offset += row.len();
            if text[offset.min(text.len())..].starts_with(['\n', ' ']) {
                offset += 1;
            }
        }

        let current = starts
            .iter()
            .rposition(|&start| start <= self.pos)
            .unwrap_or(0);
        let target = match direction {
            d if d < 0 && current > 0 => current - 1,
            d if d > 0 && current + 1 < rows.len() => current + 1,
            _ => return false,
        };

        let column = self.pos - starts[current];
        let target_len = rows[target].len();
        self.pos = floor_char_boundary(text, starts[target] + column.min(target_len));
        true
    }

    /// Scroll the box so the cursor row stays visible.
    pub fn follow(&mut self, text: &str, outer_width: u16) {
        let width = inner_width(outer_width);
        if row_count(text, width) <= MAX_VISIBLE_LINES {
            self.scroll_offset = 0;
            return;
        }
        let row = self.row(text, outer_width);
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = row + 1 - MAX_VISIBLE_LINES;
        }
    }

    /// Terminal cell for the cursor inside a box drawn at `area`.
    pub fn screen_pos(&self, text: &str, area: Rect) -> (u16, u16) {
        let row = self.row(text, area.width).saturating_sub(self.scroll_offset);
        let column = self.column(text, area.width);
        (
            area.x + TEXT_INSET_X + column,
            area.y + TEXT_INSET_Y + row,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // inner width 10
    const WIDTH: u16 = 14;

    fn at(pos: usize) -> CursorState {
        CursorState {
            pos,
            ..CursorState::new()
        }
    }

    #[test]
    fn clamp_after_external_clear() {
        let mut cursor = at(5);
        cursor.scroll_offset = 2;
        cursor.clamp("");
        assert_eq!(cursor.pos, 0);
        assert_eq!(cursor.scroll_offset, 0);
    }

    #[test]
    fn clamp_lands_on_char_boundary() {
        let mut cursor = at(3);
        cursor.clamp("a🔥");
        assert_eq!(cursor.pos, 1);
    }

    #[test]
    fn row_and_column_follow_newlines() {
        let text = "ab\ncd";
        assert_eq!(at(1).row(text, WIDTH), 0);
        assert_eq!(at(1).column(text, WIDTH), 1);
        assert_eq!(at(3).row(text, WIDTH), 1);
        assert_eq!(at(3).column(text, WIDTH), 0);
        assert_eq!(at(5).column(text, WIDTH), 2);
    }

    #[test]
    fn column_keeps_trailing_spaces() {
        assert_eq!(at(3).column("ab ", WIDTH), 3);
    }

    #[test]
    fn column_counts_display_width() {
        // Two wide CJK characters
        let text = "日本";
        assert_eq!(at(text.len()).column(text, WIDTH), 4);
    }

    #[test]
    fn vertical_moves_between_logical_lines() {
        let text = "hello\nhi";
        let mut cursor = at(4);
        assert!(cursor.move_vertically(text, 1, WIDTH));
        // "hi" is shorter: clamp to its end
        assert_eq!(cursor.pos, text.len());
        assert!(cursor.move_vertically(text, -1, WIDTH));
        assert_eq!(cursor.pos, 2);
        assert!(!cursor.move_vertically(text, -1, WIDTH));
    }

    #[test]
    fn vertical_moves_between_wrapped_rows() {
        let text = "aaaa bbbb cccc";
        let mut cursor = at(1);
        assert!(cursor.move_vertically(text, 1, WIDTH));
        // second row "cccc" starts at byte 10
        assert_eq!(cursor.pos, 11);
    }

    #[test]
    fn follow_scrolls_tall_drafts() {
        let text = "1\n2\n3\n4\n5\n6\n7";
        let mut cursor = at(text.len());
        cursor.follow(text, WIDTH);
        assert_eq!(cursor.scroll_offset, 2);

        cursor.pos = 0;
        cursor.follow(text, WIDTH);
        assert_eq!(cursor.scroll_offset, 0);
    }

    #[test]
    fn screen_pos_accounts_for_border_and_padding() {
        let area = Rect::new(0, 10, WIDTH, 4);
        assert_eq!(at(2).screen_pos("ab", area), (4, 11));
    }
}
