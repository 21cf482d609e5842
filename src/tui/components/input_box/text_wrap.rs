//! Wrapping helpers and box dimensions for the input box.
//!
//! Stateless; shared by the renderer and `CursorState`.

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// The box grows with its content up to this many lines, then scrolls.
pub(super) const MAX_VISIBLE_LINES: u16 = 5;
/// Border (1) + left padding (1) before the first text column
pub(super) const TEXT_INSET_X: u16 = 2;
/// Top border before the first text row
pub(super) const TEXT_INSET_Y: u16 = 1;

/// Options matching how the box lays out its text.
pub(super) fn wrap_options(width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(usize::from(width))
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Text columns available inside a box of `outer_width`. Zero when too narrow.
pub(super) fn inner_width(outer_width: u16) -> u16 {
    outer_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Wrapped rows of `text` at `width`, one per visual line.
///
/// A trailing newline yields an empty last row so the cursor has somewhere
/// to sit.
pub(super) fn wrapped_rows(text: &str, width: u16) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }
    let mut rows: Vec<String> = textwrap::wrap(text, wrap_options(width))
        .into_iter()
        .map(|row| row.into_owned())
        .collect();
    if rows.is_empty() {
        rows.push(String::new());
    }
    if text.ends_with('\n') && rows.last().is_some_and(|r| !r.is_empty()) {
        rows.push(String::new());
    }
    rows
}

/// Number of wrapped rows; never less than one.
pub(super) fn row_count(text: &str, width: u16) -> u16 {
    wrapped_rows(text, width).len().min(usize::from(u16::MAX)) as u16
}

/// Byte offset of the character before `pos`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte offset of the character after the one at `pos`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}

/// Largest char boundary not past `pos`.
pub(super) fn floor_char_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}
