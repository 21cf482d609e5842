use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::inference::{Role, Turn};
use crate::tui::component::Component;
use crate::tui::markdown;
use crate::tui::theme::THEME;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// One turn drawn as a bordered bubble titled with its role label.
///
/// Transient: built each frame by `MessageList` for the turns in view.
/// The body is the turn's markdown followed, for cited replies, by a
/// "Sources" footer listing each labelled source.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub turn: &'a Turn,
    pub label: &'a str,
}

impl<'a> Message<'a> {
    pub fn new(turn: &'a Turn, label: &'a str) -> Self {
        Self { turn, label }
    }

    /// Rendered height at `width`, borders included.
    ///
    /// Measured with the same `Paragraph` that `render` draws, so the two
    /// cannot disagree.
    pub fn calculate_height(turn: &Turn, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }
        let lines = body_paragraph(turn).line_count(content_width);
        // Replies come from the service; anything past u16 rows is clipped.
        u16::try_from(lines)
            .unwrap_or(u16::MAX)
            .max(1)
            .saturating_add(VERTICAL_OVERHEAD)
    }
}

/// Markdown body plus the sources footer.
fn body(turn: &Turn) -> Text<'static> {
    let mut text = markdown::render(turn.content.trim(), THEME.role_fg(turn.role));

    let labels = turn.source_labels();
    if !labels.is_empty() {
        let muted = THEME.secondary();
        text.lines.push(Line::default());
        text.lines.push(Line::from(Span::styled(
            "Sources",
            muted.add_modifier(Modifier::BOLD),
        )));
        for label in labels {
            text.lines.push(Line::from(vec![
                Span::styled("› ", muted),
                Span::styled(label.to_string(), muted.add_modifier(Modifier::ITALIC)),
            ]));
        }
    }
    text
}

fn body_paragraph(turn: &Turn) -> Paragraph<'static> {
    Paragraph::new(body(turn)).wrap(Wrap { trim: false })
}

fn bubble<'b>(label: &'b str, border: Style, bg: Option<ratatui::style::Color>) -> Block<'b> {
    let mut block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(border)
        .title(Span::styled(label, border.add_modifier(Modifier::BOLD)))
        .padding(Padding::horizontal(CONTENT_PAD_H));
    if let Some(bg) = bg {
        block = block.style(Style::default().bg(bg));
    }
    block
}

impl Widget for Message<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bg = match self.turn.role {
            Role::User => None,
            Role::Assistant => Some(THEME.surface),
        };
        let block = bubble(self.label, THEME.bubble_border(self.turn.role), bg);
        let inner = block.inner(area);
        block.render(area, buf);
        body_paragraph(self.turn).render(inner, buf);
    }
}

impl Component for Message<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

/// Placeholder bubble shown while a reply is outstanding.
pub struct TypingIndicator<'a> {
    pub label: &'a str,
    pub frame_index: usize,
}

impl TypingIndicator<'_> {
    pub const HEIGHT: u16 = 1 + VERTICAL_OVERHEAD;
    const DOTS: usize = 3;
}

impl Widget for TypingIndicator<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = bubble(
            self.label,
            THEME.bubble_border(Role::Assistant),
            Some(THEME.surface),
        );
        let inner = block.inner(area);
        block.render(area, buf);

        // One bright dot walks left to right
        let lit = (self.frame_index / 3) % Self::DOTS;
        let spans: Vec<Span<'static>> = (0..Self::DOTS)
            .map(|i| {
                let style = if i == lit {
                    Style::default().fg(THEME.accent)
                } else {
                    THEME.secondary()
                };
                Span::styled("● ", style)
            })
            .collect();
        Paragraph::new(Line::from(spans)).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::SourceRef;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use serde_json::json;

    fn screen(width: u16, height: u16, draw: impl FnOnce(&mut Frame)) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(draw).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn single_line_turn_is_three_rows() {
        let turn = Turn::user("Hello");
        assert_eq!(Message::calculate_height(&turn, 80), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn too_narrow_collapses_to_one_row() {
        let turn = Turn::user("Hello");
        assert_eq!(Message::calculate_height(&turn, HORIZONTAL_OVERHEAD), 1);
        assert_eq!(Message::calculate_height(&turn, 0), 1);
    }

    #[test]
    fn long_text_wraps() {
        let turn = Turn::user("one two three four five six");
        // content width 10
        let height = Message::calculate_height(&turn, 10 + HORIZONTAL_OVERHEAD);
        assert!(height >= 3 + VERTICAL_OVERHEAD, "got {height}");
    }

    #[test]
    fn oversized_reply_saturates_height() {
        let turn = Turn::assistant("x\n\n".repeat(40_000), None);
        assert_eq!(Message::calculate_height(&turn, 80), u16::MAX);
    }

    #[test]
    fn sources_footer_adds_rows() {
        let bare = Turn::assistant("Answer", None);
        let cited = Turn::assistant(
            "Answer",
            Some(vec![
                SourceRef(json!({"title": "Handbook"})),
                SourceRef(json!({"metadata": {"source": "faq.md"}})),
            ]),
        );
        // blank + heading + two entries
        assert_eq!(
            Message::calculate_height(&cited, 80),
            Message::calculate_height(&bare, 80) + 4
        );
    }

    #[test]
    fn unlabelled_sources_add_no_footer() {
        let bare = Turn::assistant("Answer", None);
        let opaque = Turn::assistant("Answer", Some(vec![SourceRef(json!({"id": 7}))]));
        assert_eq!(
            Message::calculate_height(&opaque, 80),
            Message::calculate_height(&bare, 80)
        );
    }

    #[test]
    fn renders_label_content_and_sources() {
        let turn = Turn::assistant(
            "The **answer** is 42",
            Some(vec![SourceRef(json!({"url": "https://docs.example"}))]),
        );
        let height = Message::calculate_height(&turn, 60);
        let text = screen(60, height, |f| {
            f.render_widget(Message::new(&turn, "ASSISTANT"), f.area());
        });
        assert!(text.contains("ASSISTANT"));
        assert!(text.contains("answer"));
        assert!(text.contains("Sources"));
        assert!(text.contains("https://docs.example"));
    }

    #[test]
    fn typing_indicator_draws_dots() {
        let text = screen(20, TypingIndicator::HEIGHT, |f| {
            f.render_widget(
                TypingIndicator {
                    label: "ASSISTANT",
                    frame_index: 4,
                },
                f.area(),
            );
        });
        assert!(text.contains("ASSISTANT"));
        assert_eq!(text.matches('●').count(), 3);
    }
}
