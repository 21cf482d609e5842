//! # Welcome View
//!
//! Shown in place of the transcript while it is empty: the configured
//! heading and text, centered, over a slowly pulsing rule.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::tui::component::Component;
use crate::tui::theme::THEME;

const MAX_TEXT_WIDTH: u16 = 60;
const RULE_WIDTH: usize = 24;

pub struct WelcomeView<'a> {
    pub heading: &'a str,
    pub text: &'a str,
    /// 0.0..=1.0, drives the rule's brightness.
    pub pulse: f32,
}

impl Component for WelcomeView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width.min(MAX_TEXT_WIDTH);
        let body = Paragraph::new(self.text)
            .style(THEME.secondary().add_modifier(Modifier::ITALIC))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        let body_height = (body.line_count(width) as u16).max(1);

        let [heading_area, rule_area, _, body_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(body_height),
        ])
        .flex(Flex::Center)
        .areas(area);

        let heading = Line::from(Span::styled(self.heading, THEME.title())).centered();
        frame.render_widget(heading, heading_area);

        let rule_style = if self.pulse > 0.5 {
            Style::default().fg(THEME.accent)
        } else {
            THEME.secondary()
        };
        frame.render_widget(
            Line::from(Span::styled("─".repeat(RULE_WIDTH), rule_style)).centered(),
            rule_area,
        );

        let [body_area] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(body_area);
        frame.render_widget(body, body_area);
    }
}
