//! Markdown → ratatui `Text`.
//!
//! Walks `pulldown_cmark` events and emits styled lines: headings, emphasis,
//! inline and fenced code (fenced code is highlighted with syntect when the
//! language is known), ordered and unordered lists, blockquotes, links,
//! simple tables and image alt text.
//!
//! Raw HTML, both block and inline, is dropped. Turn content comes from the
//! network and is never interpreted as markup beyond CommonMark.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::tui::theme::THEME;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const CODE_THEME: &str = "base16-ocean.dark";
const RULE_WIDTH: usize = 32;

/// Render markdown `content` with `base_fg` as the body color.
pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);
    opts.insert(Options::ENABLE_TABLES);

    let mut renderer = Renderer::new(base_fg);
    for event in Parser::new_ext(content, opts) {
        renderer.event(event);
    }
    renderer.finish()
}

enum CodeMode {
    None,
    Plain,
    Highlighted(Box<HighlightLines<'static>>),
}

struct Renderer {
    lines: Vec<Line<'static>>,
    base_fg: Color,
    /// Inline style stack; each entry is already patched onto its parent.
    styles: Vec<Style>,
    /// Prefixes repeated on every line (blockquote and code gutters).
    gutters: Vec<Span<'static>>,
    /// One entry per open list: `None` bullets, `Some(n)` numbers.
    lists: Vec<Option<u64>>,
    code: CodeMode,
    link: Option<String>,
    /// Cells of the table row being collected.
    row: Option<Vec<String>>,
    pending_gap: bool,
}

impl Renderer {
    fn new(base_fg: Color) -> Self {
        Self {
            lines: Vec::new(),
            base_fg,
            styles: Vec::new(),
            gutters: Vec::new(),
            lists: Vec::new(),
            code: CodeMode::None,
            link: None,
            row: None,
            pending_gap: false,
        }
    }

    fn finish(self) -> Text<'static> {
        Text::from(self.lines)
    }

    fn current_style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.base_fg))
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.current_style().patch(overlay));
    }

    fn new_line(&mut self, spans: Vec<Span<'static>>) {
        let mut all = self.gutters.clone();
        all.extend(spans);
        self.lines.push(Line::from(all));
    }

    fn append(&mut self, span: Span<'static>) {
        match self.lines.last_mut() {
            Some(line) => line.push_span(span),
            None => self.new_line(vec![span]),
        }
    }

    /// Separate a new block from the previous one with an empty line.
    fn gap(&mut self) {
        if self.pending_gap {
            self.new_line(Vec::new());
            self.pending_gap = false;
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(text),
            Event::Code(code) => self.append(Span::styled(
                code.into_string(),
                Style::default().fg(THEME.code_fg).bg(THEME.code_bg),
            )),
            Event::SoftBreak => self.append(Span::raw(" ")),
            Event::HardBreak => self.new_line(Vec::new()),
            Event::Rule => {
                self.gap();
                self.new_line(vec![Span::styled("─".repeat(RULE_WIDTH), THEME.secondary())]);
                self.pending_gap = true;
            }
            Event::TaskListMarker(done) => {
                self.append(Span::raw(if done { "[x] " } else { "[ ] " }))
            }
            Event::Html(_) | Event::InlineHtml(_) => {}
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.gap();
                self.new_line(Vec::new());
            }
            Tag::Heading { level, .. } => {
                self.gap();
                let style = heading_style(self.base_fg, level);
                self.new_line(Vec::new());
                self.styles.push(style);
            }
            Tag::BlockQuote(_) => {
                self.gap();
                self.gutters.push(Span::styled("▎ ", THEME.secondary()));
                self.push_style(Style::default().add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(kind) => self.start_code(kind),
            Tag::List(first) => {
                if self.lists.is_empty() {
                    self.gap();
                }
                self.lists.push(first);
            }
            Tag::Item => {
                self.new_line(Vec::new());
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    Some(None) => format!("{indent}• "),
                    None => String::new(),
                };
                self.append(Span::styled(marker, THEME.secondary()));
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link = Some(dest_url.into_string());
                self.push_style(
                    Style::default()
                        .fg(THEME.link)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            Tag::Image { .. } => {
                self.append(Span::styled("[image: ", THEME.secondary()));
            }
            Tag::Table(_) => self.gap(),
            Tag::TableHead | Tag::TableRow => self.row = Some(Vec::new()),
            Tag::TableCell => {
                if let Some(row) = self.row.as_mut() {
                    row.push(String::new());
                }
            }
            _ => {}
        }
    }

    fn start_code(&mut self, kind: CodeBlockKind<'_>) {
        self.gap();
        let lang = match &kind {
            CodeBlockKind::Fenced(lang) => lang.split_whitespace().next().unwrap_or(""),
            CodeBlockKind::Indented => "",
        };
        let border = THEME.secondary();
        let mut top = vec![Span::styled("┌─", border)];
        if !lang.is_empty() {
            top.push(Span::styled(format!(" {lang} "), border.add_modifier(Modifier::BOLD)));
        }
        self.new_line(top);
        self.gutters.push(Span::styled("│ ", border));

        self.code = match SYNTAX_SET.find_syntax_by_token(lang) {
            Some(syntax) if !lang.is_empty() => match THEME_SET.themes.get(CODE_THEME) {
                Some(theme) => CodeMode::Highlighted(Box::new(HighlightLines::new(syntax, theme))),
                None => CodeMode::Plain,
            },
            _ => CodeMode::Plain,
        };
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.pending_gap = true,
            TagEnd::Heading(_) => {
                self.styles.pop();
                self.pending_gap = true;
            }
            TagEnd::BlockQuote(_) => {
                self.gutters.pop();
                self.styles.pop();
                self.pending_gap = true;
            }
            TagEnd::CodeBlock => {
                self.code = CodeMode::None;
                self.gutters.pop();
                self.new_line(vec![Span::styled("└─", THEME.secondary())]);
                self.pending_gap = true;
            }
            TagEnd::List(_) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.pending_gap = true;
                }
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            TagEnd::Link => {
                self.styles.pop();
                if let Some(url) = self.link.take() {
                    self.append(Span::styled(format!(" <{url}>"), THEME.secondary()));
                }
            }
            TagEnd::Image => self.append(Span::styled("]", THEME.secondary())),
            TagEnd::TableHead | TagEnd::TableRow => {
                if let Some(cells) = self.row.take() {
                    let header = matches!(tag, TagEnd::TableHead);
                    let mut style = self.current_style();
                    if header {
                        style = style.add_modifier(Modifier::BOLD);
                    }
                    self.new_line(vec![Span::styled(cells.join(" │ "), style)]);
                }
            }
            TagEnd::Table => self.pending_gap = true,
            _ => {}
        }
    }

    fn text(&mut self, text: CowStr<'_>) {
        // ratatui draws '\t' as zero width
        let text = text.replace('\t', "    ");

        if let Some(cell) = self.row.as_mut().and_then(|row| row.last_mut()) {
            cell.push_str(&text);
            return;
        }

        match &mut self.code {
            CodeMode::Highlighted(highlighter) => {
                let mut rendered = Vec::new();
                for line in LinesWithEndings::from(&text) {
                    let spans: Vec<Span<'static>> = match highlighter.highlight_line(line, &SYNTAX_SET) {
                        Ok(ranges) => ranges
                            .into_iter()
                            .map(|(style, fragment)| {
                                let fg = Color::Rgb(
                                    style.foreground.r,
                                    style.foreground.g,
                                    style.foreground.b,
                                );
                                Span::styled(
                                    fragment.trim_end_matches('\n').to_string(),
                                    Style::default().fg(fg),
                                )
                            })
                            .filter(|span| !span.content.is_empty())
                            .collect(),
                        Err(_) => vec![Span::raw(line.trim_end_matches('\n').to_string())],
                    };
                    rendered.push(spans);
                }
                for spans in rendered {
                    self.new_line(spans);
                }
            }
            CodeMode::Plain => {
                let style = Style::default().fg(THEME.code_fg);
                for line in text.lines() {
                    self.new_line(vec![Span::styled(line.to_string(), style)]);
                }
            }
            CodeMode::None => {
                let style = self.current_style();
                self.append(Span::styled(text, style));
            }
        }
    }
}

fn heading_style(base_fg: Color, level: HeadingLevel) -> Style {
    let style = Style::default().fg(base_fg).add_modifier(Modifier::BOLD);
    match level {
        HeadingLevel::H1 => style.fg(THEME.accent).add_modifier(Modifier::UNDERLINED),
        HeadingLevel::H2 => style.fg(THEME.accent),
        _ => style,
    }
}
