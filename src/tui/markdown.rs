//! Markdown → ratatui `Text` for model answers.
//!
//! Answers are mostly prose with fenced Python snippets, so this covers
//! headings, emphasis, inline code, lists, block quotes, rules, links and
//! code blocks. Code blocks are highlighted with syntect; a fence without a
//! language tag is highlighted as Python.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEMES: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const CODE_THEME: &str = "base16-ocean.dark";
const DEFAULT_CODE_LANG: &str = "python";

/// Render `source` as styled text. Plain text uses `base_fg`.
pub fn render(source: &str, base_fg: Color) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);

    let mut r = Renderer::new(base_fg);
    for event in Parser::new_ext(source, opts) {
        r.event(event);
    }
    r.out
}

struct CodeBlock {
    highlighter: Option<HighlightLines<'static>>,
}

struct Renderer {
    out: Text<'static>,
    base: Style,
    /// Inline styles; each entry is already composed with its parent.
    inline: Vec<Style>,
    /// Prefix spans repeated on every line (block quote bars, code gutters).
    gutters: Vec<Span<'static>>,
    /// One entry per open list: `None` bullets, `Some(n)` next ordinal.
    lists: Vec<Option<u64>>,
    code: Option<CodeBlock>,
    pending_link: Option<String>,
    /// A block just ended; the next block gets a blank separator line.
    separate: bool,
}

impl Renderer {
    fn new(base_fg: Color) -> Self {
        Self {
            out: Text::default(),
            base: Style::default().fg(base_fg),
            inline: Vec::new(),
            gutters: Vec::new(),
            lists: Vec::new(),
            code: None,
            pending_link: None,
            separate: false,
        }
    }

    fn current(&self) -> Style {
        self.inline.last().copied().unwrap_or(self.base)
    }

    fn push_inline(&mut self, style: Style) {
        let composed = self.current().patch(style);
        self.inline.push(composed);
    }

    fn new_line(&mut self, spans: Vec<Span<'static>>) {
        let mut all = self.gutters.clone();
        all.extend(spans);
        self.out.lines.push(Line::from(all));
    }

    fn append(&mut self, span: Span<'static>) {
        match self.out.lines.last_mut() {
            Some(line) => line.push_span(span),
            None => self.new_line(vec![span]),
        }
    }

    fn start_block(&mut self) {
        if self.separate {
            self.new_line(Vec::new());
            self.separate = false;
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.append(Span::styled(
                code.to_string(),
                Style::default().fg(Color::Yellow).bg(Color::Black),
            )),
            Event::SoftBreak => self.append(Span::raw(" ")),
            Event::HardBreak => self.new_line(Vec::new()),
            Event::Rule => {
                self.start_block();
                self.new_line(vec![Span::styled(
                    "─".repeat(40),
                    Style::default().fg(Color::DarkGray),
                )]);
                self.separate = true;
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.start_block();
                if self.lists.is_empty() {
                    self.new_line(Vec::new());
                }
            }
            Tag::Heading { level, .. } => {
                self.start_block();
                let style = heading_style(self.base, level);
                self.new_line(Vec::new());
                self.push_inline(style);
            }
            Tag::BlockQuote(_) => {
                self.start_block();
                self.gutters
                    .push(Span::styled("▎ ", Style::default().fg(Color::DarkGray)));
                self.push_inline(Style::default().add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(kind) => {
                self.start_block();
                let lang = match &kind {
                    CodeBlockKind::Fenced(info) => info.split_whitespace().next().unwrap_or(""),
                    CodeBlockKind::Indented => "",
                };
                let lang = if lang.is_empty() { DEFAULT_CODE_LANG } else { lang };
                let frame = Style::default().fg(Color::DarkGray);
                self.new_line(vec![Span::styled(format!("┌─ {lang}"), frame)]);
                self.gutters.push(Span::styled("│ ", frame));
                let highlighter = SYNTAXES
                    .find_syntax_by_token(lang)
                    .and_then(|syntax| {
                        THEMES
                            .themes
                            .get(CODE_THEME)
                            .map(|theme| HighlightLines::new(syntax, theme))
                    });
                self.code = Some(CodeBlock { highlighter });
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.start_block();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                let depth = self.lists.len().saturating_sub(1);
                let bullet = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let label = format!("{n}. ");
                        *n += 1;
                        label
                    }
                    _ => "• ".to_string(),
                };
                self.new_line(vec![Span::styled(
                    format!("{}{bullet}", "  ".repeat(depth)),
                    Style::default().fg(Color::DarkGray),
                )]);
            }
            Tag::Emphasis => self.push_inline(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_inline(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_inline(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.pending_link = Some(dest_url.to_string());
                self.push_inline(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.separate = self.lists.is_empty(),
            TagEnd::Heading(_) => {
                self.inline.pop();
                self.separate = true;
            }
            TagEnd::BlockQuote(_) => {
                self.gutters.pop();
                self.inline.pop();
                self.separate = true;
            }
            TagEnd::CodeBlock => {
                self.code = None;
                self.gutters.pop();
                self.new_line(vec![Span::styled("└─", Style::default().fg(Color::DarkGray))]);
                self.separate = true;
            }
            TagEnd::List(_) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.separate = true;
                }
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.inline.pop();
            }
            TagEnd::Link => {
                self.inline.pop();
                if let Some(url) = self.pending_link.take() {
                    self.append(Span::styled(
                        format!(" <{url}>"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        // ratatui renders tabs as zero-width
        let text = text.replace('\t', "    ");

        if let Some(mut block) = self.code.take() {
            self.code_text(&mut block, &text);
            self.code = Some(block);
            return;
        }

        let style = self.current();
        self.append(Span::styled(text, style));
    }

    fn code_text(&mut self, block: &mut CodeBlock, text: &str) {
        let Some(highlighter) = block.highlighter.as_mut() else {
            for line in text.lines() {
                self.new_line(vec![Span::styled(
                    line.to_string(),
                    Style::default().fg(Color::White),
                )]);
            }
            return;
        };
        for line in LinesWithEndings::from(text) {
            let spans = match highlighter.highlight_line(line, &SYNTAXES) {
                Ok(ranges) => ranges
                    .into_iter()
                    .map(|(style, piece)| {
                        let fg = Color::Rgb(style.foreground.r, style.foreground.g, style.foreground.b);
                        Span::styled(piece.trim_end_matches('\n').to_string(), Style::default().fg(fg))
                    })
                    .filter(|span| !span.content.is_empty())
                    .collect(),
                Err(_) => vec![Span::raw(line.trim_end_matches('\n').to_string())],
            };
            self.new_line(spans);
        }
    }
}

fn heading_style(base: Style, level: HeadingLevel) -> Style {
    let style = base.add_modifier(Modifier::BOLD);
    match level {
        HeadingLevel::H1 => style.add_modifier(Modifier::UNDERLINED),
        HeadingLevel::H2 => style,
        _ => style.add_modifier(Modifier::ITALIC),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &Text) -> Vec<String> {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn plain_text_uses_base_color() {
        let text = render("hello", Color::Green);
        assert_eq!(text.lines[0].spans[0].style.fg, Some(Color::Green));
    }

    #[test]
    fn heading_text_is_bold() {
        let text = render("## Install", Color::White);
        let span = text.lines[0]
            .spans
            .iter()
            .find(|s| s.content == "Install")
            .unwrap();
        assert!(span.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn nested_bold_italic_composes() {
        let text = render("***both***", Color::White);
        let span = text.lines[0]
            .spans
            .iter()
            .find(|s| s.content == "both")
            .unwrap();
        assert!(span.style.add_modifier.contains(Modifier::BOLD));
        assert!(span.style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn inline_code_is_highlighted() {
        let text = render("call `len(x)` here", Color::White);
        let span = text.lines[0]
            .spans
            .iter()
            .find(|s| s.content == "len(x)")
            .unwrap();
        assert_eq!(span.style.fg, Some(Color::Yellow));
    }

    #[test]
    fn untagged_code_block_is_framed_as_python() {
        let lines = plain(&render("```\nx = 1\ny = 2\n```", Color::White));
        assert_eq!(lines[0], "┌─ python");
        assert!(lines[1].starts_with("│ ") && lines[1].contains("x = 1"));
        assert!(lines[2].starts_with("│ ") && lines[2].contains("y = 2"));
        assert_eq!(lines.last().unwrap(), "└─");
    }

    #[test]
    fn unknown_language_falls_back_to_plain() {
        let lines = plain(&render("```nosuchlang\nabc\n```", Color::White));
        assert_eq!(lines[0], "┌─ nosuchlang");
        assert_eq!(lines[1], "│ abc");
    }

    #[test]
    fn ordered_list_numbers_items() {
        let lines = plain(&render("1. one\n2. two", Color::White));
        assert!(lines.iter().any(|l| l == "1. one"));
        assert!(lines.iter().any(|l| l == "2. two"));
    }

    #[test]
    fn paragraphs_are_separated_by_blank_line() {
        let lines = plain(&render("first\n\nsecond", Color::White));
        assert_eq!(lines, vec!["first", "", "second"]);
    }

    #[test]
    fn tabs_become_spaces() {
        let lines = plain(&render("```text\n\tindented\n```", Color::White));
        assert!(lines.iter().all(|l| !l.contains('\t')));
        assert!(lines.iter().any(|l| l.contains("    indented")));
    }
}
