use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Survey title and description are Markdown; render them as styled lines.
pub fn markdown_to_lines(text: &str) -> Vec<Line<'static>> {
    let mut out = LineBuilder::default();
    let mut code_block: Option<String> = None;

    for event in Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH) {
        if let Some(code) = code_block.as_mut() {
            match event {
                Event::Text(t) => code.push_str(&t),
                Event::End(TagEnd::CodeBlock) => {
                    for l in code.lines() {
                        out.push_line(Span::styled(format!("  {}", l), Style::default().fg(Color::Green)));
                    }
                    out.blank();
                    code_block = None;
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::CodeBlock(_)) => {
                out.flush();
                code_block = Some(String::new());
            }
            Event::Start(Tag::Strong) => out.push_style(Modifier::BOLD),
            Event::Start(Tag::Emphasis) => out.push_style(Modifier::ITALIC),
            Event::Start(Tag::Strikethrough) => out.push_style(Modifier::CROSSED_OUT),
            Event::End(TagEnd::Strong | TagEnd::Emphasis | TagEnd::Strikethrough) => out.pop_style(),
            Event::Start(Tag::Item) => {
                out.flush();
                out.spans.push(Span::raw("  • "));
            }
            Event::Start(Tag::Heading { level, .. }) => {
                out.flush();
                let marks = match level {
                    HeadingLevel::H1 => 1,
                    HeadingLevel::H2 => 2,
                    HeadingLevel::H3 => 3,
                    _ => 0,
                };
                if marks > 0 {
                    out.spans.push(Span::styled(
                        format!("{} ", "#".repeat(marks)),
                        Style::default().add_modifier(Modifier::BOLD),
                    ));
                }
            }
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_)) => {
                out.flush();
                out.blank();
            }
            Event::End(TagEnd::Item) | Event::SoftBreak | Event::HardBreak => out.flush(),
            Event::Text(t) => out.text(t.into_string()),
            Event::Code(c) => out
                .spans
                .push(Span::styled(format!("`{}`", c), Style::default().fg(Color::Yellow))),
            Event::Rule => {
                out.flush();
                out.push_line(Span::styled("─".repeat(40), Style::default().fg(Color::DarkGray)));
            }
            _ => {}
        }
    }

    out.finish()
}

#[derive(Default)]
struct LineBuilder {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    styles: Vec<Style>,
}

impl LineBuilder {
    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, modifier: Modifier) {
        let next = self.style().add_modifier(modifier);
        self.styles.push(next);
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    fn text(&mut self, text: String) {
        let style = self.style();
        self.spans.push(Span::styled(text, style));
    }

    fn flush(&mut self) {
        if !self.spans.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.spans)));
        }
    }

    fn push_line(&mut self, span: Span<'static>) {
        self.lines.push(Line::from(span));
    }

    fn blank(&mut self) {
        self.lines.push(Line::from(""));
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn renders_lists_and_emphasis() {
        let lines = markdown_to_lines("Please answer **all** items:\n\n- one\n- two\n");
        let text = text_of(&lines);
        assert_eq!(text[0], "Please answer all items:");
        assert!(text.contains(&"  • one".to_string()));
        assert!(lines[0].spans[1].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn code_blocks_keep_their_lines() {
        let lines = markdown_to_lines("```\nfirst\nsecond\n```\n");
        let text = text_of(&lines);
        assert_eq!(&text[..2], &["  first".to_string(), "  second".to_string()]);
    }
}
