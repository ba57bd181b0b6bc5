use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::state::FormState;

/// Plain text of a Markdown title: markup is dropped, lines are joined.
fn plain_title(markdown: &str) -> String {
    super::markdown::markdown_to_lines(markdown)
        .iter()
        .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .trim_start_matches('#')
        .trim()
        .to_string()
}

pub fn draw_titlebar(f: &mut Frame, area: Rect, state: &FormState) {
    let title_text = format!("[ {} ]", plain_title(&state.survey.title));
    let unit_text = state
        .survey
        .unit
        .as_deref()
        .map(|u| format!(" {} ", u))
        .unwrap_or_default();

    let available = area.width as usize;
    let title_len = title_text.chars().count();
    let center_pad = available.saturating_sub(title_len) / 2;
    let right_pad = available.saturating_sub(center_pad + title_len + unit_text.chars().count());

    let line = Line::from(vec![
        Span::raw(" ".repeat(center_pad)),
        Span::styled(
            title_text,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ".repeat(right_pad)),
        Span::styled(unit_text, Style::default().fg(Color::Rgb(200, 200, 120))),
    ]);

    f.render_widget(
        Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
        area,
    );
}
