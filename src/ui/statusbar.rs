use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::state::FormState;

pub fn draw_statusbar(f: &mut Frame, area: Rect, state: &FormState) {
    let counts = state.status_counts();

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(
            format!("✓ {}/{}", counts.answered, counts.total),
            Style::default().fg(Color::Green),
        ),
        Span::raw("   "),
        Span::styled(
            format!("* {} {}", counts.missing, state.labels().missing_info.to_lowercase()),
            Style::default().fg(if counts.missing > 0 {
                Color::Yellow
            } else {
                Color::DarkGray
            }),
        ),
    ];

    if let Some(notice) = &state.notice {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(notice.clone(), Style::default().fg(Color::LightRed)));
    } else if let Some(id) = &state.submitted {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("{} ({})", state.labels().submitted, id),
            Style::default().fg(Color::Green),
        ));
    }

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Rgb(30, 30, 30)));
    f.render_widget(widget, area);
}
