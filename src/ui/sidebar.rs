use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use ratatui::Frame;

use crate::state::{ActivePanel, FormState, QuestionStatus};

pub fn status_icon(status: QuestionStatus) -> (&'static str, Color) {
    match status {
        QuestionStatus::Unanswered => ("○", Color::White),
        QuestionStatus::Answered => ("✓", Color::Green),
        QuestionStatus::Missing => ("*", Color::Yellow),
        QuestionStatus::Error => ("!", Color::Red),
    }
}

pub fn draw_sidebar(f: &mut Frame, area: Rect, state: &FormState) {
    if area.width == 0 {
        return;
    }
    let height = area.height.saturating_sub(1) as usize; // title row
    let total = state.visible.len();
    let current = state.current;

    let scroll_offset = if current >= state.sidebar_scroll + height {
        current.saturating_sub(height.saturating_sub(1))
    } else if current < state.sidebar_scroll {
        current
    } else {
        state.sidebar_scroll
    };

    let title_max_len = area.width.saturating_sub(10) as usize; // cursor + icon + number
    let mut lines: Vec<Line> = Vec::new();

    for (idx, id) in state.visible.iter().enumerate().skip(scroll_offset).take(height) {
        let Some(q) = state.survey.question(id) else {
            continue;
        };
        let (icon, color) = status_icon(state.status(id));
        let is_current = idx == current;
        let bg = if is_current { Color::DarkGray } else { Color::Reset };
        let style = if is_current {
            Style::default()
                .fg(Color::White)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(bg)
        };

        let text = if q.text.is_empty() { "(untitled)" } else { q.text.as_str() };
        let title: String = if text.chars().count() > title_max_len {
            let mut t: String = text.chars().take(title_max_len.saturating_sub(1)).collect();
            t.push('…');
            t
        } else {
            text.to_string()
        };

        lines.push(Line::from(vec![
            Span::styled(if is_current { " ▸ " } else { "   " }, style),
            Span::styled(format!("{} ", icon), Style::default().fg(color).bg(bg)),
            Span::styled(format!("{:>2}. ", idx + 1), style),
            Span::styled(title, style),
        ]));
    }

    let border_style = if state.active_panel == ActivePanel::Sidebar {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let block = Block::default()
        .borders(Borders::RIGHT)
        .title(format!(" {} {} ", total, state.labels().questions_total))
        .title_style(Style::default().add_modifier(Modifier::BOLD))
        .border_style(border_style);

    f.render_widget(Paragraph::new(lines).block(block), area);

    if total > height {
        let scrollbar_area = Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: height as u16,
        };
        let mut scrollbar_state = ScrollbarState::new(total.saturating_sub(1))
            .position(current)
            .viewport_content_length(3);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        f.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }
}
