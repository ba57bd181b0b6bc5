use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap};
use ratatui::Frame;

use crate::state::{ActivePanel, FormState};
use crate::ui::markdown::markdown_to_lines;

/// Lines of the question pane: survey description on the first question,
/// then prompt, answer widget and any validation message.
pub fn question_lines(state: &FormState) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let Some(id) = state.current_id() else {
        lines.push(Line::from(Span::styled(
            "This survey has no questions.",
            Style::default().fg(Color::DarkGray),
        )));
        return lines;
    };
    let Some(question) = state.survey.question(id) else {
        return lines;
    };

    if state.current == 0 && !state.survey.description.trim().is_empty() {
        lines.extend(markdown_to_lines(&state.survey.description));
    }

    let mut header = vec![
        Span::styled(
            format!("{}. ", state.current + 1),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            question.text.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];
    if question.required {
        header.push(Span::styled(" *", Style::default().fg(Color::Red)));
    }
    lines.push(Line::from(header));
    lines.push(Line::from(""));

    if let Some(ctx) = state.render_context(id) {
        lines.extend(state.registry.render(&ctx));
    }

    if let Some(message) = state.errors.get(id) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", message),
            Style::default().fg(Color::Red),
        )));
    }
    lines
}

pub fn draw_question(f: &mut Frame, area: Rect, state: &FormState) {
    let lines = question_lines(state);
    let total = lines.len();
    let inner_height = area.height.saturating_sub(2) as usize;
    let scroll = state.question_scroll.min(total.saturating_sub(inner_height));

    let border_style = if state.active_panel == ActivePanel::Main {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);

    let widget = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0));
    f.render_widget(widget, area);

    if total > inner_height {
        let mut scrollbar_state = ScrollbarState::new(total.saturating_sub(inner_height))
            .position(scroll);
        f.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area,
            &mut scrollbar_state,
        );
    }
}
