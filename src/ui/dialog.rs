use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::state::{Dialog, FormState};

pub fn draw_dialog(f: &mut Frame, area: Rect, state: &FormState) {
    let Some(dialog) = state.top_dialog() else {
        return;
    };

    match dialog {
        Dialog::ConfirmSubmit => draw_confirm_submit(f, area, state),
        Dialog::ConfirmQuit => draw_confirm_quit(f, area),
        Dialog::Help => draw_help(f, area),
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn confirm_row() -> Line<'static> {
    Line::from(vec![
        Span::styled("   [Enter] Confirm", Style::default().fg(Color::Green)),
        Span::raw("    "),
        Span::styled("[Esc] Cancel", Style::default().fg(Color::DarkGray)),
    ])
}

fn draw_boxed(f: &mut Frame, rect: Rect, lines: Vec<Line<'static>>, title: &str, color: Color) {
    f.render_widget(Clear, rect);
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    if !title.is_empty() {
        block = block.title(format!(" {} ", title));
    }
    f.render_widget(Paragraph::new(lines).block(block), rect);
}

fn draw_confirm_submit(f: &mut Frame, area: Rect, state: &FormState) {
    let counts = state.status_counts();
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("   {}", state.labels().submit_title),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("   {}/{} answered.", counts.answered, counts.total)),
        Line::from(""),
        confirm_row(),
        Line::from(""),
    ];
    if state.submitted.is_some() {
        lines.insert(4, Line::from("   A response was already sent from this form."));
    }

    let rect = centered_rect(48, lines.len() as u16 + 2, area);
    draw_boxed(f, rect, lines, "", Color::Yellow);
}

fn draw_confirm_quit(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Quit?",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("   Your answers are kept as a draft."),
        Line::from(""),
        confirm_row(),
        Line::from(""),
    ];

    let rect = centered_rect(42, lines.len() as u16 + 2, area);
    draw_boxed(f, rect, lines, "", Color::Yellow);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from("   ↑/↓        Move between rows"),
        Line::from("   PgUp/PgDn  Previous/next question"),
        Line::from("   Home/End   First/last question"),
        Line::from("   Enter      Answer the focused row"),
        Line::from("   Space      Toggle a choice"),
        Line::from("   Tab        Switch panel"),
        Line::from("   Ctrl+E     Edit long text in $EDITOR"),
        Line::from("   Ctrl+N     Add a group response"),
        Line::from("   Delete     Remove a group response"),
        Line::from("   Ctrl+S     Submit"),
        Line::from("   Ctrl+Q     Quit (draft is kept)"),
        Line::from("   ?          This help"),
        Line::from(""),
        Line::from(Span::styled(
            "        [Esc] Close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let rect = centered_rect(46, lines.len() as u16 + 2, area);
    draw_boxed(f, rect, lines, "Help", Color::Cyan);
}

/// Inline text editor overlay. The cursor is drawn as a reversed cell.
pub fn draw_text_edit(f: &mut Frame, area: Rect, state: &FormState) {
    let Some(edit) = &state.text_edit else {
        return;
    };
    let cursor_style = Style::default().add_modifier(Modifier::REVERSED);
    let mut lines: Vec<Line<'static>> = Vec::new();

    if edit.buffer.is_empty() {
        lines.push(Line::from(vec![
            Span::styled(" ", cursor_style),
            Span::styled(
                edit.placeholder.clone(),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    } else {
        let mut current: Vec<Span<'static>> = Vec::new();
        let mut plain = String::new();
        let chars: Vec<char> = edit.buffer.chars().collect();
        for (i, c) in chars.iter().enumerate() {
            if *c == '\n' {
                if i == edit.cursor {
                    current.push(Span::raw(std::mem::take(&mut plain)));
                    current.push(Span::styled(" ", cursor_style));
                }
                current.push(Span::raw(std::mem::take(&mut plain)));
                lines.push(Line::from(std::mem::take(&mut current)));
                continue;
            }
            if i == edit.cursor {
                current.push(Span::raw(std::mem::take(&mut plain)));
                current.push(Span::styled(c.to_string(), cursor_style));
            } else {
                plain.push(*c);
            }
        }
        current.push(Span::raw(plain));
        if edit.cursor >= chars.len() {
            current.push(Span::styled(" ", cursor_style));
        }
        lines.push(Line::from(current));
    }

    let height = if edit.multiline {
        (area.height / 2).max(6)
    } else {
        3
    };
    let rect = centered_rect(area.width.saturating_sub(10).max(20), height, area);
    f.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Answer ")
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        rect,
    );
}

/// Searchable picker overlay.
pub fn draw_picker(f: &mut Frame, area: Rect, state: &FormState) {
    let Some(picker) = &state.picker else {
        return;
    };
    let height = area.height.saturating_sub(4).clamp(5, 20);
    let list_height = height.saturating_sub(3) as usize;
    let visible = picker.visible();
    let offset = picker.cursor.saturating_sub(list_height.saturating_sub(1));

    let mut lines = vec![Line::from(vec![
        Span::styled(" / ", Style::default().fg(Color::Cyan)),
        Span::raw(picker.filter.clone()),
        Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)),
    ])];
    if visible.is_empty() {
        lines.push(Line::from(Span::styled(
            "   (no match)",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (i, option) in visible.iter().enumerate().skip(offset).take(list_height) {
        let selected = i == picker.cursor;
        let style = if selected {
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!(" {} {}", if selected { "▸" } else { " " }, option.label),
            style,
        )));
    }

    let rect = centered_rect(area.width.saturating_sub(10).clamp(20, 60), height, area);
    draw_boxed(f, rect, lines, &picker.title, Color::Cyan);
}
