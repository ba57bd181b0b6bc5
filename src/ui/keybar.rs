use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::model::QuestionKind;
use crate::state::{FormState, InputMode};

pub fn draw_keybar(f: &mut Frame, area: Rect, state: &FormState) {
    let bindings: Vec<(&str, &str)> = match state.input_mode {
        InputMode::TextEdit => {
            let multiline = state.text_edit.as_ref().is_some_and(|e| e.multiline);
            let mut b = vec![("←/→", "cursor"), ("Enter", "save")];
            if multiline {
                b[1] = ("Ctrl+S", "save");
                b.push(("Enter", "new line"));
            }
            b.push(("Esc", "cancel"));
            b
        }
        InputMode::Picker => vec![
            ("type", "filter"),
            ("↑/↓", "move"),
            ("Enter", "choose"),
            ("Esc", "cancel"),
        ],
        InputMode::Navigation => {
            let mut b = vec![("↑/↓", "row"), ("PgUp/PgDn", "question"), ("Enter", "answer")];
            match state.current_question().map(|q| &q.kind) {
                Some(QuestionKind::Textarea) => b.push(("Ctrl+E", "editor")),
                Some(QuestionKind::QuestionGroup(_)) => {
                    b.push(("Ctrl+N", "add"));
                    b.push(("Del", "remove"));
                }
                _ => {}
            }
            b.extend([("Tab", "panel"), ("Ctrl+S", "submit"), ("Ctrl+Q", "quit")]);
            b
        }
    };

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (i, (key, action)) in bindings.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(
            key.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {}", action)));
    }

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Rgb(20, 20, 20)));
    f.render_widget(widget, area);
}
