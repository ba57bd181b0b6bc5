use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use super::*;
use crate::model::options_of;

/// `radio` (one option) and `checkbox` (any number, kept in click order).
pub struct ChoiceRenderer {
    pub multiple: bool,
}

impl ChoiceRenderer {
    fn is_selected(&self, ctx: &RenderContext<'_>, index: usize) -> bool {
        let key = index.to_string();
        if self.multiple {
            ctx.answers.set_values(ctx.target.id).contains(&key)
        } else {
            ctx.answers.scalar(ctx.target.id).as_deref() == Some(key.as_str())
        }
    }
}

impl QuestionRenderer for ChoiceRenderer {
    fn render(&self, ctx: &RenderContext<'_>) -> Vec<Line<'static>> {
        options_of(ctx.target.question)
            .into_iter()
            .map(|opt| {
                let focused = ctx.focused(opt.index);
                let selected = self.is_selected(ctx, opt.index);
                let mark = match (self.multiple, selected) {
                    (true, true) => "[x] ",
                    (true, false) => "[ ] ",
                    (false, true) => "(●) ",
                    (false, false) => "( ) ",
                };
                let mark_style = if selected {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    marker(focused),
                    Span::styled(mark, mark_style),
                    Span::styled(opt.label.to_string(), row_style(focused)),
                ])
            })
            .collect()
    }

    fn rows(&self, ctx: &RenderContext<'_>) -> usize {
        options_of(ctx.target.question).len()
    }

    fn activate(&self, ctx: &RenderContext<'_>, row: usize) -> Option<Activation> {
        if row >= self.rows(ctx) {
            return None;
        }
        let interaction = if self.multiple {
            Interaction::Toggle {
                option: row,
                checked: !self.is_selected(ctx, row),
            }
        } else {
            Interaction::Choose(row)
        };
        Some(Activation::Apply(interaction))
    }

    fn apply(
        &self,
        target: &QuestionRef<'_>,
        answers: &mut AnswerStore,
        interaction: Interaction,
    ) -> Result<()> {
        match (self.multiple, interaction) {
            (false, Interaction::Choose(index)) => {
                answers.record_scalar(target.id, index.to_string())
            }
            (true, Interaction::Toggle { option, checked }) => {
                answers.record_set(target.id, option, checked)
            }
            (_, other) => Err(target.wrong_interaction(&other)),
        }
    }
}

/// `select`: a single choice picked from a searchable list.
pub struct SelectRenderer;

impl QuestionRenderer for SelectRenderer {
    fn render(&self, ctx: &RenderContext<'_>) -> Vec<Line<'static>> {
        let focused = ctx.focused(0);
        let chosen = ctx
            .answers
            .scalar(ctx.target.id)
            .and_then(|raw| ctx.target.question.option_label(&raw).map(str::to_string));
        let body = match chosen {
            Some(label) => Span::styled(format!("[ {} ▾ ]", label), row_style(focused)),
            None => {
                let hint = ctx
                    .target
                    .question
                    .placeholder
                    .as_deref()
                    .unwrap_or(ctx.labels.choose);
                Span::styled(format!("[ {} ▾ ]", hint), row_style(focused).fg(Color::DarkGray))
            }
        };
        vec![Line::from(vec![marker(focused), body])]
    }

    fn rows(&self, _ctx: &RenderContext<'_>) -> usize {
        1
    }

    fn activate(&self, ctx: &RenderContext<'_>, row: usize) -> Option<Activation> {
        if row != 0 {
            return None;
        }
        let options = options_of(ctx.target.question)
            .into_iter()
            .map(|opt| PickOption {
                key: opt.index.to_string(),
                label: opt.label.to_string(),
            })
            .collect();
        Some(Activation::Pick {
            title: ctx.target.question.text.clone(),
            options,
            selected: ctx.answers.scalar(ctx.target.id),
            target: PickTarget::Choice,
        })
    }

    fn apply(
        &self,
        target: &QuestionRef<'_>,
        answers: &mut AnswerStore,
        interaction: Interaction,
    ) -> Result<()> {
        match interaction {
            Interaction::Choose(index) => answers.record_scalar(target.id, index.to_string()),
            other => Err(target.wrong_interaction(&other)),
        }
    }
}
