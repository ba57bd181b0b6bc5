use ratatui::text::{Line, Span};

use super::*;

/// `input` (single line) and `textarea` (multi line).
pub struct TextRenderer {
    pub multiline: bool,
}

impl QuestionRenderer for TextRenderer {
    fn render(&self, ctx: &RenderContext<'_>) -> Vec<Line<'static>> {
        let focused = ctx.focused(0);
        let value = ctx.answers.scalar(ctx.target.id).unwrap_or_default();
        if value.is_empty() {
            let hint = ctx
                .target
                .question
                .placeholder
                .as_deref()
                .unwrap_or(ctx.labels.answer_placeholder);
            return vec![Line::from(vec![marker(focused), placeholder(hint)])];
        }
        if !self.multiline {
            return vec![Line::from(vec![
                marker(focused),
                Span::styled(value, row_style(focused)),
            ])];
        }
        value
            .lines()
            .enumerate()
            .map(|(i, line)| {
                Line::from(vec![
                    marker(focused && i == 0),
                    Span::styled(line.to_string(), row_style(focused)),
                ])
            })
            .collect()
    }

    fn rows(&self, _ctx: &RenderContext<'_>) -> usize {
        1
    }

    fn activate(&self, ctx: &RenderContext<'_>, row: usize) -> Option<Activation> {
        if row != 0 {
            return None;
        }
        Some(Activation::EditText {
            initial: ctx.answers.scalar(ctx.target.id).unwrap_or_default(),
            multiline: self.multiline,
            placeholder: ctx
                .target
                .question
                .placeholder
                .clone()
                .unwrap_or_else(|| ctx.labels.answer_placeholder.to_string()),
            target: TextTarget::Answer,
        })
    }

    fn apply(
        &self,
        target: &QuestionRef<'_>,
        answers: &mut AnswerStore,
        interaction: Interaction,
    ) -> Result<()> {
        match interaction {
            Interaction::Text(value) => answers.record_scalar(target.id, value),
            other => Err(target.wrong_interaction(&other)),
        }
    }
}
