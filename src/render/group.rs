use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use super::*;
use crate::model::sub_fields_of;

/// Repeatable group of text sub-fields. At least one instance is always shown;
/// every instance after the first carries a remove row, and a final row adds
/// an instance.
pub struct GroupRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupRow {
    Cell { instance: usize, field: usize },
    Remove(usize),
    Add,
}

fn layout(ctx: &RenderContext<'_>) -> Vec<GroupRow> {
    let fields = sub_fields_of(ctx.target.question).len();
    let instances = ctx.answers.group_len(ctx.target.id).max(1);
    let mut rows = Vec::new();
    for instance in 0..instances {
        rows.extend((0..fields).map(|field| GroupRow::Cell { instance, field }));
        if instance > 0 {
            rows.push(GroupRow::Remove(instance));
        }
    }
    rows.push(GroupRow::Add);
    rows
}

fn cell_value(ctx: &RenderContext<'_>, instance: usize, field: usize) -> String {
    ctx.answers
        .group(ctx.target.id)
        .get(instance)
        .and_then(|cells| cells.get(field).cloned())
        .unwrap_or_default()
}

impl QuestionRenderer for GroupRenderer {
    fn render(&self, ctx: &RenderContext<'_>) -> Vec<Line<'static>> {
        let fields = sub_fields_of(ctx.target.question);
        let mut lines = Vec::new();
        for (row, entry) in layout(ctx).into_iter().enumerate() {
            let focused = ctx.focused(row);
            match entry {
                GroupRow::Cell { instance, field } => {
                    if field == 0 {
                        lines.push(Line::from(Span::styled(
                            format!("  {} {}", ctx.labels.response, instance + 1),
                            Style::default()
                                .fg(Color::Yellow)
                                .add_modifier(Modifier::BOLD),
                        )));
                    }
                    let Some(sub) = fields.get(field) else {
                        continue;
                    };
                    let value = cell_value(ctx, instance, field);
                    let body = if value.is_empty() {
                        placeholder(sub.placeholder.unwrap_or(ctx.labels.answer_placeholder))
                    } else {
                        Span::styled(value, row_style(focused))
                    };
                    lines.push(Line::from(vec![
                        marker(focused),
                        Span::raw(format!("{}: ", sub.content)),
                        body,
                    ]));
                }
                GroupRow::Remove(_) => lines.push(Line::from(vec![
                    marker(focused),
                    Span::styled(
                        format!("[ - {} ]", ctx.labels.remove_response),
                        row_style(focused).fg(Color::Red),
                    ),
                ])),
                GroupRow::Add => lines.push(Line::from(vec![
                    marker(focused),
                    Span::styled(
                        format!("[ + {} ]", ctx.labels.add_response),
                        row_style(focused).fg(Color::Green),
                    ),
                ])),
            }
        }
        lines
    }

    fn rows(&self, ctx: &RenderContext<'_>) -> usize {
        layout(ctx).len()
    }

    fn activate(&self, ctx: &RenderContext<'_>, row: usize) -> Option<Activation> {
        match layout(ctx).get(row).copied()? {
            GroupRow::Cell { instance, field } => {
                let sub = sub_fields_of(ctx.target.question).into_iter().nth(field)?;
                Some(Activation::EditText {
                    initial: cell_value(ctx, instance, field),
                    multiline: false,
                    placeholder: sub
                        .placeholder
                        .unwrap_or(ctx.labels.answer_placeholder)
                        .to_string(),
                    target: TextTarget::GroupCell { instance, field },
                })
            }
            GroupRow::Remove(instance) => {
                Some(Activation::Apply(Interaction::RemoveInstance(instance)))
            }
            GroupRow::Add => Some(Activation::Apply(Interaction::AddInstance)),
        }
    }

    fn apply(
        &self,
        target: &QuestionRef<'_>,
        answers: &mut AnswerStore,
        interaction: Interaction,
    ) -> Result<()> {
        match interaction {
            Interaction::GroupCell {
                instance,
                field,
                value,
            } => answers.record_group_cell(target.id, instance, field, value),
            Interaction::AddInstance => {
                // The first instance is shown before it is stored.
                if answers.group_len(target.id) == 0 {
                    answers.append_group_instance(target.id)?;
                }
                answers.append_group_instance(target.id).map(|_| ())
            }
            Interaction::RemoveInstance(instance) => {
                answers.remove_group_instance(target.id, instance)
            }
            other => Err(target.wrong_interaction(&other)),
        }
    }
}
