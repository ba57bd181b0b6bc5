use ratatui::style::Color;
use ratatui::text::{Line, Span};

use super::*;

/// Three cascading pickers: province, district, ward.
pub struct UnitRenderer;

fn level_label(labels: &Labels, level: UnitLevel) -> &'static str {
    match level {
        UnitLevel::Province => labels.province,
        UnitLevel::District => labels.district,
        UnitLevel::Ward => labels.ward,
    }
}

impl QuestionRenderer for UnitRenderer {
    fn render(&self, ctx: &RenderContext<'_>) -> Vec<Line<'static>> {
        let path = ctx.answers.set_values(ctx.target.id);
        let names = ctx.target.geography.names(&path);
        UnitLevel::ALL
            .into_iter()
            .map(|level| {
                let row = level.depth();
                let focused = ctx.focused(row);
                let name = &names[row];
                let body = if name.is_empty() {
                    Span::styled(
                        format!("[ {} ▾ ]", ctx.labels.choose),
                        row_style(focused).fg(Color::DarkGray),
                    )
                } else {
                    Span::styled(format!("[ {} ▾ ]", name), row_style(focused))
                };
                Line::from(vec![
                    marker(focused),
                    Span::raw(format!("{}: ", level_label(ctx.labels, level))),
                    body,
                ])
            })
            .collect()
    }

    fn rows(&self, _ctx: &RenderContext<'_>) -> usize {
        UnitLevel::ALL.len()
    }

    fn activate(&self, ctx: &RenderContext<'_>, row: usize) -> Option<Activation> {
        let level = *UnitLevel::ALL.get(row)?;
        let path = ctx.answers.set_values(ctx.target.id);
        if path.len() < level.depth() {
            return None;
        }
        let options = ctx
            .target
            .geography
            .options(level, &path)
            .into_iter()
            .map(|(key, label)| PickOption { key, label })
            .collect();
        Some(Activation::Pick {
            title: level_label(ctx.labels, level).to_string(),
            options,
            selected: path.get(level.depth()).cloned(),
            target: PickTarget::Unit(level),
        })
    }

    fn apply(
        &self,
        target: &QuestionRef<'_>,
        answers: &mut AnswerStore,
        interaction: Interaction,
    ) -> Result<()> {
        match interaction {
            Interaction::Unit { level, key } => {
                let current = answers.set_values(target.id);
                let next = target.geography.select(&current, level, &key)?;
                answers.record_path(target.id, next)
            }
            other => Err(target.wrong_interaction(&other)),
        }
    }
}
