//! Survey responses as a flat table.
//!
//! One column per plain question, one per sub-field of a questionGroup. A
//! response expands to one row per group instance (at least one row); how
//! non-group columns are filled on the extra rows is a [`RowFill`] choice.

use serde::Serialize;

use crate::answers::{Answer, AnswerStore};
use crate::geo::Geography;
use crate::model::{Question, QuestionKind, Response, Survey};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub question_id: String,
    /// Sub-field index for questionGroup columns.
    pub sub_field: Option<usize>,
    pub label: String,
}

/// Non-group cells on the second and later rows of an expanded response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RowFill {
    /// Only the first row carries them.
    #[default]
    Blank,
    /// Every row repeats them.
    Duplicate,
}

#[derive(Debug, Clone, Default)]
pub struct FlattenReport {
    pub table: Table,
    /// Ids of responses whose answer blob could not be decoded.
    pub skipped: Vec<String>,
}

/// Columns in schema order.
pub fn columns(survey: &Survey) -> Vec<Column> {
    let mut cols = Vec::new();
    for (id, question) in &survey.questions {
        match question.sub_questions() {
            Some(subs) => cols.extend(subs.iter().enumerate().map(|(i, sub)| Column {
                question_id: id.clone(),
                sub_field: Some(i),
                label: format!("{} - {}", question.text, sub.content),
            })),
            None => cols.push(Column {
                question_id: id.clone(),
                sub_field: None,
                label: question.text.clone(),
            }),
        }
    }
    cols
}

/// Flatten `responses` in order. Undecodable responses are skipped, logged
/// and reported; answers for ids not in the schema are ignored.
pub fn flatten(
    survey: &Survey,
    responses: &[Response],
    geo: &Geography,
    fill: RowFill,
) -> FlattenReport {
    let cols = columns(survey);
    let mut report = FlattenReport {
        table: Table {
            header: cols.iter().map(|c| c.label.clone()).collect(),
            rows: Vec::new(),
        },
        skipped: Vec::new(),
    };

    for response in responses {
        let answers = match AnswerStore::decode(&response.answers) {
            Ok(a) => a,
            Err(e) => {
                tracing::warn!(response = %response.id, error = %e, "skipping malformed response");
                report.skipped.push(response.id.clone());
                continue;
            }
        };
        report
            .table
            .rows
            .extend(expand_response(survey, &cols, &answers, geo, fill));
    }
    report
}

fn expand_response(
    survey: &Survey,
    cols: &[Column],
    answers: &AnswerStore,
    geo: &Geography,
    fill: RowFill,
) -> Vec<Vec<String>> {
    let instances = survey
        .questions
        .iter()
        .filter(|(_, q)| matches!(q.kind, QuestionKind::QuestionGroup(_)))
        .map(|(id, _)| answers.group(id).len())
        .max()
        .unwrap_or(0)
        .max(1);

    (0..instances)
        .map(|row| {
            cols.iter()
                .map(|col| {
                    let Some(question) = survey.question(&col.question_id) else {
                        return String::new();
                    };
                    match col.sub_field {
                        Some(field) => answers
                            .group(&col.question_id)
                            .get(row)
                            .and_then(|cells| cells.get(field).cloned())
                            .unwrap_or_default(),
                        None if row == 0 || fill == RowFill::Duplicate => {
                            display_value(question, &col.question_id, answers, geo)
                        }
                        None => String::new(),
                    }
                })
                .collect()
        })
        .collect()
}

/// Display string for one answer, resolved against current labels. Unknown
/// question types show their stored text as-is.
pub fn display_value(
    question: &Question,
    question_id: &str,
    answers: &AnswerStore,
    geo: &Geography,
) -> String {
    let Some(answer) = answers.answer(question_id, question) else {
        return match question.kind {
            QuestionKind::Other(_) => answers.scalar(question_id).unwrap_or_default(),
            _ => String::new(),
        };
    };
    match answer {
        Answer::Scalar(raw) if question.params().is_some() => question
            .option_label(&raw)
            .map(str::to_string)
            .unwrap_or_default(),
        Answer::Scalar(text) => text,
        Answer::Set(path) if matches!(question.kind, QuestionKind::Unit) => {
            if path.is_empty() {
                String::new()
            } else {
                geo.describe(&path)
            }
        }
        Answer::Set(indices) => indices
            .iter()
            .filter_map(|raw| question.option_label(raw))
            .collect::<Vec<_>>()
            .join(", "),
        Answer::Group(instances) => instances
            .iter()
            .map(|cells| cells.join(", "))
            .collect::<Vec<_>>()
            .join("; "),
    }
}
