//! Result summaries and single-response detail.

use chrono::{Local, TimeZone};

use crate::answers::{Answer, AnswerStore};
use crate::error::{Error, Result};
use crate::flatten::display_value;
use crate::geo::Geography;
use crate::i18n::Labels;
use crate::model::{sub_fields_of, Response, Survey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSummary {
    pub id: String,
    pub user: Option<String>,
    pub submitted: String,
    /// Answered questions, or `None` when the blob does not decode.
    pub answered: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub questions: usize,
    pub responses: Vec<ResponseSummary>,
}

pub fn format_time(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(t) => t.format("%Y-%m-%d %H:%M").to_string(),
        None => "unknown".to_string(),
    }
}

pub fn summarize(survey: &Survey, responses: &[Response]) -> Summary {
    let ids: Vec<String> = survey.renderable().map(|(id, _)| id.clone()).collect();
    Summary {
        questions: ids.len(),
        responses: responses
            .iter()
            .map(|r| ResponseSummary {
                id: r.id.clone(),
                user: r.user.clone(),
                submitted: format_time(r.created_at),
                answered: AnswerStore::decode(&r.answers)
                    .ok()
                    .map(|a| a.answered_count(&ids)),
            })
            .collect(),
    }
}

pub fn summary_lines(summary: &Summary, labels: &Labels) -> Vec<String> {
    let mut lines = vec![
        format!("{}: {}", labels.questions_total, summary.questions),
        format!("{}: {}", labels.responses_total, summary.responses.len()),
        String::new(),
    ];
    for r in &summary.responses {
        let answered = match r.answered {
            Some(n) => format!("{}/{}", n, summary.questions),
            None => "malformed".to_string(),
        };
        lines.push(format!(
            "{}  {}  {:<28}  {}",
            r.id,
            r.submitted,
            r.user.as_deref().unwrap_or("-"),
            answered
        ));
    }
    lines
}

/// One response as labelled lines. Groups list each instance as a
/// numbered block of sub-field values.
pub fn detail_lines(
    survey: &Survey,
    response: &Response,
    geo: &Geography,
    labels: &Labels,
) -> Result<Vec<String>> {
    let answers =
        AnswerStore::decode(&response.answers).map_err(|source| Error::MalformedAnswers {
            id: response.id.clone(),
            source,
        })?;
    let mut lines = Vec::new();
    for (n, (id, question)) in survey.renderable().enumerate() {
        lines.push(format!("{}. {}", n + 1, question.text));
        match answers.answer(id, question) {
            Some(Answer::Group(instances)) => {
                let fields = sub_fields_of(question);
                for (i, cells) in instances.iter().enumerate() {
                    lines.push(format!("   {} {}", labels.response, i + 1));
                    for field in &fields {
                        let value = cells.get(field.index).map(String::as_str).unwrap_or("");
                        lines.push(format!("     {}: {}", field.content, value));
                    }
                }
            }
            _ => {
                let value = display_value(question, id, &answers, geo);
                lines.push(format!("   {}", if value.is_empty() { "-" } else { &value }));
            }
        }
    }
    Ok(lines)
}
