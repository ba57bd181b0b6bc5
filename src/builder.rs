//! Schema editor. The survey is edited as a JSON document and every change,
//! down to a single option label, is a [`path::set`] on that document.

use std::collections::HashSet;

use serde_json::{json, Map, Value};

use crate::error::{Error, Result};
use crate::model::{generate_id, LastModified, Question, QuestionKind, QuestionType, Survey};
use crate::path::{self, Segment};

const QUESTIONS: &str = "questions";
const ID_PREFIX: &str = "q";
const ID_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct SchemaEditor {
    doc: Value,
    /// Ids removed during this session; never handed out again.
    retired: HashSet<String>,
}

impl SchemaEditor {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Result<Self> {
        Self::from_survey(&Survey::new(id, title))
    }

    pub fn from_survey(survey: &Survey) -> Result<Self> {
        let mut doc = serde_json::to_value(survey)?;
        if doc.get(QUESTIONS).is_none() {
            doc = path::set(&doc, &crate::path![QUESTIONS], Value::Object(Map::new()))?;
        }
        Ok(Self {
            doc,
            retired: HashSet::new(),
        })
    }

    pub fn document(&self) -> &Value {
        &self.doc
    }

    pub fn question_ids(&self) -> Vec<String> {
        self.questions().keys().cloned().collect()
    }

    fn questions(&self) -> &Map<String, Value> {
        static EMPTY: std::sync::OnceLock<Map<String, Value>> = std::sync::OnceLock::new();
        self.doc
            .get(QUESTIONS)
            .and_then(Value::as_object)
            .unwrap_or_else(|| EMPTY.get_or_init(Map::new))
    }

    fn write(&mut self, path: &[Segment], value: Value) -> Result<()> {
        self.doc = path::set(&self.doc, path, value)?;
        Ok(())
    }

    fn question(&self, qid: &str) -> Result<&Value> {
        self.questions()
            .get(qid)
            .ok_or_else(|| Error::UnknownQuestion(qid.to_string()))
    }

    fn question_type(&self, qid: &str) -> Result<Option<QuestionType>> {
        let tag = self.question(qid)?.get("type").and_then(Value::as_str);
        Ok(tag.and_then(QuestionType::from_tag))
    }

    fn require(
        &self,
        qid: &str,
        expected: &'static str,
        accepts: impl Fn(QuestionType) -> bool,
    ) -> Result<()> {
        match self.question_type(qid)? {
            Some(ty) if accepts(ty) => Ok(()),
            other => Err(Error::WrongKind {
                id: qid.to_string(),
                expected,
                actual: other.map(|t| t.tag().to_string()).unwrap_or_else(|| {
                    self.question(qid)
                        .ok()
                        .and_then(|q| q.get("type"))
                        .and_then(Value::as_str)
                        .unwrap_or("")
                        .to_string()
                }),
            }),
        }
    }

    fn list(&self, qid: &str, field: &str) -> Vec<Value> {
        self.question(qid)
            .ok()
            .and_then(|q| q.get(field))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    fn check_index(&self, qid: &str, field: &str, index: usize) -> Result<()> {
        if index < self.list(qid, field).len() {
            Ok(())
        } else {
            Err(Error::InvalidPath {
                path: path::display(&crate::path![qid, field, index]),
                reason: "no such entry".to_string(),
            })
        }
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.write(&crate::path!["title"], json!(title))
    }

    pub fn set_description(&mut self, description: &str) -> Result<()> {
        self.write(&crate::path!["description"], json!(description))
    }

    pub fn set_unit(&mut self, unit: Option<&str>) -> Result<()> {
        self.write(&crate::path!["unit"], json!(unit))
    }

    /// Add an empty question of type `ty` at the end; returns its new id.
    pub fn add_question(&mut self, ty: QuestionType) -> Result<String> {
        let id = {
            let questions = self.questions();
            let retired = &self.retired;
            generate_id(ID_PREFIX, ID_LEN, |candidate| {
                questions.contains_key(candidate) || retired.contains(candidate)
            })
        };
        let question = Question::new("", QuestionKind::empty(ty));
        self.write(&crate::path![QUESTIONS, &id], serde_json::to_value(question)?)?;
        tracing::debug!(action = "editor/addQuestion", question = %id, kind = %ty, "question added");
        Ok(id)
    }

    /// Set any field of a question by a path relative to the question, e.g.
    /// `["params", 0]` or `["placeholder"]`.
    pub fn set_field(&mut self, qid: &str, field: &[Segment], value: Value) -> Result<()> {
        self.question(qid)?;
        let mut full = crate::path![QUESTIONS, qid];
        full.extend_from_slice(field);
        self.write(&full, value)?;
        tracing::debug!(action = "editor/setField", question = %qid, path = %path::display(field), "field set");
        Ok(())
    }

    /// Set by a path that starts either at a question id (`q1.params.0`) or
    /// at a survey field (`title`, `description`, `unit`).
    pub fn set_path(&mut self, path: &[Segment], value: Value) -> Result<()> {
        match path {
            [Segment::Key(qid), rest @ ..] if self.questions().contains_key(qid) => {
                if rest.is_empty() {
                    let question: Question = serde_json::from_value(value)?;
                    self.write(&crate::path![QUESTIONS, qid], serde_json::to_value(question)?)
                } else {
                    self.set_field(qid, rest, value)
                }
            }
            [Segment::Key(field)] if matches!(field.as_str(), "title" | "description" | "unit") => {
                self.write(path, value)
            }
            _ => Err(Error::InvalidPath {
                path: path::display(path),
                reason: "expected a question id or title, description, unit".to_string(),
            }),
        }
    }

    pub fn set_text(&mut self, qid: &str, text: &str) -> Result<()> {
        self.set_field(qid, &crate::path!["text"], json!(text))
    }

    pub fn set_required(&mut self, qid: &str, required: bool) -> Result<()> {
        self.set_field(qid, &crate::path!["required"], json!(required))
    }

    pub fn set_placeholder(&mut self, qid: &str, placeholder: Option<&str>) -> Result<()> {
        self.set_field(qid, &crate::path!["placeholder"], json!(placeholder))
    }

    /// Change the question type. Shape fields of the new type are created
    /// empty when missing; existing ones are left as they are.
    pub fn set_type(&mut self, qid: &str, ty: QuestionType) -> Result<()> {
        self.set_field(qid, &crate::path!["type"], json!(ty.tag()))?;
        let question = self.question(qid)?;
        if ty.has_options() && !question.get("params").is_some_and(Value::is_array) {
            self.set_field(qid, &crate::path!["params"], json!([]))?;
        }
        let question = self.question(qid)?;
        if ty == QuestionType::QuestionGroup
            && !question.get("subQuestions").is_some_and(Value::is_array)
        {
            self.set_field(qid, &crate::path!["subQuestions"], json!([]))?;
        }
        Ok(())
    }

    fn require_options(&self, qid: &str) -> Result<()> {
        self.require(qid, "radio, select or checkbox", QuestionType::has_options)
    }

    fn require_group(&self, qid: &str) -> Result<()> {
        self.require(qid, "questionGroup", |t| t == QuestionType::QuestionGroup)
    }

    /// Append an option; returns its index.
    pub fn add_option(&mut self, qid: &str, label: &str) -> Result<usize> {
        self.require_options(qid)?;
        let index = self.list(qid, "params").len();
        self.set_field(qid, &crate::path!["params", index], json!(label))?;
        Ok(index)
    }

    /// Rename an option. Stored answers refer to the index and so pick up the
    /// new label.
    pub fn update_option(&mut self, qid: &str, index: usize, label: &str) -> Result<()> {
        self.require_options(qid)?;
        self.check_index(qid, "params", index)?;
        self.set_field(qid, &crate::path!["params", index], json!(label))
    }

    /// Remove an option; later options move down one index.
    pub fn remove_option(&mut self, qid: &str, index: usize) -> Result<()> {
        self.require_options(qid)?;
        self.check_index(qid, "params", index)?;
        let mut params = self.list(qid, "params");
        params.remove(index);
        self.set_field(qid, &crate::path!["params"], Value::Array(params))
    }

    /// Replace all options at once (bulk import).
    pub fn replace_options(&mut self, qid: &str, options: Vec<String>) -> Result<()> {
        self.require_options(qid)?;
        self.set_field(qid, &crate::path!["params"], json!(options))
    }

    pub fn add_sub_question(
        &mut self,
        qid: &str,
        content: &str,
        placeholder: Option<&str>,
    ) -> Result<usize> {
        self.require_group(qid)?;
        let index = self.list(qid, "subQuestions").len();
        let mut sub = json!({ "content": content });
        if let Some(p) = placeholder {
            sub = path::set(&sub, &crate::path!["placeholder"], json!(p))?;
        }
        self.set_field(qid, &crate::path!["subQuestions", index], sub)?;
        Ok(index)
    }

    pub fn update_sub_question(&mut self, qid: &str, index: usize, content: &str) -> Result<()> {
        self.require_group(qid)?;
        self.check_index(qid, "subQuestions", index)?;
        self.set_field(
            qid,
            &crate::path!["subQuestions", index, "content"],
            json!(content),
        )
    }

    pub fn remove_sub_question(&mut self, qid: &str, index: usize) -> Result<()> {
        self.require_group(qid)?;
        self.check_index(qid, "subQuestions", index)?;
        let mut subs = self.list(qid, "subQuestions");
        subs.remove(index);
        self.set_field(qid, &crate::path!["subQuestions"], Value::Array(subs))
    }

    /// Remove a question. Its id is retired for the rest of the session.
    pub fn remove_question(&mut self, qid: &str) -> Result<()> {
        self.question(qid)?;
        let mut questions = self.questions().clone();
        questions.shift_remove(qid);
        self.write(&crate::path![QUESTIONS], Value::Object(questions))?;
        self.retired.insert(qid.to_string());
        tracing::debug!(action = "editor/removeQuestion", question = %qid, "question removed");
        Ok(())
    }

    /// Move a question to display position `to` (clamped to the end).
    pub fn move_question(&mut self, qid: &str, to: usize) -> Result<()> {
        let moved = self.question(qid)?.clone();
        let mut rest: Vec<(String, Value)> = self
            .questions()
            .iter()
            .filter(|(id, _)| id.as_str() != qid)
            .map(|(id, q)| (id.clone(), q.clone()))
            .collect();
        rest.insert(to.min(rest.len()), (qid.to_string(), moved));
        self.write(&crate::path![QUESTIONS], Value::Object(rest.into_iter().collect()))
    }

    /// Typed survey stamped with `lastModified`. Every question needs prompt
    /// text.
    pub fn build(&self, editor: &str, now: i64) -> Result<Survey> {
        let stamp = serde_json::to_value(LastModified {
            time: now,
            editor: editor.to_string(),
        })?;
        let doc = path::set(&self.doc, &crate::path!["lastModified"], stamp)?;
        let survey: Survey = serde_json::from_value(doc)?;
        if let Some((id, _)) = survey
            .questions
            .iter()
            .find(|(_, q)| q.text.trim().is_empty())
        {
            return Err(Error::InvalidSurvey(format!("question {} has no text", id)));
        }
        Ok(survey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_ids_are_not_reused() {
        let mut editor = SchemaEditor::new("s1", "Census").unwrap();
        let first = editor.add_question(QuestionType::Input).unwrap();
        editor.remove_question(&first).unwrap();
        for _ in 0..50 {
            let id = editor.add_question(QuestionType::Input).unwrap();
            assert_ne!(id, first);
        }
    }

    #[test]
    fn option_edits_reject_text_questions() {
        let mut editor = SchemaEditor::new("s1", "Census").unwrap();
        let id = editor.add_question(QuestionType::Input).unwrap();
        assert!(matches!(
            editor.add_option(&id, "Yes"),
            Err(Error::WrongKind { .. })
        ));
    }
}
