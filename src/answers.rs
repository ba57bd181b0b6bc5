//! The answer store: question id -> answer value, shape implied by the schema.
//!
//! Values are held as an untyped JSON tree so nested writes can go through
//! [`crate::path::set`]; typed access goes through [`Answer`], chosen by the
//! paired question's kind.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::model::{Question, QuestionKind};
use crate::path::{self, Segment};

/// Typed view of one stored answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// input / textarea text, or the option index of a radio / select.
    Scalar(String),
    /// checkbox option indices in click order, or a unit `[province, district, ward]` path.
    Set(Vec<String>),
    /// questionGroup: one inner list per instance, indexed by sub-field.
    Group(Vec<Vec<String>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerStore {
    root: Value,
}

impl Default for AnswerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AnswerStore {
    pub fn new() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn raw(&self, question_id: &str) -> Option<&Value> {
        self.root.get(question_id).filter(|v| !v.is_null())
    }

    pub fn question_ids(&self) -> impl Iterator<Item = &str> {
        self.root
            .as_object()
            .into_iter()
            .flat_map(|m| m.keys().map(String::as_str))
    }

    /// Typed answer for `question_id`, shaped by `question`'s kind.
    pub fn answer(&self, question_id: &str, question: &Question) -> Option<Answer> {
        let raw = self.raw(question_id)?;
        match &question.kind {
            QuestionKind::Input
            | QuestionKind::Textarea
            | QuestionKind::Radio(_)
            | QuestionKind::Select(_) => Some(Answer::Scalar(scalar_of(raw))),
            QuestionKind::Checkbox(_) | QuestionKind::Unit => Some(Answer::Set(strings_of(raw))),
            QuestionKind::QuestionGroup(_) => Some(Answer::Group(instances_of(raw))),
            QuestionKind::Other(_) => None,
        }
    }

    pub fn scalar(&self, question_id: &str) -> Option<String> {
        self.raw(question_id).map(scalar_of)
    }

    pub fn set_values(&self, question_id: &str) -> Vec<String> {
        self.raw(question_id).map(strings_of).unwrap_or_default()
    }

    pub fn group(&self, question_id: &str) -> Vec<Vec<String>> {
        self.raw(question_id).map(instances_of).unwrap_or_default()
    }

    /// True when the value is present and not an empty string or empty array.
    pub fn is_answered(&self, question_id: &str) -> bool {
        match self.raw(question_id) {
            None => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(_) => true,
        }
    }

    pub fn answered_count<'a>(&self, question_ids: impl IntoIterator<Item = &'a String>) -> usize {
        question_ids
            .into_iter()
            .filter(|id| self.is_answered(id))
            .count()
    }

    fn write(&mut self, path: &[Segment], value: Value) -> Result<()> {
        self.root = path::set(&self.root, path, value)?;
        Ok(())
    }

    pub fn record_scalar(&mut self, question_id: &str, value: impl Into<String>) -> Result<()> {
        self.write(&crate::path![question_id], Value::String(value.into()))
    }

    /// Add or remove `option_index` from a checkbox answer. Newly checked
    /// options go to the end; remaining entries keep their order.
    pub fn record_set(&mut self, question_id: &str, option_index: usize, checked: bool) -> Result<()> {
        let key = option_index.to_string();
        let mut values = self.set_values(question_id);
        if checked {
            if !values.contains(&key) {
                values.push(key);
            }
        } else {
            values.retain(|v| v != &key);
        }
        self.write(&crate::path![question_id], strings_value(values))
    }

    /// Replace a whole array answer (the unit path).
    pub fn record_path(&mut self, question_id: &str, values: Vec<String>) -> Result<()> {
        self.write(&crate::path![question_id], strings_value(values))
    }

    /// Write one cell of a questionGroup instance. Missing cells before
    /// `field_index` in that instance are filled with empty strings, and the
    /// instance itself may be new only if it is the next one.
    pub fn record_group_cell(
        &mut self,
        question_id: &str,
        instance_index: usize,
        field_index: usize,
        value: impl Into<String>,
    ) -> Result<()> {
        let instance_path = crate::path![question_id, instance_index];
        let existing = match path::get(&self.root, &instance_path) {
            Some(Value::Array(cells)) => cells.len(),
            Some(Value::Null) | None => {
                self.write(&instance_path, Value::Array(Vec::new()))?;
                0
            }
            Some(_) => {
                return Err(Error::InvalidPath {
                    path: path::display(&instance_path),
                    reason: "group instance is not a list".to_string(),
                })
            }
        };
        for pad in existing..field_index {
            self.write(
                &crate::path![question_id, instance_index, pad],
                Value::String(String::new()),
            )?;
        }
        self.write(
            &crate::path![question_id, instance_index, field_index],
            Value::String(value.into()),
        )
    }

    /// Append an empty instance to a questionGroup answer; returns its index.
    pub fn append_group_instance(&mut self, question_id: &str) -> Result<usize> {
        let next = self.group_len(question_id);
        self.write(&crate::path![question_id, next], Value::Array(Vec::new()))?;
        Ok(next)
    }

    pub fn remove_group_instance(&mut self, question_id: &str, instance_index: usize) -> Result<()> {
        let mut instances = match self.raw(question_id) {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };
        if instance_index >= instances.len() {
            return Err(Error::InvalidPath {
                path: path::display(&crate::path![question_id, instance_index]),
                reason: format!("no instance {}", instance_index),
            });
        }
        instances.remove(instance_index);
        self.write(&crate::path![question_id], Value::Array(instances))
    }

    pub fn group_len(&self, question_id: &str) -> usize {
        match self.raw(question_id) {
            Some(Value::Array(items)) => items.len(),
            _ => 0,
        }
    }

    /// Serialize to the blob stored on a response.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.root)?)
    }

    pub fn decode(blob: &str) -> std::result::Result<Self, serde_json::Error> {
        let map: Map<String, Value> = serde_json::from_str(blob)?;
        Ok(Self {
            root: Value::Object(map),
        })
    }
}

fn strings_value(values: Vec<String>) -> Value {
    Value::Array(values.into_iter().map(Value::String).collect())
}

fn scalar_of(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn strings_of(v: &Value) -> Vec<String> {
    match v {
        Value::Array(items) => items.iter().map(scalar_of).collect(),
        Value::Null => Vec::new(),
        other => vec![scalar_of(other)],
    }
}

fn instances_of(v: &Value) -> Vec<Vec<String>> {
    match v {
        Value::Array(items) => items.iter().map(strings_of).collect(),
        _ => Vec::new(),
    }
}
