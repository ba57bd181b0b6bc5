//! Path-addressed updates over JSON-shaped trees.
//!
//! Both the schema editor and the answer store route every nested write
//! through [`set`]. A path is a sequence of [`Segment`]s: keys index into
//! objects, indices into arrays. Missing positions are created on the way
//! down (an object for a key, an array for an index). An index may address
//! an existing element or the slot exactly at the end of the array, which
//! appends; anything further out is rejected rather than padded.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<&String> for Segment {
    fn from(key: &String) -> Self {
        Segment::Key(key.clone())
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) => f.write_str(k),
            Segment::Index(i) => write!(f, "{}", i),
        }
    }
}

/// Build a path from heterogeneous segments: `path![id, 0, "text"]`.
#[macro_export]
macro_rules! path {
    ($($seg:expr),* $(,)?) => {
        vec![$($crate::path::Segment::from($seg)),*]
    };
}

pub fn display(path: &[Segment]) -> String {
    path.iter()
        .map(Segment::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// Parse a dotted path (`q1.params.0`). All-digit parts become indices.
pub fn parse_path(raw: &str) -> Result<Vec<Segment>> {
    if raw.trim().is_empty() {
        return Err(Error::InvalidPath {
            path: raw.to_string(),
            reason: "empty path".to_string(),
        });
    }
    raw.split('.')
        .map(|part| {
            if part.is_empty() {
                Err(Error::InvalidPath {
                    path: raw.to_string(),
                    reason: "empty segment".to_string(),
                })
            } else if part.bytes().all(|b| b.is_ascii_digit()) {
                part.parse::<usize>()
                    .map(Segment::Index)
                    .map_err(|e| Error::InvalidPath {
                        path: raw.to_string(),
                        reason: e.to_string(),
                    })
            } else {
                Ok(Segment::Key(part.to_string()))
            }
        })
        .collect()
}

/// Read the value at `path`, if every step exists.
pub fn get<'a>(root: &'a Value, path: &[Segment]) -> Option<&'a Value> {
    path.iter().try_fold(root, |node, seg| match (seg, node) {
        (Segment::Key(k), Value::Object(map)) => map.get(k),
        (Segment::Index(i), Value::Array(items)) => items.get(*i),
        _ => None,
    })
}

/// Return a copy of `root` with `value` placed at `path`. `root` is left untouched.
pub fn set(root: &Value, path: &[Segment], value: Value) -> Result<Value> {
    let mut next = root.clone();
    set_in(&mut next, path, 0, value).map_err(|reason| Error::InvalidPath {
        path: display(path),
        reason,
    })?;
    Ok(next)
}

fn set_in(
    node: &mut Value,
    path: &[Segment],
    depth: usize,
    value: Value,
) -> std::result::Result<(), String> {
    let Some(seg) = path.get(depth) else {
        *node = value;
        return Ok(());
    };

    if node.is_null() {
        *node = match seg {
            Segment::Key(_) => Value::Object(Map::new()),
            Segment::Index(_) => Value::Array(Vec::new()),
        };
    }

    match (seg, node) {
        (Segment::Key(key), Value::Object(map)) => {
            let child = map.entry(key.clone()).or_insert(Value::Null);
            set_in(child, path, depth + 1, value)
        }
        (Segment::Index(index), Value::Array(items)) => {
            let index = *index;
            if index == items.len() {
                items.push(Value::Null);
            } else if index > items.len() {
                return Err(format!(
                    "index {} past end of array of length {}",
                    index,
                    items.len()
                ));
            }
            set_in(&mut items[index], path, depth + 1, value)
        }
        (seg, other) => Err(format!(
            "segment `{}` cannot address {}",
            seg,
            kind_name(other)
        )),
    }
}

fn kind_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
