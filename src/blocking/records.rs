//! `(identifier, label)` records supplied by upstream label extraction.
//!
//! Malformed records are rejected one at a time with the offending line and a
//! reason, never skipped: a silently dropped label hides an upstream defect
//! and shows up much later as a missing link.

use std::io::BufRead;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BlockingError, Result};

/// One labeled resource.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelRecord<I> {
    pub id: I,
    pub label: String,
}

impl<I> LabelRecord<I> {
    pub fn new(id: I, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

impl<I, S: Into<String>> From<(I, S)> for LabelRecord<I> {
    fn from((id, label): (I, S)) -> Self {
        Self::new(id, label)
    }
}

/// Validate one JSON value as `{"id": <string>, "label": <string>}`.
///
/// `line` is only used in the error.
pub fn parse_record(line: usize, value: &Value) -> Result<LabelRecord<String>> {
    let malformed = |reason: String| BlockingError::MalformedRecord { line, reason };

    let Value::Object(fields) = value else {
        return Err(malformed(format!("expected an object, found {}", kind(value))));
    };
    let id = match fields.get("id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::String(_)) => return Err(malformed("empty \"id\"".to_string())),
        Some(other) => {
            return Err(malformed(format!(
                "\"id\" must be a string, found {}",
                kind(other)
            )))
        }
        None => return Err(malformed("missing \"id\"".to_string())),
    };
    let label = match fields.get("label") {
        Some(Value::String(label)) if !label.is_empty() => label.clone(),
        Some(Value::String(_)) => return Err(malformed(format!("empty \"label\" for {id}"))),
        Some(other) => {
            return Err(malformed(format!(
                "\"label\" for {id} must be a string, found {}",
                kind(other)
            )))
        }
        None => return Err(malformed(format!("missing \"label\" for {id}"))),
    };
    Ok(LabelRecord { id, label })
}

/// Read one JSON record per line. Blank lines are ignored.
///
/// Lines are numbered from 1. The iterator yields one `Err` per bad line and
/// keeps going, so the caller decides whether to stop at the first defect.
pub fn read_json_lines<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = Result<LabelRecord<String>>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let line_no = idx + 1;
            let line = match line {
                Ok(line) => line,
                Err(e) => return Some(Err(BlockingError::Io(e))),
            };
            if line.trim().is_empty() {
                return None;
            }
            Some(
                serde_json::from_str::<Value>(&line)
                    .map_err(|e| BlockingError::MalformedRecord {
                        line: line_no,
                        reason: format!("invalid JSON: {e}"),
                    })
                    .and_then(|value| parse_record(line_no, &value)),
            )
        })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
