use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::ingest::fields::{Fields, Rejection};
use crate::ingest::kind::{CandidateRecord, Shape, MAX_RECORDS};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("payload is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("expected a JSON {expected}, got {found}")]
    WrongShape {
        expected: &'static str,
        found: &'static str,
    },

    #[error("no valid records ({dropped} dropped)")]
    NoValidRecords { dropped: usize },
}

/// Parses sanitized text into validated records of kind `R`.
///
/// Fails closed: unparseable text, a payload of the wrong shape, or a payload in
/// which every record was dropped are all errors, never an empty success.
/// At most [`MAX_RECORDS`] records are returned, in input order.
pub fn validate<R: CandidateRecord>(text: &str) -> Result<Vec<R>, ValidationError> {
    let payload: Value = serde_json::from_str(text)?;
    let shape = R::KIND.shape();

    let items: Vec<&Value> = match (&payload, shape) {
        (Value::Array(items), Shape::Array) => items.iter().collect(),
        (Value::Object(_), Shape::Object) => vec![&payload],
        (other, _) => {
            return Err(ValidationError::WrongShape {
                expected: shape_name(shape),
                found: value_name(other),
            })
        }
    };

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for (index, item) in items.into_iter().enumerate() {
        if records.len() == MAX_RECORDS {
            break;
        }
        match validate_one::<R>(item) {
            Ok(record) => records.push(record),
            Err(reason) => {
                dropped += 1;
                debug!("Dropping {} record #{index}: {reason}", R::KIND);
            }
        }
    }

    if records.is_empty() {
        return Err(ValidationError::NoValidRecords { dropped });
    }
    Ok(records)
}

fn validate_one<R: CandidateRecord>(item: &Value) -> Result<R, Rejection> {
    let fields = Fields::new(item)?;
    if let Some(missing) = R::KIND
        .required_fields()
        .iter()
        .copied()
        .find(|key| !fields.is_present(key))
    {
        return Err(Rejection::MissingField(missing));
    }
    R::from_fields(&fields)
}

fn shape_name(shape: Shape) -> &'static str {
    match shape {
        Shape::Array => "array",
        Shape::Object => "object",
    }
}

fn value_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
