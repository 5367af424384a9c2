//! Boundary adapter for loosely-typed input
//!
//! Segment lists arrive as JSON produced by the risk analysis step, or as
//! bare strings from older callers. Everything is validated here and turned
//! into canonical [`ProblematicSegment`] records before reaching the engine.

use clause_types::{ClauseInput, ProblematicSegment, Severity};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// A segment as accepted at the boundary: a full record or a legacy bare excerpt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SegmentInput {
    Plain(String),
    Record(ProblematicSegment),
}

impl From<SegmentInput> for ProblematicSegment {
    fn from(input: SegmentInput) -> Self {
        match input {
            SegmentInput::Plain(text) => ProblematicSegment::from_plain(text),
            SegmentInput::Record(segment) => segment,
        }
    }
}

/// Canonicalize a mixed list of record and plain-string segments.
pub fn canonicalize_segments<I>(inputs: I) -> Vec<ProblematicSegment>
where
    I: IntoIterator<Item = SegmentInput>,
{
    inputs.into_iter().map(ProblematicSegment::from).collect()
}

/// Validate a JSON array of segments.
///
/// Fails on the first structurally invalid entry.
pub fn parse_segments(value: &Value) -> Result<Vec<ProblematicSegment>, ValidationError> {
    let items = value
        .as_array()
        .ok_or(ValidationError::SegmentsNotArray {
            found: json_type(value),
        })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_segment(index, item))
        .collect()
}

/// Validate one clause object: `{ "title"?, "text", "segments"? }`.
pub fn parse_clause(value: &Value) -> Result<ClauseInput, ValidationError> {
    let object = value.as_object().ok_or(ValidationError::ClauseNotObject {
        found: json_type(value),
    })?;

    let text = match object.get("text") {
        None => return Err(ValidationError::MissingClauseField { field: "text" }),
        Some(Value::String(text)) => text.clone(),
        Some(other) => {
            return Err(ValidationError::ClauseFieldType {
                field: "text",
                expected: "a string",
                found: json_type(other),
            })
        }
    };

    let title = match object.get("title") {
        None | Some(Value::Null) => None,
        Some(Value::String(title)) => Some(title.clone()),
        Some(other) => {
            return Err(ValidationError::ClauseFieldType {
                field: "title",
                expected: "a string",
                found: json_type(other),
            })
        }
    };

    let segments = match object.get("segments") {
        None | Some(Value::Null) => Vec::new(),
        Some(segments) => parse_segments(segments)?,
    };

    Ok(ClauseInput {
        title,
        text,
        segments,
    })
}

/// Best-effort title lookup, used to label clauses that fail validation
pub fn clause_title(value: &Value) -> Option<String> {
    value
        .get("title")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn parse_segment(index: usize, item: &Value) -> Result<ProblematicSegment, ValidationError> {
    match item {
        Value::String(text) => Ok(ProblematicSegment::from_plain(text.clone())),
        Value::Object(fields) => parse_segment_record(index, fields),
        other => Err(ValidationError::SegmentShape {
            index,
            found: json_type(other),
        }),
    }
}

fn parse_segment_record(
    index: usize,
    fields: &Map<String, Value>,
) -> Result<ProblematicSegment, ValidationError> {
    let problematic_text = required_string(index, fields, "problematic_text")?;
    let explanation = required_string(index, fields, "explanation")?;

    let legal_reference = match fields.get("legal_reference") {
        None | Some(Value::Null) => None,
        Some(Value::String(reference)) if reference.trim().is_empty() => None,
        Some(Value::String(reference)) => Some(reference.clone()),
        Some(other) => {
            return Err(ValidationError::SegmentFieldType {
                index,
                field: "legal_reference",
                expected: "a string",
                found: json_type(other),
            })
        }
    };

    // Severity is a display hint: anything unusable falls back to medium.
    let severity = fields
        .get("severity")
        .and_then(Value::as_str)
        .map(Severity::parse_lenient)
        .unwrap_or_default();

    Ok(ProblematicSegment {
        problematic_text,
        explanation,
        legal_reference,
        severity,
    })
}

fn required_string(
    index: usize,
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<String, ValidationError> {
    match fields.get(field) {
        None => Err(ValidationError::MissingSegmentField { index, field }),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(other) => Err(ValidationError::SegmentFieldType {
            index,
            field,
            expected: "a string",
            found: json_type(other),
        }),
    }
}

/// Article and type name of a JSON value, for error messages
pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
