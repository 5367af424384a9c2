use thiserror::Error;

/// Structural problems in caller-supplied input.
///
/// Segment indices are zero-based positions in the submitted list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Clause must be a JSON object, found {found}")]
    ClauseNotObject { found: &'static str },

    #[error("Clause is missing required field '{field}'")]
    MissingClauseField { field: &'static str },

    #[error("Clause field '{field}' must be {expected}, found {found}")]
    ClauseFieldType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Clause list must be a JSON array or object, found {found}")]
    ClausesShape { found: &'static str },

    #[error("Segments must be a JSON array, found {found}")]
    SegmentsNotArray { found: &'static str },

    #[error("Segment at index {index} must be an object or a string, found {found}")]
    SegmentShape { index: usize, found: &'static str },

    #[error("Segment at index {index} is missing required field '{field}'")]
    MissingSegmentField { index: usize, field: &'static str },

    #[error("Segment at index {index}: field '{field}' must be {expected}, found {found}")]
    SegmentFieldType {
        index: usize,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to build search pattern for segment {ref_id}: {source}")]
    Pattern {
        ref_id: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to format output: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
