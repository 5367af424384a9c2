//! JSON output of the render contract

use clause_types::{AnnotatedDocument, BatchReport};

use crate::error::HighlightError;

/// JSON format renderer
pub struct JsonRenderer;

impl JsonRenderer {
    pub fn render(document: &AnnotatedDocument, pretty: bool) -> Result<String, HighlightError> {
        Self::to_string(document, pretty)
    }

    pub fn render_batch(report: &BatchReport, pretty: bool) -> Result<String, HighlightError> {
        Self::to_string(report, pretty)
    }

    fn to_string<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, HighlightError> {
        let json = if pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}
