//! Serializers for annotated documents
//!
//! The engine produces a structured [`AnnotatedDocument`]; this module turns
//! it (or a whole [`BatchReport`]) into a presentation format.
//!
//! # Output Formats
//!
//! - **Html**: escaped markup with highlight spans, ref badges, legend and
//!   annotation list, wired together through ids and `data-*` attributes
//! - **Console**: plain text for terminals and logs
//! - **Json / JsonPretty**: the contract itself

mod console;
mod html;
mod json;

use std::str::FromStr;

use clause_types::{AnnotatedDocument, BatchReport};
use serde::{Deserialize, Serialize};

use crate::error::HighlightError;

pub use console::ConsoleRenderer;
pub use html::{escape_html, HtmlRenderer};
pub use json::JsonRenderer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Html,
    Json,
    JsonPretty,
    #[default]
    Console,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "json" => Ok(OutputFormat::Json),
            "json-pretty" | "json_pretty" => Ok(OutputFormat::JsonPretty),
            "console" | "text" => Ok(OutputFormat::Console),
            other => Err(format!(
                "Invalid format '{}'. Must be 'html', 'json', 'json-pretty' or 'console'",
                other
            )),
        }
    }
}

/// Renders documents in one output format
#[derive(Debug, Clone)]
pub struct Renderer {
    format: OutputFormat,
    html: HtmlRenderer,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            html: HtmlRenderer::new(),
        }
    }

    /// Use a fixed HTML scope instead of a random one
    pub fn with_html_scope(mut self, scope: impl Into<String>) -> Self {
        self.html = HtmlRenderer::with_scope(scope);
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn render(
        &self,
        document: &AnnotatedDocument,
        title: Option<&str>,
    ) -> Result<String, HighlightError> {
        match self.format {
            OutputFormat::Html => self.html.render(document, title),
            OutputFormat::Json => JsonRenderer::render(document, false),
            OutputFormat::JsonPretty => JsonRenderer::render(document, true),
            OutputFormat::Console => ConsoleRenderer::render(document, title),
        }
    }

    pub fn render_batch(&self, report: &BatchReport) -> Result<String, HighlightError> {
        match self.format {
            OutputFormat::Html => self.html.render_batch(report),
            OutputFormat::Json => JsonRenderer::render_batch(report, false),
            OutputFormat::JsonPretty => JsonRenderer::render_batch(report, true),
            OutputFormat::Console => ConsoleRenderer::render_batch(report),
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HighlightEngine;
    use clause_types::{ClauseInput, ProblematicSegment};

    #[test]
    fn test_format_parsing() {
        assert_eq!("HTML".parse::<OutputFormat>(), Ok(OutputFormat::Html));
        assert_eq!("json-pretty".parse::<OutputFormat>(), Ok(OutputFormat::JsonPretty));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Console));
        assert!("pdf".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_every_format_renders_a_batch() {
        let engine = HighlightEngine::new();
        let report = engine.analyze_batch(&[ClauseInput::new(
            "Termination fee of 50% applies.",
            vec![ProblematicSegment::new("fee of 50%", "Penalty")],
        )]);

        for format in [
            OutputFormat::Html,
            OutputFormat::Json,
            OutputFormat::JsonPretty,
            OutputFormat::Console,
        ] {
            let output = Renderer::new(format).render_batch(&report).unwrap();
            assert!(output.contains("fee of 50%"), "{:?} output missing text", format);
        }
    }
}
