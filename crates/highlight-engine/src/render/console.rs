//! Console renderer
//!
//! Highlighted runs are wrapped in `[[...]]` and followed by `^ref` badges so
//! the output stays readable without color support.

use std::fmt::Write;

use clause_types::{AnnotatedDocument, BatchReport, ClauseOutcome, TextRun};

use crate::error::HighlightError;

/// Console format renderer
pub struct ConsoleRenderer;

impl ConsoleRenderer {
    pub fn render(
        document: &AnnotatedDocument,
        title: Option<&str>,
    ) -> Result<String, HighlightError> {
        let mut output = String::new();
        Self::write_clause(&mut output, document, title)?;
        Ok(output)
    }

    pub fn render_batch(report: &BatchReport) -> Result<String, HighlightError> {
        let mut output = String::new();

        writeln!(output)?;
        writeln!(output, "╔══════════════════════════════════════════════════════════════╗")?;
        writeln!(output, "║                    CLAUSE RISK HIGHLIGHTS                     ║")?;
        writeln!(output, "╚══════════════════════════════════════════════════════════════╝")?;
        writeln!(output)?;
        writeln!(output, "Generated: {}", report.generated_at)?;
        writeln!(output)?;

        for outcome in &report.outcomes {
            match outcome {
                ClauseOutcome::Annotated { title, document } => {
                    Self::write_clause(&mut output, document, title.as_deref())?;
                }
                ClauseOutcome::Failed { title, error } => {
                    writeln!(
                        output,
                        "Clause: {}",
                        title.as_deref().unwrap_or("(untitled)")
                    )?;
                    writeln!(output, "  ✗ Could not be analysed: {}", error)?;
                }
            }
            writeln!(output)?;
        }

        let summary = &report.summary;
        writeln!(output, "────────────────────────────────────────────────────────────────")?;
        writeln!(
            output,
            "Clauses: {} ({} failed)",
            summary.clauses, summary.failed_clauses
        )?;
        writeln!(
            output,
            "Issues:  {} reported, {} located, {} not located",
            summary.segments, summary.located_segments, summary.unmatched_segments
        )?;

        Ok(output)
    }

    fn write_clause(
        output: &mut String,
        document: &AnnotatedDocument,
        title: Option<&str>,
    ) -> Result<(), HighlightError> {
        writeln!(output, "Clause: {}", title.unwrap_or("(untitled)"))?;

        let mut text = String::new();
        for run in &document.runs {
            match run {
                TextRun::Plain { text: plain, .. } => text.push_str(plain),
                TextRun::Highlighted {
                    text: highlighted,
                    ref_ids,
                    ..
                } => {
                    write!(text, "[[{}]]", highlighted)?;
                    for ref_id in ref_ids {
                        write!(text, "^{}", ref_id)?;
                    }
                }
            }
        }
        writeln!(output, "  {}", text)?;

        if document.annotations.is_empty() {
            writeln!(output, "  No issues reported.")?;
            return Ok(());
        }

        writeln!(output)?;
        writeln!(output, "  Issues:")?;
        for annotation in &document.annotations {
            writeln!(
                output,
                "  {}. [{}] {}{}",
                annotation.index,
                annotation.severity.as_str().to_uppercase(),
                annotation.preview,
                if annotation.truncated { " [...]" } else { "" }
            )?;
            writeln!(output, "     {}", annotation.explanation)?;
            if let Some(reference) = &annotation.legal_reference {
                writeln!(output, "     Reference: {}", reference)?;
            }
            if !annotation.is_located() {
                writeln!(output, "     (not located in clause)")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HighlightEngine;
    use clause_types::{ClauseInput, ProblematicSegment, Severity};

    #[test]
    fn test_markers_and_badges() {
        let doc = HighlightEngine::new()
            .annotate(
                "Supplier may terminate at any time.",
                &[ProblematicSegment::new("terminate at any time", "Unilateral")
                    .with_severity(Severity::High)
                    .with_legal_reference("ACL s 25(1)(a)")],
            )
            .unwrap();
        let output = ConsoleRenderer::render(&doc, Some("Termination")).unwrap();

        assert!(output.contains("Clause: Termination"));
        assert!(output.contains("Supplier may [[terminate at any time]]^1."));
        assert!(output.contains("1. [HIGH] terminate at any time"));
        assert!(output.contains("Reference: ACL s 25(1)(a)"));
    }

    #[test]
    fn test_unlocated_segment_flagged() {
        let doc = HighlightEngine::new()
            .annotate("Plain text.", &[ProblematicSegment::new("missing", "Gone")])
            .unwrap();
        let output = ConsoleRenderer::render(&doc, None).unwrap();
        assert!(output.contains("(not located in clause)"));
        assert!(output.contains("Clause: (untitled)"));
    }

    #[test]
    fn test_batch_summary_lines() {
        let report = HighlightEngine::new().analyze_batch(&[
            ClauseInput::new("Net 90 payment.", vec![ProblematicSegment::new("Net 90", "Long")]),
            ClauseInput::new("Nothing flagged.", Vec::new()),
        ]);
        let output = ConsoleRenderer::render_batch(&report).unwrap();
        assert!(output.contains("Clauses: 2 (0 failed)"));
        assert!(output.contains("Issues:  1 reported, 1 located, 0 not located"));
        assert!(output.contains("No issues reported."));
    }
}
