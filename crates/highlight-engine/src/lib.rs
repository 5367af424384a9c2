//! Clause risk highlighting engine
//!
//! Given a clause and the problematic excerpts flagged against it, the
//! engine normalizes whitespace, locates every occurrence of each excerpt,
//! merges overlapping matches into regions carrying the highest severity,
//! and produces an [`AnnotatedDocument`] that a presentation layer can render
//! with two-way navigation between highlights and explanations.
//!
//! ```
//! use highlight_engine::HighlightEngine;
//! use clause_types::{ProblematicSegment, Severity};
//!
//! let engine = HighlightEngine::new();
//! let segments = vec![
//!     ProblematicSegment::new("within 30 days", "Short payment window")
//!         .with_severity(Severity::Medium),
//! ];
//! let doc = engine
//!     .annotate(
//!         "The Client shall pay the Consultant within 30 days of receipt of invoice.",
//!         &segments,
//!     )
//!     .unwrap();
//! assert_eq!(doc.regions.len(), 1);
//! ```

pub mod annotate;
pub mod config;
pub mod error;
pub mod input;
pub mod locator;
pub mod merge;
pub mod normalize;
pub mod render;

#[cfg(test)]
mod proptests;

use clause_types::{
    AnnotatedDocument, BatchReport, ClauseInput, ClauseOutcome, ProblematicSegment, QualitySummary,
};
use serde_json::Value;
use tracing::{debug, info, warn};

pub use config::EngineConfig;
pub use error::{HighlightError, ValidationError};
pub use input::SegmentInput;
pub use normalize::normalize_whitespace;
pub use render::{OutputFormat, Renderer};

/// HighlightEngine entry point
#[derive(Debug, Clone, Default)]
pub struct HighlightEngine {
    config: EngineConfig,
}

impl HighlightEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Annotate one clause.
    ///
    /// Segments whose excerpt is not found still get an annotation; they are
    /// logged and contribute no region.
    pub fn annotate(
        &self,
        clause_text: &str,
        segments: &[ProblematicSegment],
    ) -> Result<AnnotatedDocument, HighlightError> {
        let normalized = normalize_whitespace(clause_text);
        let located = locator::locate_segments(&normalized, segments)?;

        let spans = located.iter().flatten().cloned().collect();
        let regions = merge::merge_spans(spans);
        debug!(
            segments = segments.len(),
            regions = regions.len(),
            "Clause annotated"
        );

        Ok(annotate::build_document(
            normalized,
            segments,
            &located,
            regions,
            &self.config,
        ))
    }

    /// Annotate with a mixed list of record and legacy plain-string segments
    pub fn annotate_inputs(
        &self,
        clause_text: &str,
        inputs: Vec<SegmentInput>,
    ) -> Result<AnnotatedDocument, HighlightError> {
        let segments = input::canonicalize_segments(inputs);
        self.annotate(clause_text, &segments)
    }

    pub fn annotate_clause(
        &self,
        clause: &ClauseInput,
    ) -> Result<AnnotatedDocument, HighlightError> {
        self.annotate(&clause.text, &clause.segments)
    }

    /// Annotate many clauses; a failing clause is recorded and the rest continue.
    pub fn analyze_batch(&self, clauses: &[ClauseInput]) -> BatchReport {
        let outcomes = clauses
            .iter()
            .map(|clause| match self.annotate_clause(clause) {
                Ok(document) => ClauseOutcome::Annotated {
                    title: clause.title.clone(),
                    document,
                },
                Err(err) => failed(clause.title.clone(), err),
            })
            .collect();

        finish_batch(outcomes)
    }

    /// Validate and annotate raw JSON: one clause object or an array of them.
    ///
    /// Clause-level validation failures are isolated like any other clause
    /// failure. Only a top-level value that is neither an object nor an
    /// array is rejected outright.
    pub fn analyze_json(&self, value: &Value) -> Result<BatchReport, ValidationError> {
        let items: Vec<&Value> = match value {
            Value::Array(items) => items.iter().collect(),
            Value::Object(_) => vec![value],
            other => {
                return Err(ValidationError::ClausesShape {
                    found: input::json_type(other),
                })
            }
        };

        let outcomes = items
            .into_iter()
            .map(|item| {
                let title = input::clause_title(item);
                match input::parse_clause(item) {
                    Ok(clause) => match self.annotate_clause(&clause) {
                        Ok(document) => ClauseOutcome::Annotated {
                            title: clause.title,
                            document,
                        },
                        Err(err) => failed(title, err),
                    },
                    Err(err) => failed(title, err.into()),
                }
            })
            .collect();

        Ok(finish_batch(outcomes))
    }
}

fn failed(title: Option<String>, err: HighlightError) -> ClauseOutcome {
    warn!(
        title = title.as_deref().unwrap_or("<untitled>"),
        error = %err,
        "Clause analysis failed"
    );
    ClauseOutcome::Failed {
        title,
        error: err.to_string(),
    }
}

fn finish_batch(outcomes: Vec<ClauseOutcome>) -> BatchReport {
    let summary = QualitySummary::tally(&outcomes);
    info!(
        clauses = summary.clauses,
        failed = summary.failed_clauses,
        segments = summary.segments,
        unmatched = summary.unmatched_segments,
        "Batch analysis complete"
    );

    BatchReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        outcomes,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clause_types::{RefId, Severity, TextRun};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn refs(ids: &[&str]) -> Vec<RefId> {
        ids.iter().map(|id| RefId::from(*id)).collect()
    }

    #[test]
    fn test_case_mismatch_yields_annotation_without_region() {
        let engine = HighlightEngine::new();
        let segments = vec![ProblematicSegment::new("pay within 30 days", "Short window")
            .with_severity(Severity::Medium)];
        let doc = engine
            .annotate("Pay within 30 days of invoice.", &segments)
            .unwrap();

        assert!(doc.regions.is_empty());
        assert_eq!(doc.annotations.len(), 1);
        assert_eq!(doc.unmatched().len(), 1);
        assert_eq!(doc.rendered_text(), "Pay within 30 days of invoice.");
    }

    #[test]
    fn test_single_match_region() {
        let engine = HighlightEngine::new();
        let text = "The Client shall pay the Consultant within 30 days of receipt of invoice.";
        let segments = vec![ProblematicSegment::new("within 30 days", "Short window")];
        let doc = engine.annotate(text, &segments).unwrap();

        assert_eq!(doc.regions.len(), 1);
        let region = &doc.regions[0].region;
        assert_eq!((region.start, region.end), (36, 50));
        assert_eq!(region.ref_ids, refs(&["1"]));
        assert_eq!(doc.annotations[0].region_indices, vec![0]);
        assert_eq!(
            doc.runs
                .iter()
                .filter(|r| r.is_highlighted())
                .map(TextRun::text)
                .collect::<Vec<_>>(),
            vec!["within 30 days"]
        );
    }

    #[test]
    fn test_one_char_overlap_low_and_high() {
        let engine = HighlightEngine::new();
        let text = "Licensee shall indemnify and hold harmless the Licensor forever.";
        let segments = vec![
            ProblematicSegment::new("shall indemnify and", "Broad").with_severity(Severity::Low),
            ProblematicSegment::new("d hold harmless", "Very broad").with_severity(Severity::High),
        ];
        let doc = engine.annotate(text, &segments).unwrap();

        assert_eq!(doc.regions.len(), 1);
        let region = &doc.regions[0].region;
        assert_eq!(region.severity, Severity::High);
        assert_eq!(region.ref_ids, refs(&["1", "2"]));
        assert_eq!(doc.regions[0].colors, Severity::High.colors());
    }

    #[test]
    fn test_extra_spaced_excerpt_matches() {
        let engine = HighlightEngine::new();
        let segments = vec![ProblematicSegment::new("  extra   spaced   text  ", "Spacing")];
        let doc = engine
            .annotate("Some\n extra spaced\ttext here.", &segments)
            .unwrap();

        assert_eq!(doc.normalized_text, "Some extra spaced text here.");
        assert_eq!(doc.regions.len(), 1);
        assert_eq!(doc.annotations[0].occurrences, 1);
    }

    #[test]
    fn test_empty_segment_list() {
        let engine = HighlightEngine::new();
        let doc = engine.annotate("  A  clause\nwith   spacing. ", &[]).unwrap();

        assert!(doc.regions.is_empty());
        assert!(doc.annotations.is_empty());
        assert_eq!(doc.normalized_text, "A clause with spacing.");
        assert_eq!(doc.legend.len(), 3);
    }

    #[test]
    fn test_unknown_severity_normalized() {
        let engine = HighlightEngine::new();
        let value = json!({
            "text": "Fees may change at any time.",
            "segments": [{
                "problematic_text": "at any time",
                "explanation": "Unilateral variation",
                "severity": "critical"
            }]
        });
        let report = engine.analyze_json(&value).unwrap();
        let doc = report.outcomes[0].document().unwrap();

        assert_eq!(doc.annotations[0].severity, Severity::Medium);
        assert_eq!(doc.regions[0].region.severity, Severity::Medium);
    }

    #[test]
    fn test_every_region_ref_has_one_annotation() {
        let engine = HighlightEngine::new();
        let text = "Supplier may terminate at any time without notice and without refund.";
        let segments = vec![
            ProblematicSegment::new("without", "Repeated"),
            ProblematicSegment::new("terminate at any time", "Unilateral")
                .with_severity(Severity::High),
            ProblematicSegment::new("any time without", "Overlap").with_severity(Severity::Low),
        ];
        let doc = engine.annotate(text, &segments).unwrap();

        assert_eq!(doc.annotations.len(), segments.len());
        for display in &doc.regions {
            for ref_id in &display.region.ref_ids {
                let count = doc.annotations.iter().filter(|a| &a.ref_id == ref_id).count();
                assert_eq!(count, 1);
            }
        }
        assert_eq!(doc.annotations[0].occurrences, 2);
        assert_eq!(doc.rendered_text(), doc.normalized_text);
    }

    #[test]
    fn test_legacy_plain_inputs() {
        let engine = HighlightEngine::new();
        let doc = engine
            .annotate_inputs(
                "Provider has sole discretion over pricing.",
                vec![SegmentInput::Plain("sole discretion".to_string())],
            )
            .unwrap();
        assert_eq!(doc.annotations[0].explanation, "sole discretion");
        assert_eq!(doc.regions.len(), 1);
    }

    #[test]
    fn test_batch_isolates_failing_clause() {
        let engine = HighlightEngine::new();
        let value = json!([
            {"title": "Broken", "text": 12},
            {"title": "Payment", "text": "Pay in 7 days.", "segments": ["7 days", "14 days"]},
            {"title": "Bad segment", "text": "x", "segments": [{"explanation": "no text"}]}
        ]);
        let report = engine.analyze_json(&value).unwrap();

        assert_eq!(report.outcomes.len(), 3);
        assert!(matches!(report.outcomes[0], ClauseOutcome::Failed { .. }));
        assert_eq!(report.outcomes[0].title(), Some("Broken"));
        assert!(report.outcomes[1].document().is_some());
        assert!(matches!(report.outcomes[2], ClauseOutcome::Failed { .. }));
        assert_eq!(report.summary.failed_clauses, 2);
        assert_eq!(report.summary.segments, 2);
        assert_eq!(report.summary.unmatched_segments, 1);
    }

    #[test]
    fn test_analyze_json_rejects_scalar() {
        let engine = HighlightEngine::new();
        assert_eq!(
            engine.analyze_json(&json!(5)).unwrap_err(),
            ValidationError::ClausesShape { found: "a number" }
        );
        assert_eq!(
            engine.analyze_json(&json!(null)).unwrap_err(),
            ValidationError::ClausesShape { found: "null" }
        );
        assert_eq!(
            engine.analyze_json(&json!("clauses")).unwrap_err(),
            ValidationError::ClausesShape { found: "a string" }
        );
    }

    #[test]
    fn test_analyze_batch_keeps_titles() {
        let engine = HighlightEngine::with_config(EngineConfig::default().with_preview_chars(5));
        let clauses = vec![ClauseInput::new(
            "Liquidated damages apply.",
            vec![ProblematicSegment::new("Liquidated damages", "Penalty")],
        )
        .titled("Damages")];
        let report = engine.analyze_batch(&clauses);

        assert_eq!(report.outcomes[0].title(), Some("Damages"));
        let doc = report.outcomes[0].document().unwrap();
        assert_eq!(doc.annotations[0].preview, "Liqui");
        assert!(doc.annotations[0].truncated);
    }
}
