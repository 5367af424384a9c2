//! Render contract produced for one clause, plus the batch envelope

use serde::{Deserialize, Serialize};

use crate::types::{
    ColorTokens, HighlightRegion, LegendEntry, ProblematicSegment, RefId, Severity,
};

/// A contiguous piece of the normalized clause text.
///
/// Runs alternate between plain and highlighted text; concatenating every
/// run's `text` reproduces the normalized clause exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextRun {
    Plain {
        text: String,
        start: usize,
        end: usize,
    },
    Highlighted {
        text: String,
        start: usize,
        end: usize,
        severity: Severity,
        colors: ColorTokens,
        ref_ids: Vec<RefId>,
    },
}

impl TextRun {
    pub fn text(&self) -> &str {
        match self {
            TextRun::Plain { text, .. } | TextRun::Highlighted { text, .. } => text,
        }
    }

    pub fn is_highlighted(&self) -> bool {
        matches!(self, TextRun::Highlighted { .. })
    }
}

/// A merged region with its display colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRegion {
    #[serde(flatten)]
    pub region: HighlightRegion,
    pub colors: ColorTokens,
}

/// Per-segment entry of the annotation list, in reported order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// 1-based issue number
    pub index: usize,
    pub ref_id: RefId,
    pub preview: String,
    /// True when `preview` is shorter than `problematic_text`
    pub truncated: bool,
    pub problematic_text: String,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_reference: Option<String>,
    pub severity: Severity,
    pub colors: ColorTokens,
    /// Number of located occurrences in the clause
    pub occurrences: usize,
    /// Indices into `AnnotatedDocument::regions` carrying this ref id
    pub region_indices: Vec<usize>,
}

impl Annotation {
    pub fn is_located(&self) -> bool {
        self.occurrences > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedDocument {
    pub normalized_text: String,
    pub runs: Vec<TextRun>,
    pub regions: Vec<DisplayRegion>,
    pub annotations: Vec<Annotation>,
    pub legend: Vec<LegendEntry>,
}

impl AnnotatedDocument {
    /// Concatenation of every run; equals `normalized_text` for a well-formed document
    pub fn rendered_text(&self) -> String {
        self.runs.iter().map(TextRun::text).collect()
    }

    pub fn annotation(&self, ref_id: &RefId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| &a.ref_id == ref_id)
    }

    /// Regions a reader should be taken to when clicking the annotation for `ref_id`
    pub fn regions_for(&self, ref_id: &RefId) -> Vec<&DisplayRegion> {
        self.regions
            .iter()
            .filter(|r| r.region.has_ref(ref_id))
            .collect()
    }

    /// Segments whose excerpt was not found anywhere in the clause
    pub fn unmatched(&self) -> Vec<&Annotation> {
        self.annotations.iter().filter(|a| !a.is_located()).collect()
    }

    pub fn highest_severity(&self) -> Option<Severity> {
        self.regions.iter().map(|r| r.region.severity).max()
    }
}

/// One clause handed to the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub text: String,
    #[serde(default)]
    pub segments: Vec<ProblematicSegment>,
}

impl ClauseInput {
    pub fn new(text: impl Into<String>, segments: Vec<ProblematicSegment>) -> Self {
        Self {
            title: None,
            text: text.into(),
            segments,
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Result of analysing one clause in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClauseOutcome {
    Annotated {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        document: AnnotatedDocument,
    },
    Failed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        error: String,
    },
}

impl ClauseOutcome {
    pub fn title(&self) -> Option<&str> {
        match self {
            ClauseOutcome::Annotated { title, .. } | ClauseOutcome::Failed { title, .. } => {
                title.as_deref()
            }
        }
    }

    pub fn document(&self) -> Option<&AnnotatedDocument> {
        match self {
            ClauseOutcome::Annotated { document, .. } => Some(document),
            ClauseOutcome::Failed { .. } => None,
        }
    }
}

/// Data-quality counters over a batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualitySummary {
    pub clauses: usize,
    pub failed_clauses: usize,
    pub segments: usize,
    pub located_segments: usize,
    pub unmatched_segments: usize,
}

impl QualitySummary {
    pub fn tally(outcomes: &[ClauseOutcome]) -> Self {
        let mut summary = QualitySummary {
            clauses: outcomes.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome.document() {
                Some(document) => {
                    let unmatched = document.unmatched().len();
                    summary.segments += document.annotations.len();
                    summary.unmatched_segments += unmatched;
                    summary.located_segments += document.annotations.len() - unmatched;
                }
                None => summary.failed_clauses += 1,
            }
        }
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// RFC 3339 timestamp
    pub generated_at: String,
    pub outcomes: Vec<ClauseOutcome>,
    pub summary: QualitySummary,
}
