//! Shared data contract for the clause highlighter
//!
//! Every type that crosses a crate boundary lives here: the canonical
//! [`ProblematicSegment`] input, the intermediate [`MatchSpan`] and
//! [`HighlightRegion`] values, and the render-ready [`AnnotatedDocument`].

pub mod document;
pub mod types;

pub use document::{
    Annotation, AnnotatedDocument, BatchReport, ClauseInput, ClauseOutcome, DisplayRegion,
    QualitySummary, TextRun,
};
pub use types::{
    severity_legend, ColorTokens, HighlightRegion, LegendEntry, MatchSpan, ProblematicSegment,
    RefId, Severity,
};
