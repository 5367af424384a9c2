//! HTML renderer
//!
//! Class names and element ids are suffixed with a per-render scope so that
//! several rendered clauses can share one page. Highlights and annotations
//! point at each other through ids and `data-*` attributes:
//!
//! - highlight span: `id="highlight-{n}-{scope}"`, `data-ref-ids="1,2"`
//! - annotation item: `id="annotation-{ref}-{scope}"`,
//!   `data-highlight-ids="highlight-0-{scope} ..."`

use std::fmt::Write;

use clause_types::{AnnotatedDocument, Annotation, BatchReport, ClauseOutcome, TextRun};
use uuid::Uuid;

use crate::error::HighlightError;

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    scope: String,
}

impl HtmlRenderer {
    /// Renderer with a fresh 8-character scope
    pub fn new() -> Self {
        let id = Uuid::new_v4().simple().to_string();
        Self {
            scope: id[..8].to_string(),
        }
    }

    /// Renderer with a fixed scope.
    ///
    /// The scope lands in `id` and `class` attributes, so anything outside
    /// `[A-Za-z0-9_-]` is replaced with `-`.
    pub fn with_scope(scope: impl Into<String>) -> Self {
        let scope = scope
            .into()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        Self { scope }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn render(
        &self,
        document: &AnnotatedDocument,
        title: Option<&str>,
    ) -> Result<String, HighlightError> {
        let mut out = String::new();
        self.write_clause(&mut out, document, title)?;
        Ok(out)
    }

    pub fn render_batch(&self, report: &BatchReport) -> Result<String, HighlightError> {
        let s = &self.scope;
        let mut out = String::new();

        writeln!(out, "<div class=\"clause-report-{}\">", s)?;
        for (index, outcome) in report.outcomes.iter().enumerate() {
            match outcome {
                ClauseOutcome::Annotated { title, document } => {
                    // Each clause gets its own sub-scope so ids stay unique on the page
                    let clause = HtmlRenderer::with_scope(format!("{}-{}", s, index));
                    clause.write_clause(&mut out, document, title.as_deref())?;
                }
                ClauseOutcome::Failed { title, error } => {
                    writeln!(out, "<div class=\"clause-error-{}\">", s)?;
                    if let Some(title) = title {
                        writeln!(out, "<h3>{}</h3>", escape_html(title))?;
                    }
                    writeln!(
                        out,
                        "<p>Clause could not be analysed: {}</p>",
                        escape_html(error)
                    )?;
                    writeln!(out, "</div>")?;
                }
            }
        }
        writeln!(out, "</div>")?;

        Ok(out)
    }

    fn write_clause(
        &self,
        out: &mut String,
        document: &AnnotatedDocument,
        title: Option<&str>,
    ) -> Result<(), HighlightError> {
        let s = &self.scope;

        writeln!(out, "<section class=\"clause-{}\">", s)?;
        if let Some(title) = title {
            writeln!(out, "<h3>{}</h3>", escape_html(title))?;
        }

        write!(out, "<div class=\"legal-clause-{}\">", s)?;
        let mut region_index = 0;
        for run in &document.runs {
            match run {
                TextRun::Plain { text, .. } => out.push_str(&escape_html(text)),
                TextRun::Highlighted {
                    text,
                    severity,
                    colors,
                    ref_ids,
                    ..
                } => {
                    let joined = ref_ids
                        .iter()
                        .map(|r| r.as_str())
                        .collect::<Vec<_>>()
                        .join(",");
                    write!(
                        out,
                        "<span id=\"highlight-{}-{s}\" class=\"highlight-{s} {sev}\" \
                         style=\"background-color: {bg}; border-bottom-color: {border};\" \
                         data-ref-ids=\"{refs}\" data-severity=\"{sev}\">{text}",
                        region_index,
                        s = s,
                        sev = severity,
                        bg = colors.background,
                        border = colors.border,
                        refs = joined,
                        text = escape_html(text),
                    )?;
                    for ref_id in ref_ids {
                        write!(
                            out,
                            "<sup class=\"annotation-ref-{s}\"><a href=\"#annotation-{r}-{s}\">{r}</a></sup>",
                            s = s,
                            r = ref_id
                        )?;
                    }
                    out.push_str("</span>");
                    region_index += 1;
                }
            }
        }
        writeln!(out, "</div>")?;

        self.write_legend(out, document)?;
        self.write_annotations(out, &document.annotations)?;
        writeln!(out, "</section>")?;
        Ok(())
    }

    fn write_legend(
        &self,
        out: &mut String,
        document: &AnnotatedDocument,
    ) -> Result<(), HighlightError> {
        let s = &self.scope;
        writeln!(out, "<div class=\"severity-legend-{}\">", s)?;
        writeln!(out, "<div><strong>Risk Severity Levels:</strong></div>")?;
        for entry in &document.legend {
            writeln!(
                out,
                "<div class=\"legend-item-{s}\"><span class=\"legend-color-{s}\" \
                 style=\"background-color: {bg}; border-bottom-color: {border};\"></span>\
                 <span class=\"legend-label-{s}\">{label}</span></div>",
                s = s,
                bg = entry.colors.background,
                border = entry.colors.border,
                label = entry.label,
            )?;
        }
        writeln!(out, "</div>")?;
        Ok(())
    }

    fn write_annotations(
        &self,
        out: &mut String,
        annotations: &[Annotation],
    ) -> Result<(), HighlightError> {
        if annotations.is_empty() {
            return Ok(());
        }

        let s = &self.scope;
        writeln!(out, "<div class=\"annotations-section-{}\">", s)?;
        writeln!(out, "<h3>Annotations</h3>")?;
        for annotation in annotations {
            let highlight_ids = annotation
                .region_indices
                .iter()
                .map(|i| format!("highlight-{}-{}", i, s))
                .collect::<Vec<_>>()
                .join(" ");
            let located = if annotation.is_located() {
                ""
            } else {
                " unlocated"
            };

            writeln!(
                out,
                "<div id=\"annotation-{r}-{s}\" class=\"annotation-item-{s} {sev}{located}\" \
                 data-ref-id=\"{r}\" data-highlight-ids=\"{ids}\">",
                r = annotation.ref_id,
                s = s,
                sev = annotation.severity,
                located = located,
                ids = highlight_ids,
            )?;

            let first_target = annotation
                .region_indices
                .first()
                .map(|i| format!("#highlight-{}-{}", i, s));
            let heading = format!(
                "Issue {}: {}{}",
                annotation.index,
                escape_html(&annotation.preview),
                if annotation.truncated { " [...]" } else { "" }
            );
            match first_target {
                Some(target) => writeln!(
                    out,
                    "<div class=\"annotation-header-{}\"><a href=\"{}\">{}</a></div>",
                    s, target, heading
                )?,
                None => writeln!(
                    out,
                    "<div class=\"annotation-header-{}\">{} <em>(not located in clause text)</em></div>",
                    s, heading
                )?,
            }

            writeln!(
                out,
                "<div id=\"annotation-body-{}-{}\" class=\"annotation-body-{}\">",
                annotation.ref_id, s, s
            )?;
            writeln!(out, "<p>{}</p>", escape_html(&annotation.explanation))?;
            if let Some(reference) = &annotation.legal_reference {
                writeln!(
                    out,
                    "<p class=\"legal-reference-{}\">{}</p>",
                    s,
                    escape_html(reference)
                )?;
            }
            writeln!(out, "</div>")?;
            writeln!(out, "</div>")?;
        }
        writeln!(out, "</div>")?;
        Ok(())
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}
