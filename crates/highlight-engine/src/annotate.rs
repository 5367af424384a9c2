//! Builds the render contract from merged regions
//!
//! The clause is cut into plain and highlighted runs along region
//! boundaries, and every input segment gets an annotation entry whether or
//! not it was located.

use std::iter;

use clause_types::{
    severity_legend, Annotation, AnnotatedDocument, DisplayRegion, HighlightRegion, MatchSpan,
    ProblematicSegment, RefId, TextRun,
};
use tracing::warn;

use crate::config::EngineConfig;

/// Assemble an [`AnnotatedDocument`].
///
/// `located` is indexed like `segments` (see
/// [`locate_segments`](crate::locator::locate_segments)); `regions` is the
/// merge of all of its spans.
pub fn build_document(
    normalized_text: String,
    segments: &[ProblematicSegment],
    located: &[Vec<MatchSpan>],
    regions: Vec<HighlightRegion>,
    config: &EngineConfig,
) -> AnnotatedDocument {
    let runs = build_runs(&normalized_text, &regions);
    let annotations = build_annotations(segments, located, &regions, config);

    let regions = regions
        .into_iter()
        .map(|region| DisplayRegion {
            colors: region.severity.colors(),
            region,
        })
        .collect();

    AnnotatedDocument {
        normalized_text,
        runs,
        regions,
        annotations,
        legend: severity_legend(),
    }
}

/// Slice `text` into alternating plain and highlighted runs.
///
/// Region offsets are characters. Regions must be ordered and disjoint, as
/// produced by [`merge_regions`](crate::merge::merge_regions); offsets past
/// the end of the text are clamped. Empty plain runs are skipped.
pub fn build_runs(text: &str, regions: &[HighlightRegion]) -> Vec<TextRun> {
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(byte, _)| byte)
        .chain(iter::once(text.len()))
        .collect();
    let char_len = boundaries.len() - 1;
    let slice = |start: usize, end: usize| text[boundaries[start]..boundaries[end]].to_string();

    let mut runs = Vec::with_capacity(regions.len() * 2 + 1);
    let mut cursor = 0;

    for region in regions {
        let start = region.start.clamp(cursor, char_len);
        let end = region.end.clamp(start, char_len);
        if start == end {
            continue;
        }

        if cursor < start {
            runs.push(TextRun::Plain {
                text: slice(cursor, start),
                start: cursor,
                end: start,
            });
        }
        runs.push(TextRun::Highlighted {
            text: slice(start, end),
            start,
            end,
            severity: region.severity,
            colors: region.severity.colors(),
            ref_ids: region.ref_ids.clone(),
        });
        cursor = end;
    }

    if cursor < char_len {
        runs.push(TextRun::Plain {
            text: slice(cursor, char_len),
            start: cursor,
            end: char_len,
        });
    }

    runs
}

/// One annotation per segment, in the order the segments were reported.
pub fn build_annotations(
    segments: &[ProblematicSegment],
    located: &[Vec<MatchSpan>],
    regions: &[HighlightRegion],
    config: &EngineConfig,
) -> Vec<Annotation> {
    segments
        .iter()
        .enumerate()
        .map(|(index, segment)| {
            let ref_id = RefId::from_index(index);
            let occurrences = located.get(index).map_or(0, Vec::len);
            if occurrences == 0 {
                warn!(
                    ref_id = %ref_id,
                    excerpt = %segment.problematic_text,
                    "Problematic text not located in clause"
                );
            }

            let region_indices = regions
                .iter()
                .enumerate()
                .filter(|(_, region)| region.has_ref(&ref_id))
                .map(|(i, _)| i)
                .collect();
            let (preview, truncated) = preview(&segment.problematic_text, config.preview_chars);

            Annotation {
                index: index + 1,
                ref_id,
                preview,
                truncated,
                problematic_text: segment.problematic_text.clone(),
                explanation: segment.explanation.clone(),
                legal_reference: segment.legal_reference.clone(),
                severity: segment.severity,
                colors: segment.severity.colors(),
                occurrences,
                region_indices,
            }
        })
        .collect()
}

fn preview(text: &str, limit: usize) -> (String, bool) {
    let preview: String = text.chars().take(limit).collect();
    let truncated = text.chars().nth(limit).is_some();
    (preview, truncated)
}
