//! Interval merging with severity precedence
//!
//! Spans from all segments of a clause are swept left to right. A span that
//! starts at or before the end of the current region joins it, so touching
//! spans collapse into one region instead of rendering as two adjacent boxes.

use clause_types::{HighlightRegion, MatchSpan};

/// Merge located spans into ordered, non-overlapping regions.
///
/// Input order matters only for ties: spans are stably sorted by `start`, so
/// equal starts keep segment order and ref ids are recorded in first-seen
/// order.
pub fn merge_spans(spans: Vec<MatchSpan>) -> Vec<HighlightRegion> {
    merge_regions(spans.into_iter().map(HighlightRegion::from).collect())
}

/// Merge regions; applying this to its own output returns it unchanged.
pub fn merge_regions(mut regions: Vec<HighlightRegion>) -> Vec<HighlightRegion> {
    regions.sort_by_key(|region| region.start);

    let mut merged = Vec::with_capacity(regions.len());
    let mut iter = regions.into_iter();
    let mut current = match iter.next() {
        Some(first) => first,
        None => return merged,
    };

    for next in iter {
        if next.start <= current.end {
            absorb(&mut current, next);
        } else {
            merged.push(std::mem::replace(&mut current, next));
        }
    }
    merged.push(current);

    merged
}

fn absorb(current: &mut HighlightRegion, next: HighlightRegion) {
    current.end = current.end.max(next.end);
    current.severity = current.severity.max(next.severity);
    for ref_id in next.ref_ids {
        if !current.ref_ids.contains(&ref_id) {
            current.ref_ids.push(ref_id);
        }
    }
}
