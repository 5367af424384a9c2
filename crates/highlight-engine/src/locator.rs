//! Whitespace-tolerant excerpt search
//!
//! Excerpts come back from the risk analysis step with their spacing
//! occasionally reflowed. Each excerpt is turned into a literal pattern in
//! which every space matches one or more whitespace characters; everything
//! else, including regex metacharacters, matches itself. Matching is
//! case-sensitive.

use clause_types::{MatchSpan, ProblematicSegment, RefId};
use regex::Regex;

use crate::error::HighlightError;
use crate::normalize::normalize_whitespace;

/// Build the search pattern for an excerpt, or `None` if it is blank
pub fn excerpt_pattern(excerpt: &str) -> Option<String> {
    let normalized = normalize_whitespace(excerpt);
    if normalized.is_empty() {
        return None;
    }

    let words: Vec<String> = normalized.split(' ').map(regex::escape).collect();
    Some(words.join(r"\s+"))
}

/// Find every non-overlapping occurrence of `excerpt` in `normalized_text`.
///
/// Returns `(start, end)` character offsets, left to right. An excerpt that
/// does not occur yields an empty list.
pub fn find_text_positions(
    normalized_text: &str,
    excerpt: &str,
) -> Result<Vec<(usize, usize)>, regex::Error> {
    let pattern = match excerpt_pattern(excerpt) {
        Some(pattern) => pattern,
        None => return Ok(Vec::new()),
    };
    let regex = Regex::new(&pattern)?;

    let byte_ranges = regex
        .find_iter(normalized_text)
        .map(|m| (m.start(), m.end()));
    Ok(to_char_ranges(normalized_text, byte_ranges))
}

/// Locate every segment, preserving input order.
///
/// The outer vector is indexed like `segments`; each inner vector holds that
/// segment's spans in occurrence order.
pub fn locate_segments(
    normalized_text: &str,
    segments: &[ProblematicSegment],
) -> Result<Vec<Vec<MatchSpan>>, HighlightError> {
    segments
        .iter()
        .enumerate()
        .map(|(index, segment)| {
            let ref_id = RefId::from_index(index);
            let positions = find_text_positions(normalized_text, &segment.problematic_text)
                .map_err(|source| HighlightError::Pattern {
                    ref_id: ref_id.to_string(),
                    source,
                })?;

            Ok(positions
                .into_iter()
                .map(|(start, end)| MatchSpan {
                    start,
                    end,
                    ref_id: ref_id.clone(),
                    severity: segment.severity,
                })
                .collect())
        })
        .collect()
}

/// Convert ascending, non-overlapping byte ranges into character ranges
fn to_char_ranges(
    text: &str,
    byte_ranges: impl Iterator<Item = (usize, usize)>,
) -> Vec<(usize, usize)> {
    let mut last_byte = 0;
    let mut last_char = 0;
    let mut advance = |byte: usize| {
        last_char += text[last_byte..byte].chars().count();
        last_byte = byte;
        last_char
    };

    byte_ranges
        .map(|(start, end)| {
            let start = advance(start);
            let end = advance(end);
            (start, end)
        })
        .collect()
}
