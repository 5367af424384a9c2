//! Property tests for the locate → merge → annotate pipeline

use clause_types::{HighlightRegion, MatchSpan, ProblematicSegment, RefId, Severity};
use proptest::prelude::*;

use crate::locator::{find_text_positions, locate_segments};
use crate::merge::{merge_regions, merge_spans};
use crate::normalize::normalize_whitespace;
use crate::HighlightEngine;

fn severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Low),
        Just(Severity::Medium),
        Just(Severity::High)
    ]
}

fn segments() -> impl Strategy<Value = Vec<ProblematicSegment>> {
    prop::collection::vec(
        ("[ab \n]{0,6}", severity()).prop_map(|(text, severity)| {
            ProblematicSegment::new(text, "explanation").with_severity(severity)
        }),
        0..6,
    )
}

fn spans() -> impl Strategy<Value = Vec<MatchSpan>> {
    prop::collection::vec(
        (0usize..40, 1usize..8, 0usize..5, severity()).prop_map(|(start, len, id, severity)| {
            MatchSpan {
                start,
                end: start + len,
                ref_id: RefId::from_index(id),
                severity,
            }
        }),
        0..12,
    )
}

fn whitespace() -> impl Strategy<Value = String> {
    "[ \t\n]{1,3}"
}

proptest! {
    /// Property: an excerpt taken from the text modulo whitespace is always found
    #[test]
    fn excerpt_from_text_is_located(
        words in prop::collection::vec("[A-Za-z0-9.,()]{1,6}", 1..10),
        seps in prop::collection::vec(whitespace(), 10),
        excerpt_seps in prop::collection::vec(whitespace(), 10),
        range in (0usize..10, 1usize..10),
    ) {
        let text: String = words
            .iter()
            .zip(seps.iter())
            .map(|(w, s)| format!("{}{}", w, s))
            .collect();
        let start = range.0 % words.len();
        let end = (start + range.1).min(words.len());
        let excerpt: String = words[start..end]
            .iter()
            .zip(excerpt_seps.iter())
            .map(|(w, s)| format!("{}{}", s, w))
            .collect();

        let normalized = normalize_whitespace(&text);
        let positions = find_text_positions(&normalized, &excerpt).unwrap();
        prop_assert!(!positions.is_empty());
    }

    /// Property: every reported match reads exactly as the normalized excerpt
    #[test]
    fn matches_are_exact(text in "[abAB \n]{0,40}", excerpt in "[abAB \n]{0,6}") {
        let normalized = normalize_whitespace(&text);
        let wanted = normalize_whitespace(&excerpt);
        let chars: Vec<char> = normalized.chars().collect();

        for (start, end) in find_text_positions(&normalized, &excerpt).unwrap() {
            prop_assert!(start < end && end <= chars.len());
            let found: String = chars[start..end].iter().collect();
            prop_assert_eq!(&found, &wanted);
        }
    }

    /// Property: runs reproduce the normalized text with no loss or duplication
    #[test]
    fn runs_cover_normalized_text(text in "[ab \n\té]{0,60}", segments in segments()) {
        let doc = HighlightEngine::new().annotate(&text, &segments).unwrap();
        prop_assert_eq!(doc.rendered_text(), doc.normalized_text.clone());
        prop_assert_eq!(doc.normalized_text, normalize_whitespace(&text));
    }

    /// Property: regions are ordered, disjoint and separated
    #[test]
    fn regions_never_overlap(text in "[ab ]{0,60}", segments in segments()) {
        let doc = HighlightEngine::new().annotate(&text, &segments).unwrap();
        for pair in doc.regions.windows(2) {
            prop_assert!(pair[0].region.end < pair[1].region.start);
        }
    }

    /// Property: each span lands in exactly one region of at least its severity
    #[test]
    fn spans_contained_with_monotone_severity(text in "[ab ]{0,60}", segments in segments()) {
        let normalized = normalize_whitespace(&text);
        let located = locate_segments(&normalized, &segments).unwrap();
        let all: Vec<MatchSpan> = located.iter().flatten().cloned().collect();
        let regions = merge_spans(all.clone());

        for span in &all {
            let containing: Vec<&HighlightRegion> =
                regions.iter().filter(|r| r.contains_span(span)).collect();
            prop_assert_eq!(containing.len(), 1);
            prop_assert!(containing[0].severity >= span.severity);
            prop_assert!(containing[0].has_ref(&span.ref_id));
        }
    }

    /// Property: one annotation per segment, and every region ref resolves to one
    #[test]
    fn annotations_complete(text in "[ab ]{0,60}", segments in segments()) {
        let doc = HighlightEngine::new().annotate(&text, &segments).unwrap();
        prop_assert_eq!(doc.annotations.len(), segments.len());
        for display in &doc.regions {
            for ref_id in &display.region.ref_ids {
                let matching = doc.annotations.iter().filter(|a| &a.ref_id == ref_id).count();
                prop_assert_eq!(matching, 1);
            }
        }
    }

    /// Property: merging merged output changes nothing
    #[test]
    fn merge_idempotent(spans in spans()) {
        let once = merge_spans(spans);
        let twice = merge_regions(once.clone());
        prop_assert_eq!(once, twice);
    }

    /// Property: normalization never panics and is idempotent
    #[test]
    fn normalize_idempotent(text in "\\PC*") {
        let once = normalize_whitespace(&text);
        prop_assert_eq!(normalize_whitespace(&once), once.clone());
        prop_assert!(!once.starts_with(' ') && !once.ends_with(' '));
        prop_assert!(!once.contains("  "));
    }
}
