use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Risk level attached to a flagged excerpt.
///
/// Variants are declared lowest first so the derived `Ord` gives
/// `Low < Medium < High`, which is the precedence used when regions merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl Severity {
    /// Legend order, most severe first
    pub const ALL: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];

    /// Parse a severity hint, falling back to `Medium` for anything unrecognized
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            _ => Severity::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    /// Capitalized label shown in legends
    pub fn label(&self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }

    pub fn colors(&self) -> ColorTokens {
        let (background, border, text) = match self {
            Severity::High => ("rgba(255, 0, 0, 0.15)", "rgba(255, 0, 0, 0.6)", "#990000"),
            Severity::Medium => ("rgba(255, 153, 0, 0.15)", "rgba(255, 153, 0, 0.6)", "#b36b00"),
            Severity::Low => ("rgba(255, 204, 0, 0.15)", "rgba(255, 204, 0, 0.6)", "#806600"),
        };
        ColorTokens {
            background: background.to_string(),
            border: border.to_string(),
            text: text.to_string(),
        }
    }
}

impl From<String> for Severity {
    fn from(value: String) -> Self {
        Severity::parse_lenient(&value)
    }
}

impl From<&str> for Severity {
    fn from(value: &str) -> Self {
        Severity::parse_lenient(value)
    }
}

/// Accepts any value: strings parse leniently, everything else is `Medium`.
impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SeverityVisitor)
    }
}

struct SeverityVisitor;

impl<'de> Visitor<'de> for SeverityVisitor {
    type Value = Severity;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a severity level")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Severity, E> {
        Ok(Severity::parse_lenient(value))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Severity, E> {
        Ok(Severity::Medium)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Severity, E> {
        Ok(Severity::Medium)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Severity, E> {
        Ok(Severity::Medium)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Severity, E> {
        Ok(Severity::Medium)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Severity, E> {
        Ok(Severity::Medium)
    }

    fn visit_none<E: de::Error>(self) -> Result<Severity, E> {
        Ok(Severity::Medium)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Severity, D::Error> {
        Severity::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Severity, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Severity::Medium)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Severity, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Severity::Medium)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CSS color tokens for one severity level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorTokens {
    pub background: String,
    pub border: String,
    pub text: String,
}

/// One legend row: severity, display label and its colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub severity: Severity,
    pub label: String,
    pub colors: ColorTokens,
}

/// The fixed severity legend (high, medium, low).
pub fn severity_legend() -> Vec<LegendEntry> {
    Severity::ALL
        .iter()
        .map(|severity| LegendEntry {
            severity: *severity,
            label: severity.label().to_string(),
            colors: severity.colors(),
        })
        .collect()
}

/// Stable identifier tying highlights back to the segment that produced them.
///
/// Derived from input order: the first segment is `"1"`, the second `"2"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefId(String);

impl RefId {
    /// Ref id for the segment at zero-based `index`
    pub fn from_index(index: usize) -> Self {
        RefId((index + 1).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RefId {
    fn from(value: &str) -> Self {
        RefId(value.to_string())
    }
}

impl fmt::Display for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A flagged excerpt reported against a clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblematicSegment {
    /// Excerpt believed to occur in the clause, modulo whitespace
    pub problematic_text: String,
    pub explanation: String,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub legal_reference: Option<String>,
    #[serde(default)]
    pub severity: Severity,
}

impl ProblematicSegment {
    pub fn new(problematic_text: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            problematic_text: problematic_text.into(),
            explanation: explanation.into(),
            legal_reference: None,
            severity: Severity::default(),
        }
    }

    /// Legacy callers pass bare excerpts; the excerpt doubles as its explanation.
    pub fn from_plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(text.clone(), text)
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_legal_reference(mut self, reference: impl Into<String>) -> Self {
        let reference = reference.into();
        self.legal_reference = if reference.trim().is_empty() {
            None
        } else {
            Some(reference)
        };
        self
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|reference| !reference.trim().is_empty()))
}

/// One located occurrence of a segment's excerpt.
///
/// Offsets are character offsets into the whitespace-normalized clause text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
    pub ref_id: RefId,
    pub severity: Severity,
}

/// A merged, non-overlapping highlighted range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRegion {
    pub start: usize,
    pub end: usize,
    /// Contributing segments, first-seen order, no duplicates
    pub ref_ids: Vec<RefId>,
    /// Highest severity among the contributing spans
    pub severity: Severity,
}

impl HighlightRegion {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn has_ref(&self, ref_id: &RefId) -> bool {
        self.ref_ids.contains(ref_id)
    }

    pub fn contains_span(&self, span: &MatchSpan) -> bool {
        self.start <= span.start && span.end <= self.end
    }

    /// Comma-joined ref ids, e.g. `"1,2"`
    pub fn joined_ref_ids(&self) -> String {
        self.ref_ids
            .iter()
            .map(RefId::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl From<MatchSpan> for HighlightRegion {
    fn from(span: MatchSpan) -> Self {
        HighlightRegion {
            start: span.start,
            end: span.end,
            ref_ids: vec![span.ref_id],
            severity: span.severity,
        }
    }
}
