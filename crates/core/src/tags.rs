//! Tag parsing, aggregation and provenance.
//!
//! Videos carry manually-assigned tags and every clip carries its own
//! granular tags, both stored as JSON-encoded string arrays. A video's
//! effective tag set is derived on read from the two sources:
//!
//! - `manual_tags`: the video's own parsed tags.
//! - `clip_tags`: the union of all clip tags, in first-occurrence order.
//! - `all_tags`: manual tags first, then clip tags not already present.
//!
//! Malformed tag data never fails a read. It degrades to an empty list and
//! is counted in [`VideoWithTags::degraded_sources`] so callers can log it.
//! Tags are compared by exact string match: no case folding, no trimming.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Source traits
// ---------------------------------------------------------------------------

/// A record that stores its tags as a serialized JSON array.
pub trait Tagged {
    /// The raw, unparsed `tags` column.
    fn raw_tags(&self) -> Option<&str>;
}

/// Fields a video exposes to free-text search.
pub trait SearchFields {
    fn title(&self) -> &str;
    fn subject_name(&self) -> Option<&str>;
}

impl<T: Tagged + ?Sized> Tagged for &T {
    fn raw_tags(&self) -> Option<&str> {
        (**self).raw_tags()
    }
}

// ---------------------------------------------------------------------------
// Ordered tag set
// ---------------------------------------------------------------------------

/// Insertion-ordered set of tags.
///
/// Iteration order is the order in which each tag was first inserted.
/// Equality is order-sensitive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(IndexSet<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag, returning `false` if it was already present. The
    /// position of an existing tag is never changed.
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        self.0.insert(tag.into())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl PartialEq for TagSet {
    fn eq(&self, other: &Self) -> bool {
        self.0.iter().eq(other.0.iter())
    }
}

impl Eq for TagSet {}

impl FromIterator<String> for TagSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<String> for TagSet {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a String;
    type IntoIter = indexmap::set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Why a non-empty raw tag value was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagParseIssue {
    /// The value is not valid JSON.
    InvalidJson,
    /// The value is valid JSON but not an array.
    NotAnArray,
}

/// Result of [`parse_tags_checked`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTags {
    pub tags: Vec<String>,
    /// Set when the input was present but had to be discarded.
    pub issue: Option<TagParseIssue>,
}

/// Parse a serialized tag list, reporting whether the input was discarded.
///
/// Absent, empty and whitespace-only input yields an empty list with no
/// issue. Array elements that are not strings are kept in their JSON text
/// form (`42`, `true`, `null`).
pub fn parse_tags_checked(raw: Option<&str>) -> ParsedTags {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return ParsedTags::default();
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => ParsedTags {
            tags: items.into_iter().map(value_to_tag).collect(),
            issue: None,
        },
        Ok(_) => ParsedTags {
            tags: Vec::new(),
            issue: Some(TagParseIssue::NotAnArray),
        },
        Err(_) => ParsedTags {
            tags: Vec::new(),
            issue: Some(TagParseIssue::InvalidJson),
        },
    }
}

/// Parse a serialized tag list. Never fails; anything unusable yields `[]`.
pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    parse_tags_checked(raw).tags
}

/// Serialize a tag list into the stored JSON form.
pub fn stringify_tags<S: AsRef<str>>(tags: &[S]) -> String {
    let tags: Vec<&str> = tags.iter().map(AsRef::as_ref).collect();
    // Serializing a slice of strings cannot fail.
    serde_json::to_string(&tags).unwrap_or_else(|_| "[]".to_string())
}

/// Strings are taken as-is. Any other element becomes its compact JSON text,
/// so `1.0` stays `1.0` and objects keep their braces.
fn value_to_tag(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Whether a serialized tag list contains every tag in `required`.
///
/// An empty `required` list matches everything.
pub fn has_all_tags<S: AsRef<str>>(raw: Option<&str>, required: &[S]) -> bool {
    if required.is_empty() {
        return true;
    }
    let tags = parse_tags(raw);
    required
        .iter()
        .all(|wanted| tags.iter().any(|t| t == wanted.as_ref()))
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// The tag sets derived from one video and its clips.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSummary {
    pub manual_tags: Vec<String>,
    pub clip_tags: TagSet,
    pub all_tags: TagSet,
    /// Number of sources (video or clips) whose tag data was malformed.
    pub degraded_sources: usize,
}

impl TagSummary {
    /// Derive the tag sets. Clips are consumed in the order given; the caller
    /// is responsible for passing only clips that belong to `video`.
    pub fn collect<'a, V, C, I>(video: &V, clips: I) -> Self
    where
        V: Tagged + ?Sized,
        C: Tagged + 'a,
        I: IntoIterator<Item = &'a C>,
    {
        let mut degraded_sources = 0;

        let manual = parse_tags_checked(video.raw_tags());
        if manual.issue.is_some() {
            degraded_sources += 1;
        }

        let mut clip_tags = TagSet::new();
        for clip in clips {
            let parsed = parse_tags_checked(clip.raw_tags());
            if parsed.issue.is_some() {
                degraded_sources += 1;
            }
            clip_tags.extend(parsed.tags);
        }

        let mut all_tags: TagSet = manual.tags.iter().cloned().collect();
        all_tags.extend(clip_tags.iter().map(str::to_string));

        Self {
            manual_tags: manual.tags,
            clip_tags,
            all_tags,
            degraded_sources,
        }
    }
}

/// A video together with its derived tag sets. Never persisted.
///
/// Serializes as every field of the wrapped video plus `manual_tags`,
/// `clip_tags` and `all_tags`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoWithTags<V> {
    #[serde(flatten)]
    pub video: V,
    pub manual_tags: Vec<String>,
    pub clip_tags: TagSet,
    pub all_tags: TagSet,
    #[serde(skip)]
    pub degraded_sources: usize,
}

/// Derive a [`VideoWithTags`] from a video and the clips that belong to it.
pub fn aggregate<'a, V, C, I>(video: V, clips: I) -> VideoWithTags<V>
where
    V: Tagged,
    C: Tagged + 'a,
    I: IntoIterator<Item = &'a C>,
{
    let summary = TagSummary::collect(&video, clips);
    VideoWithTags::from_summary(video, summary)
}

/// Where a video's tag came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagSource {
    Manual,
    Clips,
    Both,
}

impl TagSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Clips => "clips",
            Self::Both => "both",
        }
    }
}

impl std::fmt::Display for TagSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selector for [`VideoWithTags::tags_by_source`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagSourceFilter {
    Manual,
    Clips,
    #[default]
    All,
}

/// Tag counts shown alongside a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TagStats {
    pub total: usize,
    pub manual: usize,
    pub from_clips: usize,
}

impl<V> VideoWithTags<V> {
    pub fn from_summary(video: V, summary: TagSummary) -> Self {
        Self {
            video,
            manual_tags: summary.manual_tags,
            clip_tags: summary.clip_tags,
            all_tags: summary.all_tags,
            degraded_sources: summary.degraded_sources,
        }
    }

    /// Classify a tag's provenance.
    ///
    /// Returns `None` for a tag that is in neither source, which also means
    /// it is not a member of `all_tags`.
    pub fn tag_source(&self, tag: &str) -> Option<TagSource> {
        let in_manual = self.manual_tags.iter().any(|t| t == tag);
        let in_clips = self.clip_tags.contains(tag);

        match (in_manual, in_clips) {
            (true, true) => Some(TagSource::Both),
            (true, false) => Some(TagSource::Manual),
            (false, true) => Some(TagSource::Clips),
            (false, false) => None,
        }
    }

    /// The tags from one source, in display order.
    pub fn tags_by_source(&self, source: TagSourceFilter) -> Vec<&str> {
        match source {
            TagSourceFilter::Manual => self.manual_tags.iter().map(String::as_str).collect(),
            TagSourceFilter::Clips => self.clip_tags.iter().collect(),
            TagSourceFilter::All => self.all_tags.iter().collect(),
        }
    }

    pub fn tag_stats(&self) -> TagStats {
        TagStats {
            total: self.all_tags.len(),
            manual: self.manual_tags.len(),
            from_clips: self.clip_tags.len(),
        }
    }

    /// Whether any tag source was malformed and silently dropped.
    pub fn is_degraded(&self) -> bool {
        self.degraded_sources > 0
    }
}

impl<V: SearchFields> VideoWithTags<V> {
    /// Case-insensitive substring match against the title, the subject
    /// name and every aggregated tag.
    ///
    /// This is the second search stage. The store prefilters on raw JSON
    /// text, which can match across tag boundaries.
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.to_lowercase();

        self.video.title().to_lowercase().contains(&needle)
            || self
                .video
                .subject_name()
                .is_some_and(|s| s.to_lowercase().contains(&needle))
            || self
                .all_tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&needle))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
