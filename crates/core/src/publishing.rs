//! Post composition and ordering for the scheduled-post publisher.
//!
//! The publisher itself (the process holding platform credentials) lives
//! outside this workspace. It pulls the due queue, posts the composed text
//! and reports the outcome back.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::types::DbId;

/// Character budget for a post body. Hashtags are only appended when the
/// result stays within it.
pub const MAX_POST_LENGTH: usize = 280;

/// Prefix for the `notes` column when publishing fails.
pub const FAILURE_NOTE_PREFIX: &str = "Auto-post failed: ";

static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[@#]?\w+").expect("valid regex"));

/// Parse a serialized `hashtags` / `mentions` list.
///
/// Accepts a JSON array. Text that is not JSON at all is treated as a
/// free-form list and split into `[@#]?\w+` tokens; JSON that is not an
/// array yields nothing.
pub fn parse_handles(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .map(|v| match v {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        Ok(_) => Vec::new(),
        Err(_) => HANDLE_RE
            .find_iter(raw)
            .map(|m| m.as_str().to_string())
            .collect(),
    }
}

fn with_prefix(value: &str, prefix: char) -> String {
    if value.starts_with(prefix) {
        value.to_string()
    } else {
        format!("{prefix}{value}")
    }
}

/// Build the text to publish from a caption, mentions and hashtags.
///
/// Mentions are `@`-prefixed and prepended to the caption. Hashtags are
/// `#`-prefixed and appended after a blank line, unless that would push the
/// post past [`MAX_POST_LENGTH`]. The caption itself is never truncated.
pub fn compose_post_text<S: AsRef<str>>(
    caption: Option<&str>,
    mentions: &[S],
    hashtags: &[S],
) -> String {
    let mut text = caption.unwrap_or_default().to_string();

    if !mentions.is_empty() {
        let handles: Vec<String> = mentions
            .iter()
            .map(|m| with_prefix(m.as_ref(), '@'))
            .collect();
        text = format!("{} {text}", handles.join(" "));
    }

    if !hashtags.is_empty() {
        let tags: Vec<String> = hashtags
            .iter()
            .map(|h| with_prefix(h.as_ref(), '#'))
            .collect();
        let tag_line = tags.join(" ");
        if text.chars().count() + tag_line.chars().count() + 2 <= MAX_POST_LENGTH {
            text = format!("{text}\n\n{tag_line}");
        }
    }

    text
}

/// Whether composed text exceeds the standard post length.
pub fn exceeds_post_length(text: &str) -> bool {
    text.chars().count() > MAX_POST_LENGTH
}

/// Build the `notes` value recorded for a failed publish attempt.
pub fn failure_note(error: &str) -> String {
    format!("{FAILURE_NOTE_PREFIX}{error}")
}

/// A post that may be part of a reply thread.
pub trait ThreadMember {
    fn parent_post_id(&self) -> Option<DbId>;
    fn thread_position(&self) -> Option<i32>;
}

/// Order due posts so thread parents are published before their replies:
/// root posts first, then replies by `thread_position`. The sort is stable.
pub fn sort_for_publishing<T: ThreadMember>(posts: &mut [T]) {
    posts.sort_by_key(|p| {
        (
            p.parent_post_id().is_some(),
            p.thread_position().unwrap_or(0),
        )
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
