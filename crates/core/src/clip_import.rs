//! Batch clip import from pasted text.
//!
//! One clip per line, in the form:
//!
//! ```text
//! MM:SS-MM:SS Description of the moment #tag-one #tag_two
//! ```
//!
//! Blank lines are skipped. Lines that do not match are collected in
//! [`ClipImport::rejected`] instead of aborting the whole import.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static CLIP_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}:\d{2})-(\d{1,2}:\d{2})\s+(.+)$").expect("valid regex")
});

static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[\w-]+").expect("valid regex"));

/// A clip parsed from one line of import text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedClip {
    pub start_time: String,
    pub end_time: String,
    pub start_seconds: i32,
    pub end_seconds: i32,
    pub duration_seconds: i32,
    pub description: String,
    /// Hashtags in order of appearance, without the leading `#`.
    pub tags: Vec<String>,
}

/// A non-blank line that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedLine {
    /// 1-based line number in the original text.
    pub line_number: usize,
    pub text: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClipImport {
    pub clips: Vec<ImportedClip>,
    pub rejected: Vec<RejectedLine>,
}

/// Convert an `M:SS` / `MM:SS` timecode into seconds.
///
/// Returns `None` if the value is malformed, the seconds part is 60 or
/// more, or the total does not fit in an `i32`.
pub fn parse_timecode(timecode: &str) -> Option<i32> {
    let (minutes, seconds) = timecode.split_once(':')?;
    let minutes: i32 = minutes.parse().ok()?;
    let seconds: i32 = seconds.parse().ok()?;
    if seconds >= 60 || minutes < 0 || seconds < 0 {
        return None;
    }
    minutes.checked_mul(60)?.checked_add(seconds)
}

/// Parse one import line. Returns the rejection reason on failure.
fn parse_line(line: &str) -> Result<ImportedClip, String> {
    let caps = CLIP_LINE_RE
        .captures(line)
        .ok_or_else(|| "Expected format: MM:SS-MM:SS Description #tags".to_string())?;

    let start_time = &caps[1];
    let end_time = &caps[2];
    let rest = &caps[3];

    let start_seconds =
        parse_timecode(start_time).ok_or_else(|| format!("Invalid start time '{start_time}'"))?;
    let end_seconds =
        parse_timecode(end_time).ok_or_else(|| format!("Invalid end time '{end_time}'"))?;
    if end_seconds < start_seconds {
        return Err(format!("End time {end_time} is before start time {start_time}"));
    }

    let tags = HASHTAG_RE
        .find_iter(rest)
        .map(|m| m.as_str()[1..].to_string())
        .collect();
    let description = HASHTAG_RE.replace_all(rest, "").trim().to_string();

    Ok(ImportedClip {
        start_time: start_time.to_string(),
        end_time: end_time.to_string(),
        start_seconds,
        end_seconds,
        duration_seconds: end_seconds - start_seconds,
        description,
        tags,
    })
}

/// Parse a block of import text into clips.
pub fn parse_clip_list(text: &str) -> ClipImport {
    let mut import = ClipImport::default();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(clip) => import.clips.push(clip),
            Err(reason) => import.rejected.push(RejectedLine {
                line_number: index + 1,
                text: line.to_string(),
                reason,
            }),
        }
    }

    import
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timecode_conversion() {
        assert_eq!(parse_timecode("00:10"), Some(10));
        assert_eq!(parse_timecode("1:05"), Some(65));
        assert_eq!(parse_timecode("12:59"), Some(779));
        assert_eq!(parse_timecode("01:60"), None);
        assert_eq!(parse_timecode("ab:10"), None);
        assert_eq!(parse_timecode("10"), None);
    }

    #[test]
    fn timecode_overflow_is_rejected() {
        assert_eq!(parse_timecode("35791394:07"), Some(i32::MAX));
        assert_eq!(parse_timecode("35791395:00"), None);
        assert_eq!(parse_timecode("35791394:08"), None);
    }

    #[test]
    fn oversized_timecode_line_is_rejected() {
        let import = parse_clip_list("0:00-35791395:00 Too long");
        assert!(import.clips.is_empty());
        assert_eq!(import.rejected.len(), 1);
    }

    #[test]
    fn parses_line_with_tags() {
        let import = parse_clip_list("00:10-01:05 Intro #ai #health-care");
        assert!(import.rejected.is_empty());
        assert_eq!(
            import.clips,
            vec![ImportedClip {
                start_time: "00:10".to_string(),
                end_time: "01:05".to_string(),
                start_seconds: 10,
                end_seconds: 65,
                duration_seconds: 55,
                description: "Intro".to_string(),
                tags: vec!["ai".to_string(), "health-care".to_string()],
            }]
        );
    }

    #[test]
    fn tags_in_the_middle_are_removed_from_description() {
        let import = parse_clip_list("2:00-2:30 On #ethics and policy");
        let clip = &import.clips[0];
        assert_eq!(clip.tags, vec!["ethics"]);
        assert_eq!(clip.description, "On  and policy");
    }

    #[test]
    fn line_without_tags() {
        let import = parse_clip_list("0:00-0:15 Cold open");
        assert_eq!(import.clips[0].description, "Cold open");
        assert!(import.clips[0].tags.is_empty());
    }

    #[test]
    fn skips_blank_lines_and_reports_bad_ones() {
        let text = "\n00:00-00:20 First #a\n   \nnot a clip\n00:30-00:20 Backwards\n00:40-01:00 Last";
        let import = parse_clip_list(text);

        assert_eq!(import.clips.len(), 2);
        assert_eq!(import.clips[1].description, "Last");

        assert_eq!(import.rejected.len(), 2);
        assert_eq!(import.rejected[0].line_number, 4);
        assert_eq!(import.rejected[0].text, "not a clip");
        assert_eq!(import.rejected[1].line_number, 5);
        assert!(import.rejected[1].reason.contains("before start"));
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(parse_clip_list(""), ClipImport::default());
    }
}
