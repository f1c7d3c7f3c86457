//! Clip entity model and DTOs.

use genwise_core::clip_import::{parse_timecode, ImportedClip};
use genwise_core::tags::Tagged;
use genwise_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `clips` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Clip {
    pub id: DbId,
    pub video_id: DbId,
    /// `MM:SS` timecode as entered.
    pub start_time: String,
    pub end_time: String,
    pub start_seconds: Option<i32>,
    pub end_seconds: Option<i32>,
    pub duration_seconds: Option<i32>,
    pub title: Option<String>,
    pub description: String,
    pub transcript_snippet: Option<String>,
    /// Clip-level tags as a JSON string array. May be malformed.
    pub tags: String,
    pub extracted_clip_url: Option<String>,
    pub created_at: Timestamp,
}

impl Tagged for Clip {
    fn raw_tags(&self) -> Option<&str> {
        Some(self.tags.as_str())
    }
}

/// The parent video fields listed next to a clip.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClipVideoRef {
    #[sqlx(rename = "video_ref_id")]
    pub id: DbId,
    #[sqlx(rename = "video_ref_title")]
    pub title: String,
    #[sqlx(rename = "video_ref_program_id")]
    pub program_id: Option<DbId>,
}

/// A clip joined with a summary of its parent video.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClipWithVideo {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub clip: Clip,
    #[sqlx(flatten)]
    pub video: ClipVideoRef,
}

/// DTO for creating a new clip.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClip {
    pub video_id: DbId,
    pub start_time: String,
    pub end_time: String,
    /// Derived from `start_time` when omitted.
    pub start_seconds: Option<i32>,
    /// Derived from `end_time` when omitted.
    pub end_seconds: Option<i32>,
    /// Derived from the start/end seconds when omitted.
    pub duration_seconds: Option<i32>,
    pub title: Option<String>,
    pub description: String,
    pub transcript_snippet: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub extracted_clip_url: Option<String>,
}

impl CreateClip {
    /// Start, end and duration in seconds, deriving any value the caller
    /// left out from the timecodes. A duration that would overflow is `None`.
    pub fn resolved_seconds(&self) -> (Option<i32>, Option<i32>, Option<i32>) {
        let start = self.start_seconds.or_else(|| parse_timecode(&self.start_time));
        let end = self.end_seconds.or_else(|| parse_timecode(&self.end_time));
        let duration = self.duration_seconds.or(match (start, end) {
            (Some(s), Some(e)) => e.checked_sub(s),
            _ => None,
        });
        (start, end, duration)
    }

    /// Build a create DTO from one parsed line of a batch import.
    pub fn from_import(video_id: DbId, clip: ImportedClip) -> Self {
        Self {
            video_id,
            start_time: clip.start_time,
            end_time: clip.end_time,
            start_seconds: Some(clip.start_seconds),
            end_seconds: Some(clip.end_seconds),
            duration_seconds: Some(clip.duration_seconds),
            title: None,
            description: clip.description,
            transcript_snippet: None,
            tags: clip.tags,
            extracted_clip_url: None,
        }
    }
}

/// DTO for updating an existing clip. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClip {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub start_seconds: Option<i32>,
    pub end_seconds: Option<i32>,
    pub duration_seconds: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub transcript_snippet: Option<String>,
    pub tags: Option<Vec<String>>,
    pub extracted_clip_url: Option<String>,
}

/// Query parameters for `GET /clips`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClipListParams {
    /// Free-text search across title, description and raw tags.
    pub q: Option<String>,
    /// Single-tag lookup (substring match on the raw tags column).
    pub tag: Option<String>,
    /// Comma-separated tags; a clip must carry all of them exactly.
    pub tags: Option<String>,
    pub program_id: Option<DbId>,
}

/// Request body for `POST /videos/{id}/clips/import`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportClipsRequest {
    pub text: String,
}
