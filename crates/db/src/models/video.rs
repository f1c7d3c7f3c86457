//! Video entity model, relation view and DTOs.

use chrono::NaiveDate;
use genwise_core::tags::{SearchFields, TagSummary, Tagged, VideoWithTags};
use genwise_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::clip::Clip;
use crate::models::post::ContentPost;
use crate::models::program::Program;

/// A row from the `videos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: DbId,
    pub program_id: Option<DbId>,
    pub title: String,
    pub subject_name: Option<String>,
    pub subject_role: Option<String>,
    pub subject_org: Option<String>,
    pub raw_video_url: Option<String>,
    pub raw_video_drive_id: Option<String>,
    pub edited_video_url: Option<String>,
    pub final_video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub transcript_text: Option<String>,
    pub captions_srt_url: Option<String>,
    pub duration_seconds: Option<i32>,
    pub recorded_date: Option<NaiveDate>,
    pub status: String,
    /// Manual video-level tags as a JSON string array. May be malformed.
    pub tags: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Tagged for Video {
    fn raw_tags(&self) -> Option<&str> {
        self.tags.as_deref()
    }
}

impl SearchFields for Video {
    fn title(&self) -> &str {
        &self.title
    }

    fn subject_name(&self) -> Option<&str> {
        self.subject_name.as_deref()
    }
}

/// A video with its program, clips and (on detail reads) posts.
///
/// Serializes as the video's own columns plus `program`, `clips` and
/// optionally `posts`.
#[derive(Debug, Clone, Serialize)]
pub struct VideoWithRelations {
    #[serde(flatten)]
    pub video: Video,
    pub program: Option<Program>,
    /// Ordered by `start_seconds`.
    pub clips: Vec<Clip>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<Vec<ContentPost>>,
}

impl VideoWithRelations {
    /// Run the tag aggregator over the video and its own clips.
    pub fn into_tagged(self) -> TaggedVideo {
        let summary = TagSummary::collect(&self, &self.clips);
        VideoWithTags::from_summary(self, summary)
    }
}

impl Tagged for VideoWithRelations {
    fn raw_tags(&self) -> Option<&str> {
        self.video.raw_tags()
    }
}

impl SearchFields for VideoWithRelations {
    fn title(&self) -> &str {
        self.video.title()
    }

    fn subject_name(&self) -> Option<&str> {
        self.video.subject_name()
    }
}

/// The view model returned by every video read.
pub type TaggedVideo = VideoWithTags<VideoWithRelations>;

/// DTO for creating a new video.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVideo {
    pub program_id: Option<DbId>,
    pub title: String,
    pub subject_name: Option<String>,
    pub subject_role: Option<String>,
    pub subject_org: Option<String>,
    pub raw_video_url: Option<String>,
    pub raw_video_drive_id: Option<String>,
    pub edited_video_url: Option<String>,
    pub final_video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub transcript_text: Option<String>,
    pub captions_srt_url: Option<String>,
    pub duration_seconds: Option<i32>,
    pub recorded_date: Option<NaiveDate>,
    /// Defaults to `draft` if omitted.
    pub status: Option<String>,
    /// Manual tags; serialized to a JSON array on insert.
    pub tags: Option<Vec<String>>,
}

/// DTO for updating an existing video. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVideo {
    pub program_id: Option<DbId>,
    pub title: Option<String>,
    pub subject_name: Option<String>,
    pub subject_role: Option<String>,
    pub subject_org: Option<String>,
    pub raw_video_url: Option<String>,
    pub raw_video_drive_id: Option<String>,
    pub edited_video_url: Option<String>,
    pub final_video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub transcript_text: Option<String>,
    pub captions_srt_url: Option<String>,
    pub duration_seconds: Option<i32>,
    pub recorded_date: Option<NaiveDate>,
    pub status: Option<String>,
    /// Replaces the manual tags. Clip tags are unaffected.
    pub tags: Option<Vec<String>>,
}

/// Filters for `GET /videos`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoListParams {
    pub program_id: Option<DbId>,
    pub status: Option<String>,
    /// Free-text search across title, subject name and aggregated tags.
    pub q: Option<String>,
}
