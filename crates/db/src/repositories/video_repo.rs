//! Repository for the `videos` table.
//!
//! Every read that returns videos to callers goes through
//! [`VideoRepo::attach_relations`], which loads programs and clips in bulk
//! and runs the tag aggregator on each video.

use std::collections::HashMap;

use genwise_core::search::contains_pattern;
use genwise_core::tags::stringify_tags;
use genwise_core::types::DbId;
use sqlx::PgPool;

use crate::models::clip::Clip;
use crate::models::program::Program;
use crate::models::video::{
    CreateVideo, TaggedVideo, UpdateVideo, Video, VideoListParams, VideoWithRelations,
};
use crate::repositories::{ClipRepo, PostRepo, ProgramRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, program_id, title, subject_name, subject_role, subject_org, \
    raw_video_url, raw_video_drive_id, edited_video_url, final_video_url, thumbnail_url, \
    transcript_text, captions_srt_url, duration_seconds, recorded_date, status, tags, \
    created_at, updated_at";

/// Provides CRUD and tag-aware search for videos.
pub struct VideoRepo;

impl VideoRepo {
    /// Insert a new video, returning the created row.
    ///
    /// If `status` is `None` in the input, defaults to `draft`.
    pub async fn create(pool: &PgPool, input: &CreateVideo) -> Result<Video, sqlx::Error> {
        let query = format!(
            "INSERT INTO videos
                (program_id, title, subject_name, subject_role, subject_org, raw_video_url,
                 raw_video_drive_id, edited_video_url, final_video_url, thumbnail_url,
                 transcript_text, captions_srt_url, duration_seconds, recorded_date, status, tags)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                     COALESCE($15, 'draft'), $16)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(input.program_id)
            .bind(&input.title)
            .bind(&input.subject_name)
            .bind(&input.subject_role)
            .bind(&input.subject_org)
            .bind(&input.raw_video_url)
            .bind(&input.raw_video_drive_id)
            .bind(&input.edited_video_url)
            .bind(&input.final_video_url)
            .bind(&input.thumbnail_url)
            .bind(&input.transcript_text)
            .bind(&input.captions_srt_url)
            .bind(input.duration_seconds)
            .bind(input.recorded_date)
            .bind(&input.status)
            .bind(input.tags.as_deref().map(stringify_tags))
            .fetch_one(pool)
            .await
    }

    /// Find a bare video row by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a video with its program, clips and posts, tags aggregated.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<TaggedVideo>, sqlx::Error> {
        let Some(video) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let posts = PostRepo::list_by_video(pool, id).await?;

        let mut tagged = Self::attach_relations(pool, vec![video]).await?;
        let mut detail = tagged.pop();
        if let Some(detail) = detail.as_mut() {
            detail.video.posts = Some(posts);
        }
        Ok(detail)
    }

    /// List videos newest first, optionally filtered by program and status.
    pub async fn list(
        pool: &PgPool,
        params: &VideoListParams,
    ) -> Result<Vec<TaggedVideo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM videos
             WHERE ($1::uuid IS NULL OR program_id = $1)
               AND ($2::text IS NULL OR status = $2)
             ORDER BY created_at DESC"
        );
        let videos = sqlx::query_as::<_, Video>(&query)
            .bind(params.program_id)
            .bind(&params.status)
            .fetch_all(pool)
            .await?;

        Self::attach_relations(pool, videos).await
    }

    /// Tag-aware free-text search, newest first.
    ///
    /// The SQL stage is a broad `ILIKE` prefilter over the title, subject
    /// name, the raw manual tags and the raw tags of the video's clips. The
    /// aggregated view is then matched exactly with
    /// [`VideoWithTags::matches_search`](genwise_core::tags::VideoWithTags::matches_search).
    /// Program and status filters from `params` still apply.
    pub async fn search(
        pool: &PgPool,
        term: &str,
        params: &VideoListParams,
    ) -> Result<Vec<TaggedVideo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM videos v
             WHERE (v.title ILIKE $1
                    OR v.subject_name ILIKE $1
                    OR v.tags ILIKE $1
                    OR EXISTS (SELECT 1 FROM clips c WHERE c.video_id = v.id AND c.tags ILIKE $1))
               AND ($2::uuid IS NULL OR v.program_id = $2)
               AND ($3::text IS NULL OR v.status = $3)
             ORDER BY v.created_at DESC"
        );
        let candidates = sqlx::query_as::<_, Video>(&query)
            .bind(contains_pattern(term))
            .bind(params.program_id)
            .bind(&params.status)
            .fetch_all(pool)
            .await?;

        let candidate_count = candidates.len();
        let matches: Vec<TaggedVideo> = Self::attach_relations(pool, candidates)
            .await?
            .into_iter()
            .filter(|v| v.matches_search(term))
            .collect();

        tracing::debug!(
            term,
            candidates = candidate_count,
            matches = matches.len(),
            "Video search completed",
        );
        Ok(matches)
    }

    /// Update a video. Only non-`None` fields in `input` are applied and
    /// `updated_at` is bumped.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVideo,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET
                program_id = COALESCE($2, program_id),
                title = COALESCE($3, title),
                subject_name = COALESCE($4, subject_name),
                subject_role = COALESCE($5, subject_role),
                subject_org = COALESCE($6, subject_org),
                raw_video_url = COALESCE($7, raw_video_url),
                raw_video_drive_id = COALESCE($8, raw_video_drive_id),
                edited_video_url = COALESCE($9, edited_video_url),
                final_video_url = COALESCE($10, final_video_url),
                thumbnail_url = COALESCE($11, thumbnail_url),
                transcript_text = COALESCE($12, transcript_text),
                captions_srt_url = COALESCE($13, captions_srt_url),
                duration_seconds = COALESCE($14, duration_seconds),
                recorded_date = COALESCE($15, recorded_date),
                status = COALESCE($16, status),
                tags = COALESCE($17, tags),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(input.program_id)
            .bind(&input.title)
            .bind(&input.subject_name)
            .bind(&input.subject_role)
            .bind(&input.subject_org)
            .bind(&input.raw_video_url)
            .bind(&input.raw_video_drive_id)
            .bind(&input.edited_video_url)
            .bind(&input.final_video_url)
            .bind(&input.thumbnail_url)
            .bind(&input.transcript_text)
            .bind(&input.captions_srt_url)
            .bind(input.duration_seconds)
            .bind(input.recorded_date)
            .bind(&input.status)
            .bind(input.tags.as_deref().map(stringify_tags))
            .fetch_optional(pool)
            .await
    }

    /// Delete a video and, by cascade, its clips.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load programs and clips for a batch of videos and aggregate tags.
    ///
    /// Input order is preserved. Each video receives only its own clips,
    /// in playback order.
    pub async fn attach_relations(
        pool: &PgPool,
        videos: Vec<Video>,
    ) -> Result<Vec<TaggedVideo>, sqlx::Error> {
        if videos.is_empty() {
            return Ok(Vec::new());
        }

        let video_ids: Vec<DbId> = videos.iter().map(|v| v.id).collect();
        let mut program_ids: Vec<DbId> = videos.iter().filter_map(|v| v.program_id).collect();
        program_ids.sort_unstable();
        program_ids.dedup();

        let programs: HashMap<DbId, Program> = ProgramRepo::find_many(pool, &program_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let mut clips_by_video: HashMap<DbId, Vec<Clip>> = HashMap::new();
        for clip in ClipRepo::list_for_videos(pool, &video_ids).await? {
            clips_by_video.entry(clip.video_id).or_default().push(clip);
        }

        let tagged = videos
            .into_iter()
            .map(|video| {
                let relations = VideoWithRelations {
                    program: video.program_id.and_then(|id| programs.get(&id).cloned()),
                    clips: clips_by_video.remove(&video.id).unwrap_or_default(),
                    posts: None,
                    video,
                };
                let tagged = relations.into_tagged();
                if tagged.is_degraded() {
                    tracing::warn!(
                        video_id = %tagged.video.video.id,
                        degraded_sources = tagged.degraded_sources,
                        "Ignored malformed tag data during aggregation",
                    );
                }
                tagged
            })
            .collect();

        Ok(tagged)
    }
}
