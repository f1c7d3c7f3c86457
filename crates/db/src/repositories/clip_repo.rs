//! Repository for the `clips` table.

use genwise_core::search::contains_pattern;
use genwise_core::tags::stringify_tags;
use genwise_core::types::DbId;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use crate::models::clip::{Clip, ClipWithVideo, CreateClip, UpdateClip};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, video_id, start_time, end_time, start_seconds, end_seconds, \
    duration_seconds, title, description, transcript_snippet, tags, extracted_clip_url, \
    created_at";

/// Clip columns plus the parent video summary, for `clips c JOIN videos v`.
const JOINED_COLUMNS: &str = "c.id, c.video_id, c.start_time, c.end_time, c.start_seconds, \
    c.end_seconds, c.duration_seconds, c.title, c.description, c.transcript_snippet, c.tags, \
    c.extracted_clip_url, c.created_at, \
    v.id AS video_ref_id, v.title AS video_ref_title, v.program_id AS video_ref_program_id";

/// Playback order within a video.
const CLIP_ORDER: &str = "start_seconds NULLS LAST, created_at";

fn insert_query() -> String {
    format!(
        "INSERT INTO clips
            (video_id, start_time, end_time, start_seconds, end_seconds, duration_seconds,
             title, description, transcript_snippet, tags, extracted_clip_url)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
         RETURNING {COLUMNS}"
    )
}

fn bind_create<'q>(
    query: QueryAs<'q, Postgres, Clip, PgArguments>,
    input: &'q CreateClip,
) -> QueryAs<'q, Postgres, Clip, PgArguments> {
    let (start_seconds, end_seconds, duration_seconds) = input.resolved_seconds();
    query
        .bind(input.video_id)
        .bind(&input.start_time)
        .bind(&input.end_time)
        .bind(start_seconds)
        .bind(end_seconds)
        .bind(duration_seconds)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.transcript_snippet)
        .bind(stringify_tags(&input.tags))
        .bind(&input.extracted_clip_url)
}

/// Provides CRUD and lookup operations for clips.
pub struct ClipRepo;

impl ClipRepo {
    /// Insert a new clip, returning the created row.
    ///
    /// Missing second offsets are derived from the `MM:SS` timecodes.
    pub async fn create(pool: &PgPool, input: &CreateClip) -> Result<Clip, sqlx::Error> {
        let query = insert_query();
        bind_create(sqlx::query_as::<_, Clip>(&query), input)
            .fetch_one(pool)
            .await
    }

    /// Insert several clips in one transaction. Either all rows are created
    /// or none are.
    pub async fn create_many(pool: &PgPool, inputs: &[CreateClip]) -> Result<Vec<Clip>, sqlx::Error> {
        let query = insert_query();
        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(inputs.len());

        for input in inputs {
            let clip = bind_create(sqlx::query_as::<_, Clip>(&query), input)
                .fetch_one(&mut *tx)
                .await?;
            created.push(clip);
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Find a clip by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Clip>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clips WHERE id = $1");
        sqlx::query_as::<_, Clip>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every clip with its parent video summary, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<ClipWithVideo>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM clips c JOIN videos v ON v.id = c.video_id \
             ORDER BY c.created_at DESC"
        );
        sqlx::query_as::<_, ClipWithVideo>(&query)
            .fetch_all(pool)
            .await
    }

    /// List the clips of one video in playback order.
    pub async fn list_by_video(pool: &PgPool, video_id: DbId) -> Result<Vec<Clip>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM clips WHERE video_id = $1 ORDER BY {CLIP_ORDER}");
        sqlx::query_as::<_, Clip>(&query)
            .bind(video_id)
            .fetch_all(pool)
            .await
    }

    /// List the clips of several videos, grouped by video in playback order.
    pub async fn list_for_videos(
        pool: &PgPool,
        video_ids: &[DbId],
    ) -> Result<Vec<Clip>, sqlx::Error> {
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM clips WHERE video_id = ANY($1) ORDER BY video_id, {CLIP_ORDER}"
        );
        sqlx::query_as::<_, Clip>(&query)
            .bind(video_ids)
            .fetch_all(pool)
            .await
    }

    /// Case-insensitive substring search over title, description and the
    /// raw tags column, newest first.
    pub async fn search(pool: &PgPool, term: &str) -> Result<Vec<ClipWithVideo>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM clips c JOIN videos v ON v.id = c.video_id \
             WHERE c.title ILIKE $1 OR c.description ILIKE $1 OR c.tags ILIKE $1 \
             ORDER BY c.created_at DESC"
        );
        sqlx::query_as::<_, ClipWithVideo>(&query)
            .bind(contains_pattern(term))
            .fetch_all(pool)
            .await
    }

    /// Clips whose raw tags column contains `tag`, newest first.
    ///
    /// This is a substring match: `ai` also finds `ai-ethics`.
    pub async fn list_by_tag(pool: &PgPool, tag: &str) -> Result<Vec<ClipWithVideo>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM clips c JOIN videos v ON v.id = c.video_id \
             WHERE c.tags ILIKE $1 \
             ORDER BY c.created_at DESC"
        );
        sqlx::query_as::<_, ClipWithVideo>(&query)
            .bind(contains_pattern(tag))
            .fetch_all(pool)
            .await
    }

    /// Update a clip. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClip,
    ) -> Result<Option<Clip>, sqlx::Error> {
        let query = format!(
            "UPDATE clips SET
                start_time = COALESCE($2, start_time),
                end_time = COALESCE($3, end_time),
                start_seconds = COALESCE($4, start_seconds),
                end_seconds = COALESCE($5, end_seconds),
                duration_seconds = COALESCE($6, duration_seconds),
                title = COALESCE($7, title),
                description = COALESCE($8, description),
                transcript_snippet = COALESCE($9, transcript_snippet),
                tags = COALESCE($10, tags),
                extracted_clip_url = COALESCE($11, extracted_clip_url)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Clip>(&query)
            .bind(id)
            .bind(&input.start_time)
            .bind(&input.end_time)
            .bind(input.start_seconds)
            .bind(input.end_seconds)
            .bind(input.duration_seconds)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.transcript_snippet)
            .bind(input.tags.as_deref().map(stringify_tags))
            .bind(&input.extracted_clip_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete a clip. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clips WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
