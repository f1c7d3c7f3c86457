//! Repository for the `content_posts` table, including the scheduled-post
//! publishing queue.

use genwise_core::content::PostStatus;
use genwise_core::publishing::sort_for_publishing;
use genwise_core::tags::stringify_tags;
use genwise_core::types::{DbId, Timestamp};
use sqlx::{FromRow, PgPool};

use crate::models::post::{
    ContentPost, CreatePost, PostClipRef, PostDetail, PostListParams, PostVideoRef, PostWithRefs,
    UpdatePost,
};
use crate::repositories::{ClipRepo, VideoRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, video_id, clip_id, custom_asset_url, platform, post_type, title, \
    caption, hashtags, mentions, status, assigned_to, priority, idea_date, target_date, \
    scheduled_date, posted_at, platform_url, platform_id, parent_post_id, thread_position, \
    views, likes, shares, comments, saves, notes, created_at, updated_at";

/// Post columns plus source summaries, for `content_posts p LEFT JOIN videos v LEFT JOIN clips c`.
const JOINED_COLUMNS: &str = "p.id, p.video_id, p.clip_id, p.custom_asset_url, p.platform, \
    p.post_type, p.title, p.caption, p.hashtags, p.mentions, p.status, p.assigned_to, \
    p.priority, p.idea_date, p.target_date, p.scheduled_date, p.posted_at, p.platform_url, \
    p.platform_id, p.parent_post_id, p.thread_position, p.views, p.likes, p.shares, \
    p.comments, p.saves, p.notes, p.created_at, p.updated_at, \
    v.title AS ref_video_title, c.description AS ref_clip_description";

const JOINS: &str = "content_posts p \
    LEFT JOIN videos v ON v.id = p.video_id \
    LEFT JOIN clips c ON c.id = p.clip_id";

/// Flat row produced by [`JOINED_COLUMNS`].
#[derive(FromRow)]
struct PostRefRow {
    #[sqlx(flatten)]
    post: ContentPost,
    ref_video_title: Option<String>,
    ref_clip_description: Option<String>,
}

impl From<PostRefRow> for PostWithRefs {
    fn from(row: PostRefRow) -> Self {
        let video = row
            .post
            .video_id
            .zip(row.ref_video_title)
            .map(|(id, title)| PostVideoRef { id, title });
        let clip = row
            .post
            .clip_id
            .zip(row.ref_clip_description)
            .map(|(id, description)| PostClipRef { id, description });
        Self {
            post: row.post,
            video,
            clip,
        }
    }
}

/// Provides CRUD operations and the publishing queue for content posts.
pub struct PostRepo;

impl PostRepo {
    /// Insert a new post, returning the created row.
    ///
    /// `status` defaults to `idea` and `priority` to `normal`.
    pub async fn create(pool: &PgPool, input: &CreatePost) -> Result<ContentPost, sqlx::Error> {
        let query = format!(
            "INSERT INTO content_posts
                (video_id, clip_id, custom_asset_url, platform, post_type, title, caption,
                 hashtags, mentions, status, assigned_to, priority, idea_date, target_date,
                 scheduled_date, parent_post_id, thread_position, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, 'idea'), $11,
                     COALESCE($12, 'normal'), $13, $14, $15, $16, $17, $18)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentPost>(&query)
            .bind(input.video_id)
            .bind(input.clip_id)
            .bind(&input.custom_asset_url)
            .bind(&input.platform)
            .bind(&input.post_type)
            .bind(&input.title)
            .bind(&input.caption)
            .bind(input.hashtags.as_deref().map(stringify_tags))
            .bind(input.mentions.as_deref().map(stringify_tags))
            .bind(&input.status)
            .bind(&input.assigned_to)
            .bind(&input.priority)
            .bind(input.idea_date)
            .bind(input.target_date)
            .bind(input.scheduled_date)
            .bind(input.parent_post_id)
            .bind(input.thread_position)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a post by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ContentPost>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content_posts WHERE id = $1");
        sqlx::query_as::<_, ContentPost>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a post with its full source video and clip.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<PostDetail>, sqlx::Error> {
        let Some(post) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let video = match post.video_id {
            Some(video_id) => VideoRepo::find_by_id(pool, video_id).await?,
            None => None,
        };
        let clip = match post.clip_id {
            Some(clip_id) => ClipRepo::find_by_id(pool, clip_id).await?,
            None => None,
        };

        Ok(Some(PostDetail { post, video, clip }))
    }

    /// List posts newest first, optionally filtered by status and platform.
    pub async fn list(
        pool: &PgPool,
        params: &PostListParams,
    ) -> Result<Vec<PostWithRefs>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM {JOINS}
             WHERE ($1::text IS NULL OR p.status = $1)
               AND ($2::text IS NULL OR p.platform = $2)
             ORDER BY p.created_at DESC"
        );
        let rows = sqlx::query_as::<_, PostRefRow>(&query)
            .bind(&params.status)
            .bind(&params.platform)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(PostWithRefs::from).collect())
    }

    /// List the posts created from one video, newest first.
    pub async fn list_by_video(
        pool: &PgPool,
        video_id: DbId,
    ) -> Result<Vec<ContentPost>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_posts WHERE video_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ContentPost>(&query)
            .bind(video_id)
            .fetch_all(pool)
            .await
    }

    /// Posts that are `ready` or `scheduled` and have a target date, soonest
    /// first.
    pub async fn upcoming(pool: &PgPool, limit: i64) -> Result<Vec<PostWithRefs>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM {JOINS}
             WHERE p.status IN ('ready', 'scheduled')
               AND p.target_date IS NOT NULL
             ORDER BY p.target_date
             LIMIT $1"
        );
        let rows = sqlx::query_as::<_, PostRefRow>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(PostWithRefs::from).collect())
    }

    /// Scheduled posts for `platform` whose scheduled date is unset or not
    /// after `now`, in publishing order (thread roots before replies).
    pub async fn list_due(
        pool: &PgPool,
        platform: &str,
        now: Timestamp,
    ) -> Result<Vec<ContentPost>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_posts
             WHERE status = $1
               AND platform = $2
               AND (scheduled_date IS NULL OR scheduled_date <= $3)
             ORDER BY scheduled_date NULLS FIRST, created_at"
        );
        let mut posts = sqlx::query_as::<_, ContentPost>(&query)
            .bind(PostStatus::Scheduled.as_str())
            .bind(platform)
            .bind(now)
            .fetch_all(pool)
            .await?;
        sort_for_publishing(&mut posts);
        Ok(posts)
    }

    /// The platform id of a parent post, only once the parent is `posted`.
    pub async fn parent_platform_id(
        pool: &PgPool,
        parent_post_id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(Option<String>,)> = sqlx::query_as(
            "SELECT platform_id FROM content_posts WHERE id = $1 AND status = $2",
        )
        .bind(parent_post_id)
        .bind(PostStatus::Posted.as_str())
        .fetch_optional(pool)
        .await?;
        Ok(row.and_then(|(platform_id,)| platform_id))
    }

    /// Record a successful publish.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn mark_posted(
        pool: &PgPool,
        id: DbId,
        platform_id: &str,
        platform_url: Option<&str>,
    ) -> Result<Option<ContentPost>, sqlx::Error> {
        let query = format!(
            "UPDATE content_posts SET
                status = $2,
                posted_at = NOW(),
                platform_id = $3,
                platform_url = $4,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentPost>(&query)
            .bind(id)
            .bind(PostStatus::Posted.as_str())
            .bind(platform_id)
            .bind(platform_url)
            .fetch_optional(pool)
            .await
    }

    /// Record a failed publish, replacing `notes` with the failure note.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn mark_failed(
        pool: &PgPool,
        id: DbId,
        note: &str,
    ) -> Result<Option<ContentPost>, sqlx::Error> {
        let query = format!(
            "UPDATE content_posts SET
                status = $2,
                notes = $3,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentPost>(&query)
            .bind(id)
            .bind(PostStatus::Failed.as_str())
            .bind(note)
            .fetch_optional(pool)
            .await
    }

    /// Update a post. Only non-`None` fields in `input` are applied and
    /// `updated_at` is bumped.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePost,
    ) -> Result<Option<ContentPost>, sqlx::Error> {
        let query = format!(
            "UPDATE content_posts SET
                video_id = COALESCE($2, video_id),
                clip_id = COALESCE($3, clip_id),
                custom_asset_url = COALESCE($4, custom_asset_url),
                platform = COALESCE($5, platform),
                post_type = COALESCE($6, post_type),
                title = COALESCE($7, title),
                caption = COALESCE($8, caption),
                hashtags = COALESCE($9, hashtags),
                mentions = COALESCE($10, mentions),
                status = COALESCE($11, status),
                assigned_to = COALESCE($12, assigned_to),
                priority = COALESCE($13, priority),
                idea_date = COALESCE($14, idea_date),
                target_date = COALESCE($15, target_date),
                scheduled_date = COALESCE($16, scheduled_date),
                posted_at = COALESCE($17, posted_at),
                platform_url = COALESCE($18, platform_url),
                platform_id = COALESCE($19, platform_id),
                parent_post_id = COALESCE($20, parent_post_id),
                thread_position = COALESCE($21, thread_position),
                views = COALESCE($22, views),
                likes = COALESCE($23, likes),
                shares = COALESCE($24, shares),
                comments = COALESCE($25, comments),
                saves = COALESCE($26, saves),
                notes = COALESCE($27, notes),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentPost>(&query)
            .bind(id)
            .bind(input.video_id)
            .bind(input.clip_id)
            .bind(&input.custom_asset_url)
            .bind(&input.platform)
            .bind(&input.post_type)
            .bind(&input.title)
            .bind(&input.caption)
            .bind(input.hashtags.as_deref().map(stringify_tags))
            .bind(input.mentions.as_deref().map(stringify_tags))
            .bind(&input.status)
            .bind(&input.assigned_to)
            .bind(&input.priority)
            .bind(input.idea_date)
            .bind(input.target_date)
            .bind(input.scheduled_date)
            .bind(input.posted_at)
            .bind(&input.platform_url)
            .bind(&input.platform_id)
            .bind(input.parent_post_id)
            .bind(input.thread_position)
            .bind(input.views)
            .bind(input.likes)
            .bind(input.shares)
            .bind(input.comments)
            .bind(input.saves)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete a post. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM content_posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
