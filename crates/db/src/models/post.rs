//! Content post entity model, relation views and DTOs.

use chrono::NaiveDate;
use genwise_core::publishing::ThreadMember;
use genwise_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::clip::Clip;
use crate::models::video::Video;

/// A row from the `content_posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContentPost {
    pub id: DbId,
    pub video_id: Option<DbId>,
    pub clip_id: Option<DbId>,
    pub custom_asset_url: Option<String>,
    pub platform: String,
    pub post_type: Option<String>,
    pub title: Option<String>,
    pub caption: Option<String>,
    /// JSON string array.
    pub hashtags: Option<String>,
    /// JSON string array of handles, e.g. `["@GenWise_"]`.
    pub mentions: Option<String>,
    pub status: String,
    pub assigned_to: Option<String>,
    pub priority: String,
    pub idea_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
    pub scheduled_date: Option<Timestamp>,
    pub posted_at: Option<Timestamp>,
    pub platform_url: Option<String>,
    pub platform_id: Option<String>,
    /// Set when this post is a reply in a thread.
    pub parent_post_id: Option<DbId>,
    /// 0 for the thread root, 1+ for replies.
    pub thread_position: Option<i32>,
    pub views: i32,
    pub likes: i32,
    pub shares: i32,
    pub comments: i32,
    pub saves: i32,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ThreadMember for ContentPost {
    fn parent_post_id(&self) -> Option<DbId> {
        self.parent_post_id
    }

    fn thread_position(&self) -> Option<i32> {
        self.thread_position
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostVideoRef {
    pub id: DbId,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostClipRef {
    pub id: DbId,
    pub description: String,
}

/// A post with summaries of its source video and clip, used by listings.
#[derive(Debug, Clone, Serialize)]
pub struct PostWithRefs {
    #[serde(flatten)]
    pub post: ContentPost,
    pub video: Option<PostVideoRef>,
    pub clip: Option<PostClipRef>,
}

/// A post with its full source video and clip rows.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: ContentPost,
    pub video: Option<Video>,
    pub clip: Option<Clip>,
}

/// A due post with the text the publisher should send.
#[derive(Debug, Clone, Serialize)]
pub struct DuePost {
    #[serde(flatten)]
    pub post: ContentPost,
    pub text: String,
    /// Platform id of the already-published parent, for thread replies.
    pub reply_to_platform_id: Option<String>,
    /// True for a reply whose parent has not been posted yet. The publisher
    /// must hold it back rather than post it standalone.
    pub awaiting_parent: bool,
    /// True when `text` is longer than the standard post length.
    pub exceeds_length: bool,
}

/// DTO for creating a new post.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePost {
    pub video_id: Option<DbId>,
    pub clip_id: Option<DbId>,
    pub custom_asset_url: Option<String>,
    pub platform: String,
    pub post_type: Option<String>,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub hashtags: Option<Vec<String>>,
    pub mentions: Option<Vec<String>>,
    /// Defaults to `idea` if omitted.
    pub status: Option<String>,
    pub assigned_to: Option<String>,
    /// Defaults to `normal` if omitted.
    pub priority: Option<String>,
    pub idea_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
    pub scheduled_date: Option<Timestamp>,
    pub parent_post_id: Option<DbId>,
    pub thread_position: Option<i32>,
    pub notes: Option<String>,
}

/// DTO for updating an existing post. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePost {
    pub video_id: Option<DbId>,
    pub clip_id: Option<DbId>,
    pub custom_asset_url: Option<String>,
    pub platform: Option<String>,
    pub post_type: Option<String>,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub hashtags: Option<Vec<String>>,
    pub mentions: Option<Vec<String>>,
    pub status: Option<String>,
    pub assigned_to: Option<String>,
    pub priority: Option<String>,
    pub idea_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
    pub scheduled_date: Option<Timestamp>,
    pub posted_at: Option<Timestamp>,
    pub platform_url: Option<String>,
    pub platform_id: Option<String>,
    pub parent_post_id: Option<DbId>,
    pub thread_position: Option<i32>,
    pub views: Option<i32>,
    pub likes: Option<i32>,
    pub shares: Option<i32>,
    pub comments: Option<i32>,
    pub saves: Option<i32>,
    pub notes: Option<String>,
}

/// Query parameters for `GET /posts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostListParams {
    pub status: Option<String>,
    pub platform: Option<String>,
}

/// Query parameters for `GET /posts/upcoming`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpcomingParams {
    pub limit: Option<i64>,
}

/// Query parameters for `GET /posts/due`.
#[derive(Debug, Clone, Deserialize)]
pub struct DueParams {
    /// Defaults to `twitter`, the only platform with an auto-publisher.
    pub platform: Option<String>,
}

/// Outcome reported by the publisher for one post.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum PublishResult {
    Posted {
        platform_id: String,
        platform_url: Option<String>,
    },
    Failed {
        error: String,
    },
}
