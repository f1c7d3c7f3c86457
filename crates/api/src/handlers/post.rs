//! Handlers for the `/posts` resource and the publishing queue.
//!
//! The publisher that holds platform credentials runs outside this service.
//! It polls `GET /posts/due`, publishes the composed text and reports back
//! through `POST /posts/{id}/publish-result`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use genwise_core::content::{validate_choice, Platform, PostStatus, Priority};
use genwise_core::error::CoreError;
use genwise_core::publishing::{
    compose_post_text, exceeds_post_length, failure_note, parse_handles,
};
use genwise_core::search::{clamp_limit, DEFAULT_UPCOMING_LIMIT, MAX_UPCOMING_LIMIT};
use genwise_core::types::DbId;
use genwise_db::models::post::{
    ContentPost, CreatePost, DueParams, DuePost, PostDetail, PostListParams, PostWithRefs,
    PublishResult, UpcomingParams, UpdatePost,
};
use genwise_db::repositories::PostRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Platform polled by the publisher when none is given.
const DEFAULT_DUE_PLATFORM: Platform = Platform::Twitter;

/// GET /api/v1/posts?status=&platform=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PostListParams>,
) -> AppResult<Json<DataResponse<Vec<PostWithRefs>>>> {
    validate_choice::<PostStatus>(params.status.as_deref())?;
    validate_choice::<Platform>(params.platform.as_deref())?;

    let posts = PostRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: posts }))
}

/// POST /api/v1/posts
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreatePost>,
) -> AppResult<(StatusCode, Json<ContentPost>)> {
    validate_choice::<Platform>(Some(input.platform.as_str()))?;
    validate_choice::<PostStatus>(input.status.as_deref())?;
    validate_choice::<Priority>(input.priority.as_deref())?;

    let post = PostRepo::create(&state.pool, &input).await?;
    tracing::info!(
        post_id = %post.id,
        platform = %post.platform,
        status = %post.status,
        "Post created",
    );
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /api/v1/posts/upcoming?limit=
pub async fn upcoming(
    State(state): State<AppState>,
    Query(params): Query<UpcomingParams>,
) -> AppResult<Json<DataResponse<Vec<PostWithRefs>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_UPCOMING_LIMIT, MAX_UPCOMING_LIMIT);
    let posts = PostRepo::upcoming(&state.pool, limit).await?;
    Ok(Json(DataResponse { data: posts }))
}

/// GET /api/v1/posts/due?platform=
///
/// Scheduled posts ready to publish now, thread roots before replies, each
/// with the composed text and the platform id of an already-published
/// parent. Replies whose parent is not posted yet are flagged
/// `awaiting_parent`.
pub async fn due(
    State(state): State<AppState>,
    Query(params): Query<DueParams>,
) -> AppResult<Json<DataResponse<Vec<DuePost>>>> {
    let platform = params
        .platform
        .as_deref()
        .unwrap_or(DEFAULT_DUE_PLATFORM.as_str());
    validate_choice::<Platform>(Some(platform))?;

    let posts = PostRepo::list_due(&state.pool, platform, Utc::now()).await?;

    let mut due = Vec::with_capacity(posts.len());
    for post in posts {
        let reply_to_platform_id = match post.parent_post_id {
            Some(parent_id) => PostRepo::parent_platform_id(&state.pool, parent_id).await?,
            None => None,
        };
        let awaiting_parent = post.parent_post_id.is_some() && reply_to_platform_id.is_none();
        let mentions = parse_handles(post.mentions.as_deref());
        let hashtags = parse_handles(post.hashtags.as_deref());
        let text = compose_post_text(post.caption.as_deref(), &mentions, &hashtags);
        let exceeds_length = exceeds_post_length(&text);
        if exceeds_length {
            tracing::warn!(post_id = %post.id, "Composed post exceeds the standard length");
        }

        due.push(DuePost {
            post,
            text,
            reply_to_platform_id,
            awaiting_parent,
            exceeds_length,
        });
    }

    tracing::debug!(platform, count = due.len(), "Due posts listed");
    Ok(Json(DataResponse { data: due }))
}

/// GET /api/v1/posts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<PostDetail>> {
    let post = PostRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;
    Ok(Json(post))
}

/// PUT /api/v1/posts/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePost>,
) -> AppResult<Json<ContentPost>> {
    validate_choice::<Platform>(input.platform.as_deref())?;
    validate_choice::<PostStatus>(input.status.as_deref())?;
    validate_choice::<Priority>(input.priority.as_deref())?;

    let post = PostRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;
    Ok(Json(post))
}

/// DELETE /api/v1/posts/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = PostRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(post_id = %id, "Post deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Post", id }))
    }
}

/// POST /api/v1/posts/{id}/publish-result
pub async fn publish_result(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(result): Json<PublishResult>,
) -> AppResult<Json<ContentPost>> {
    let updated = match &result {
        PublishResult::Posted {
            platform_id,
            platform_url,
        } => {
            if platform_id.trim().is_empty() {
                return Err(AppError::BadRequest(
                    "platform_id must not be empty".to_string(),
                ));
            }
            PostRepo::mark_posted(&state.pool, id, platform_id, platform_url.as_deref()).await?
        }
        PublishResult::Failed { error } => {
            PostRepo::mark_failed(&state.pool, id, &failure_note(error)).await?
        }
    };

    let post = updated.ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;
    match result {
        PublishResult::Posted { platform_id, .. } => {
            tracing::info!(post_id = %id, %platform_id, "Post published");
        }
        PublishResult::Failed { error } => {
            tracing::warn!(post_id = %id, %error, "Post publish failed");
        }
    }
    Ok(Json(post))
}
