//! Handlers for the `/videos` resource, including tag provenance and
//! per-video clip routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use genwise_core::clip_import::{parse_clip_list, RejectedLine};
use genwise_core::content::{validate_choice, VideoStatus};
use genwise_core::error::CoreError;
use genwise_core::search::normalize_term;
use genwise_core::tags::{TagSource, TagSourceFilter, TagStats};
use genwise_core::types::DbId;
use genwise_db::models::clip::{Clip, CreateClip, ImportClipsRequest};
use genwise_db::models::video::{CreateVideo, TaggedVideo, UpdateVideo, Video, VideoListParams};
use genwise_db::repositories::{ClipRepo, VideoRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/videos?program_id=&status=&q=
///
/// A non-empty `q` switches to tag-aware search; the other filters apply
/// either way.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<VideoListParams>,
) -> AppResult<Json<DataResponse<Vec<TaggedVideo>>>> {
    validate_choice::<VideoStatus>(params.status.as_deref())?;

    let videos = match normalize_term(params.q.as_deref()) {
        Some(term) => VideoRepo::search(&state.pool, term, &params).await?,
        None => VideoRepo::list(&state.pool, &params).await?,
    };
    Ok(Json(DataResponse { data: videos }))
}

/// POST /api/v1/videos
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateVideo>,
) -> AppResult<(StatusCode, Json<Video>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Video title must not be empty".to_string(),
        )));
    }
    validate_choice::<VideoStatus>(input.status.as_deref())?;

    let video = VideoRepo::create(&state.pool, &input).await?;
    tracing::info!(video_id = %video.id, title = %video.title, "Video created");
    Ok((StatusCode::CREATED, Json(video)))
}

/// GET /api/v1/videos/{id}
///
/// Returns the video with its program, clips, posts and aggregated tags.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<TaggedVideo>> {
    let video = find_tagged(&state, id).await?;
    Ok(Json(video))
}

/// PUT /api/v1/videos/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateVideo>,
) -> AppResult<Json<Video>> {
    validate_choice::<VideoStatus>(input.status.as_deref())?;

    let video = VideoRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Video", id }))?;
    Ok(Json(video))
}

/// DELETE /api/v1/videos/{id}
///
/// Deletes the video's clips with it.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = VideoRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(video_id = %id, "Video deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Video", id }))
    }
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct TagsQuery {
    #[serde(default)]
    pub source: TagSourceFilter,
}

#[derive(Debug, Serialize)]
pub struct VideoTagsResponse {
    pub source: TagSourceFilter,
    pub tags: Vec<String>,
    pub stats: TagStats,
}

/// GET /api/v1/videos/{id}/tags?source=manual|clips|all
pub async fn tags(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(query): Query<TagsQuery>,
) -> AppResult<Json<VideoTagsResponse>> {
    let video = find_tagged(&state, id).await?;
    let tags = video
        .tags_by_source(query.source)
        .into_iter()
        .map(str::to_string)
        .collect();

    Ok(Json(VideoTagsResponse {
        source: query.source,
        tags,
        stats: video.tag_stats(),
    }))
}

#[derive(Debug, Serialize)]
pub struct TagSourceResponse {
    pub tag: String,
    /// `null` when the video does not carry the tag at all.
    pub source: Option<TagSource>,
}

/// GET /api/v1/videos/{id}/tags/{tag}/source
pub async fn tag_source(
    State(state): State<AppState>,
    Path((id, tag)): Path<(DbId, String)>,
) -> AppResult<Json<TagSourceResponse>> {
    let video = find_tagged(&state, id).await?;
    let source = video.tag_source(&tag);
    Ok(Json(TagSourceResponse { tag, source }))
}

// ---------------------------------------------------------------------------
// Clips of a video
// ---------------------------------------------------------------------------

/// GET /api/v1/videos/{id}/clips
pub async fn list_clips(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Clip>>>> {
    ensure_video_exists(&state, id).await?;
    let clips = ClipRepo::list_by_video(&state.pool, id).await?;
    Ok(Json(DataResponse { data: clips }))
}

#[derive(Debug, Serialize)]
pub struct ImportClipsResponse {
    pub created: Vec<Clip>,
    pub rejected: Vec<RejectedLine>,
}

/// POST /api/v1/videos/{id}/clips/import
///
/// Parses one clip per line and creates all valid clips in one transaction.
/// Lines that do not parse are returned in `rejected`. Fails with 400 when
/// no line parses.
pub async fn import_clips(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ImportClipsRequest>,
) -> AppResult<(StatusCode, Json<ImportClipsResponse>)> {
    ensure_video_exists(&state, id).await?;

    let parsed = parse_clip_list(&input.text);
    if parsed.clips.is_empty() {
        return Err(AppError::BadRequest(format!(
            "No valid clip lines found ({} rejected)",
            parsed.rejected.len()
        )));
    }

    let inputs: Vec<CreateClip> = parsed
        .clips
        .into_iter()
        .map(|clip| CreateClip::from_import(id, clip))
        .collect();
    let created = ClipRepo::create_many(&state.pool, &inputs).await?;

    tracing::info!(
        video_id = %id,
        created = created.len(),
        rejected = parsed.rejected.len(),
        "Clips imported",
    );
    Ok((
        StatusCode::CREATED,
        Json(ImportClipsResponse {
            created,
            rejected: parsed.rejected,
        }),
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_tagged(state: &AppState, id: DbId) -> AppResult<TaggedVideo> {
    VideoRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Video", id }))
}

async fn ensure_video_exists(state: &AppState, id: DbId) -> AppResult<()> {
    VideoRepo::find_by_id(&state.pool, id)
        .await?
        .map(|_| ())
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Video", id }))
}
