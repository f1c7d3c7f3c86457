//! Handlers for the `/clips` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use genwise_core::error::CoreError;
use genwise_core::search::normalize_term;
use genwise_core::tags::has_all_tags;
use genwise_core::types::DbId;
use genwise_db::models::clip::{Clip, ClipListParams, ClipWithVideo, CreateClip, UpdateClip};
use genwise_db::repositories::ClipRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/clips?q=&tag=&tags=&program_id=
///
/// `q` takes precedence over `tag`; with neither, every clip is listed.
/// `tags` (comma-separated, exact match, all required) and `program_id`
/// narrow the result further.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ClipListParams>,
) -> AppResult<Json<DataResponse<Vec<ClipWithVideo>>>> {
    let mut clips = if let Some(term) = normalize_term(params.q.as_deref()) {
        ClipRepo::search(&state.pool, term).await?
    } else if let Some(tag) = normalize_term(params.tag.as_deref()) {
        ClipRepo::list_by_tag(&state.pool, tag).await?
    } else {
        ClipRepo::list_all(&state.pool).await?
    };

    let required = split_tags(params.tags.as_deref());
    if !required.is_empty() {
        clips.retain(|c| has_all_tags(Some(c.clip.tags.as_str()), &required));
    }
    if let Some(program_id) = params.program_id {
        clips.retain(|c| c.video.program_id == Some(program_id));
    }

    Ok(Json(DataResponse { data: clips }))
}

/// POST /api/v1/clips
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateClip>,
) -> AppResult<(StatusCode, Json<Clip>)> {
    validate_clip(&input)?;
    let clip = ClipRepo::create(&state.pool, &input).await?;
    tracing::info!(clip_id = %clip.id, video_id = %clip.video_id, "Clip created");
    Ok((StatusCode::CREATED, Json(clip)))
}

/// POST /api/v1/clips/batch
///
/// Creates every clip or none.
pub async fn create_batch(
    State(state): State<AppState>,
    Json(inputs): Json<Vec<CreateClip>>,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<Clip>>>)> {
    if inputs.is_empty() {
        return Err(AppError::BadRequest("Clip batch must not be empty".to_string()));
    }
    for input in &inputs {
        validate_clip(input)?;
    }

    let clips = ClipRepo::create_many(&state.pool, &inputs).await?;
    tracing::info!(count = clips.len(), "Clip batch created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: clips })))
}

/// PUT /api/v1/clips/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClip>,
) -> AppResult<Json<Clip>> {
    let clip = ClipRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Clip", id }))?;
    Ok(Json(clip))
}

/// DELETE /api/v1/clips/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = ClipRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(clip_id = %id, "Clip deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Clip", id }))
    }
}

fn validate_clip(input: &CreateClip) -> Result<(), CoreError> {
    if input.description.trim().is_empty() {
        return Err(CoreError::Validation(
            "Clip description must not be empty".to_string(),
        ));
    }
    let (start, end, duration) = input.resolved_seconds();
    let start = start.ok_or_else(|| {
        CoreError::Validation(format!("Invalid start time '{}'", input.start_time))
    })?;
    let end = end.ok_or_else(|| {
        CoreError::Validation(format!("Invalid end time '{}'", input.end_time))
    })?;
    if start < 0 || end < 0 {
        return Err(CoreError::Validation(
            "Clip seconds must not be negative".to_string(),
        ));
    }
    if duration.is_some_and(|d| d < 0) {
        return Err(CoreError::Validation(format!(
            "Clip ends before it starts ({} > {})",
            input.start_time, input.end_time
        )));
    }
    Ok(())
}

/// Split a comma-separated `tags` query value, dropping blanks.
fn split_tags(raw: Option<&str>) -> Vec<&str> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_tags_trims_and_drops_blanks() {
        assert_eq!(split_tags(Some(" ai , ,ethics,")), vec!["ai", "ethics"]);
        assert!(split_tags(Some("")).is_empty());
        assert!(split_tags(None).is_empty());
    }
}
