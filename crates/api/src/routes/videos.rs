//! Route definitions for the `/videos` resource.
//!
//! Also nests the per-video tag and clip routes.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::video;
use crate::state::AppState;

/// Routes mounted at `/videos`.
///
/// ```text
/// GET    /                         -> list
/// POST   /                         -> create
/// GET    /{id}                     -> get_by_id
/// PUT    /{id}                     -> update
/// DELETE /{id}                     -> delete
/// GET    /{id}/tags                -> tags
/// GET    /{id}/tags/{tag}/source   -> tag_source
/// GET    /{id}/clips               -> list_clips
/// POST   /{id}/clips/import        -> import_clips
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(video::list).post(video::create))
        .route(
            "/{id}",
            get(video::get_by_id)
                .put(video::update)
                .delete(video::delete),
        )
        .route("/{id}/tags", get(video::tags))
        .route("/{id}/tags/{tag}/source", get(video::tag_source))
        .route("/{id}/clips", get(video::list_clips))
        .route("/{id}/clips/import", post(video::import_clips))
}
