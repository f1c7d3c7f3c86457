use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::clip;
use crate::state::AppState;

/// Routes mounted at `/clips`.
///
/// ```text
/// GET    /          -> list
/// POST   /          -> create
/// POST   /batch     -> create_batch
/// PUT    /{id}      -> update
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(clip::list).post(clip::create))
        .route("/batch", post(clip::create_batch))
        .route("/{id}", put(clip::update).delete(clip::delete))
}
