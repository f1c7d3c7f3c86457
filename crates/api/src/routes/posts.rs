//! Route definitions for the `/posts` resource.
//!
//! The static `/upcoming` and `/due` segments take priority over `/{id}`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::post as handler;
use crate::state::AppState;

/// Routes mounted at `/posts`.
///
/// ```text
/// GET    /                       -> list
/// POST   /                       -> create
/// GET    /upcoming               -> upcoming
/// GET    /due                    -> due
/// GET    /{id}                   -> get_by_id
/// PUT    /{id}                   -> update
/// DELETE /{id}                   -> delete
/// POST   /{id}/publish-result    -> publish_result
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/upcoming", get(handler::upcoming))
        .route("/due", get(handler::due))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/publish-result", post(handler::publish_result))
}
