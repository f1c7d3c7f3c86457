pub mod clips;
pub mod health;
pub mod posts;
pub mod programs;
pub mod stats;
pub mod videos;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /programs                          list, create
/// /programs/{id}                     get, update, delete
///
/// /videos                            list / search (?program_id, status, q), create
/// /videos/{id}                       get (tags, program, clips, posts), update, delete
/// /videos/{id}/tags                  tags of one source (?source) with stats
/// /videos/{id}/tags/{tag}/source     provenance of one tag
/// /videos/{id}/clips                 clips in playback order
/// /videos/{id}/clips/import          batch import from text (POST)
///
/// /clips                             list / search (?q, tag, tags, program_id), create
/// /clips/batch                       create many (POST)
/// /clips/{id}                        update, delete
///
/// /posts                             list (?status, platform), create
/// /posts/upcoming                    upcoming (?limit)
/// /posts/due                         due queue with composed text (?platform)
/// /posts/{id}                        get, update, delete
/// /posts/{id}/publish-result         record publish outcome (POST)
///
/// /stats                             dashboard counts
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/programs", programs::router())
        .nest("/videos", videos::router())
        .nest("/clips", clips::router())
        .nest("/posts", posts::router())
        .nest("/stats", stats::router())
}
