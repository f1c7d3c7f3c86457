//! Handler for the dashboard counters.

use axum::extract::State;
use axum::Json;
use genwise_db::models::stats::ContentCounts;
use genwise_db::repositories::StatsRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/v1/stats
pub async fn counts(State(state): State<AppState>) -> AppResult<Json<ContentCounts>> {
    let counts = StatsRepo::counts(&state.pool).await?;
    Ok(Json(counts))
}
