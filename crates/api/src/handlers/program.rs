//! Handlers for the `/programs` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use genwise_core::error::CoreError;
use genwise_core::types::DbId;
use genwise_db::models::program::{CreateProgram, Program, UpdateProgram};
use genwise_db::repositories::ProgramRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/programs
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProgram>,
) -> AppResult<(StatusCode, Json<Program>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Program name must not be empty".to_string(),
        )));
    }
    let program = ProgramRepo::create(&state.pool, &input).await?;
    tracing::info!(program_id = %program.id, name = %program.name, "Program created");
    Ok((StatusCode::CREATED, Json(program)))
}

/// GET /api/v1/programs
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Program>>>> {
    let programs = ProgramRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: programs }))
}

/// GET /api/v1/programs/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Program>> {
    let program = ProgramRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Program",
            id,
        }))?;
    Ok(Json(program))
}

/// PUT /api/v1/programs/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProgram>,
) -> AppResult<Json<Program>> {
    let program = ProgramRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Program",
            id,
        }))?;
    Ok(Json(program))
}

/// DELETE /api/v1/programs/{id}
///
/// Videos of the program are kept and lose their program link.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = ProgramRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(program_id = %id, "Program deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Program",
            id,
        }))
    }
}
