//! Repository for the `programs` table.

use genwise_core::types::DbId;
use sqlx::PgPool;

use crate::models::program::{CreateProgram, Program, UpdateProgram};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, full_name, description, color, created_at";

/// Provides CRUD operations for programs.
pub struct ProgramRepo;

impl ProgramRepo {
    /// Insert a new program, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProgram) -> Result<Program, sqlx::Error> {
        let query = format!(
            "INSERT INTO programs (name, full_name, description, color)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Program>(&query)
            .bind(&input.name)
            .bind(&input.full_name)
            .bind(&input.description)
            .bind(&input.color)
            .fetch_one(pool)
            .await
    }

    /// Find a program by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Program>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM programs WHERE id = $1");
        sqlx::query_as::<_, Program>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch every program whose ID is in `ids`. Order is unspecified.
    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Program>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM programs WHERE id = ANY($1)");
        sqlx::query_as::<_, Program>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List all programs ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Program>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM programs ORDER BY name");
        sqlx::query_as::<_, Program>(&query).fetch_all(pool).await
    }

    /// Update a program. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProgram,
    ) -> Result<Option<Program>, sqlx::Error> {
        let query = format!(
            "UPDATE programs SET
                name = COALESCE($2, name),
                full_name = COALESCE($3, full_name),
                description = COALESCE($4, description),
                color = COALESCE($5, color)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Program>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.full_name)
            .bind(&input.description)
            .bind(&input.color)
            .fetch_optional(pool)
            .await
    }

    /// Delete a program. Its videos keep existing with `program_id = NULL`.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM programs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
