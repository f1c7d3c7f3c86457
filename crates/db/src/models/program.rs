//! Program entity model and DTOs.

use genwise_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `programs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Program {
    pub id: DbId,
    pub name: String,
    pub full_name: Option<String>,
    pub description: Option<String>,
    /// Hex color used for program badges (e.g. `"#2563EB"`).
    pub color: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a new program.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProgram {
    pub name: String,
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// DTO for updating an existing program. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProgram {
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}
