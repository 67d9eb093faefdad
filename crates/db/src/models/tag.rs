//! Tag rows.

use serde::Serialize;
use sqlx::FromRow;
use yarnstash_core::types::DbId;

/// A row from the `tags` table. Labels are unique per project by policy,
/// not by constraint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub label: String,
    pub project_id: DbId,
    /// Order of the tag within its project's collection.
    #[serde(skip)]
    pub position: i64,
}
