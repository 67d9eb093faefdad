//! Repository for the `tags` table.
//!
//! Whole-collection replacement goes through [`super::ProjectRepo::update`];
//! this repository serves the single-tag endpoints.

use sqlx::SqlitePool;
use yarnstash_core::types::DbId;

use crate::models::tag::Tag;

/// Column list for `tags` queries.
pub(crate) const COLUMNS: &str = "id, label, project_id, position";

/// Provides CRUD operations for individual tags.
pub struct TagRepo;

impl TagRepo {
    /// Append a tag to the end of a project's collection.
    pub async fn create(
        pool: &SqlitePool,
        project_id: DbId,
        label: &str,
    ) -> Result<Tag, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags (project_id, label, position) \
             VALUES (?, ?, (SELECT COALESCE(MAX(position) + 1, 0) FROM tags WHERE project_id = ?)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(project_id)
            .bind(label)
            .bind(project_id)
            .fetch_one(pool)
            .await
    }

    /// Find a tag by its ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE id = ?");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the tag of a project carrying exactly `label`.
    pub async fn find_by_label(
        pool: &SqlitePool,
        project_id: DbId,
        label: &str,
    ) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tags WHERE project_id = ? AND label = ? \
             ORDER BY position, id LIMIT 1"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(project_id)
            .bind(label)
            .fetch_optional(pool)
            .await
    }

    /// List every tag, oldest first.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags ORDER BY id");
        sqlx::query_as::<_, Tag>(&query).fetch_all(pool).await
    }

    /// List the tags of one project in collection order.
    pub async fn list_by_project(
        pool: &SqlitePool,
        project_id: DbId,
    ) -> Result<Vec<Tag>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM tags WHERE project_id = ? ORDER BY position, id");
        sqlx::query_as::<_, Tag>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Change a tag's label and/or owning project. `None` keeps the value.
    ///
    /// A tag moved to another project is appended to that project's
    /// collection. Returns `None` if no tag with the given ID exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        label: Option<&str>,
        project_id: Option<DbId>,
    ) -> Result<Option<Tag>, sqlx::Error> {
        // SET expressions read the row as it was before the update.
        let query = format!(
            "UPDATE tags SET \
                label = COALESCE(?, label), \
                position = CASE WHEN ? IS NOT NULL AND ? <> project_id \
                    THEN (SELECT COALESCE(MAX(t.position) + 1, 0) FROM tags t WHERE t.project_id = ?) \
                    ELSE position END, \
                project_id = COALESCE(?, project_id) \
             WHERE id = ? \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(label)
            .bind(project_id)
            .bind(project_id)
            .bind(project_id)
            .bind(project_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a tag by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
