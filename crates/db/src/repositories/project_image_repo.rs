//! Repository for the `project_images` table.

use sqlx::SqlitePool;
use yarnstash_core::types::DbId;

use crate::models::project_image::{CreateProjectImage, ProjectImage, UpdateProjectImage};

/// Column list for `project_images` queries.
pub(crate) const COLUMNS: &str = "id, image_url, caption, project_id";

/// Provides CRUD operations for project gallery images.
pub struct ProjectImageRepo;

impl ProjectImageRepo {
    /// Insert a new project image, returning the created row.
    pub async fn create(
        pool: &SqlitePool,
        input: &CreateProjectImage,
    ) -> Result<ProjectImage, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_images (project_id, image_url, caption) \
             VALUES (?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectImage>(&query)
            .bind(input.project_id)
            .bind(&input.image_url)
            .bind(&input.caption)
            .fetch_one(pool)
            .await
    }

    /// Find a project image by its ID.
    pub async fn find_by_id(
        pool: &SqlitePool,
        id: DbId,
    ) -> Result<Option<ProjectImage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_images WHERE id = ?");
        sqlx::query_as::<_, ProjectImage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the images of one project, oldest first.
    pub async fn list_by_project(
        pool: &SqlitePool,
        project_id: DbId,
    ) -> Result<Vec<ProjectImage>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM project_images WHERE project_id = ? ORDER BY id");
        sqlx::query_as::<_, ProjectImage>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a project image. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateProjectImage,
    ) -> Result<Option<ProjectImage>, sqlx::Error> {
        let query = format!(
            "UPDATE project_images SET \
                image_url = COALESCE(?, image_url), \
                caption = COALESCE(?, caption) \
             WHERE id = ? \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectImage>(&query)
            .bind(&input.image_url)
            .bind(&input.caption)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project image by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_images WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
