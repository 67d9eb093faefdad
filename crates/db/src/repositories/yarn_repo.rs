//! Repository for the `yarns` table.

use sqlx::SqlitePool;
use yarnstash_core::types::DbId;
use yarnstash_core::yarn::YarnFields;

use crate::models::yarn::Yarn;
use crate::repositories::NOW_SQL;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, brand, color, quantity, image_url, notes, \
     added_at, fiber_content, weight, updated_at";

/// Provides CRUD operations for yarns.
pub struct YarnRepo;

impl YarnRepo {
    /// Insert a new yarn. `added_at` is stamped by the database.
    pub async fn create(pool: &SqlitePool, fields: &YarnFields) -> Result<Yarn, sqlx::Error> {
        let query = format!(
            "INSERT INTO yarns \
                (name, brand, color, quantity, image_url, notes, fiber_content, weight) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Yarn>(&query)
            .bind(&fields.name)
            .bind(&fields.brand)
            .bind(&fields.color)
            .bind(fields.quantity)
            .bind(&fields.image_url)
            .bind(&fields.notes)
            .bind(fields.fiber_content.as_str())
            .bind(fields.weight.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a yarn by its ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Yarn>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM yarns WHERE id = ?");
        sqlx::query_as::<_, Yarn>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all yarns, most recently added first.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Yarn>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM yarns ORDER BY id DESC");
        sqlx::query_as::<_, Yarn>(&query).fetch_all(pool).await
    }

    /// Overwrite a yarn's editable fields. `added_at` never changes.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        fields: &YarnFields,
    ) -> Result<Option<Yarn>, sqlx::Error> {
        let query = format!(
            "UPDATE yarns SET \
                name = ?, brand = ?, color = ?, quantity = ?, image_url = ?, notes = ?, \
                fiber_content = ?, weight = ?, updated_at = {NOW_SQL} \
             WHERE id = ? \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Yarn>(&query)
            .bind(&fields.name)
            .bind(&fields.brand)
            .bind(&fields.color)
            .bind(fields.quantity)
            .bind(&fields.image_url)
            .bind(&fields.notes)
            .bind(fields.fiber_content.as_str())
            .bind(fields.weight.as_str())
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a yarn by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM yarns WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
