//! Gallery image rows attached to a project.

use serde::Serialize;
use sqlx::FromRow;
use validator::Validate;
use yarnstash_core::types::DbId;

/// A row from the `project_images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectImage {
    pub id: DbId,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub caption: String,
    pub project_id: DbId,
}

/// Fields for inserting a project image.
#[derive(Debug, Clone, Validate)]
pub struct CreateProjectImage {
    pub project_id: DbId,
    #[validate(length(min = 1, max = 255))]
    pub image_url: String,
    #[validate(length(max = 255))]
    pub caption: String,
}

/// Partial update of a project image. `None` keeps the stored value.
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateProjectImage {
    #[validate(length(min = 1, max = 255))]
    pub image_url: Option<String>,
    #[validate(length(max = 255))]
    pub caption: Option<String>,
}
