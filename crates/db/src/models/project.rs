//! Project rows and the detail view with tags and images.

use serde::Serialize;
use sqlx::FromRow;
use yarnstash_core::labels::{Difficulty, ProjectStatus};
use yarnstash_core::project::ProjectFields;
use yarnstash_core::types::{DbId, Timestamp};

use crate::models::project_image::ProjectImage;
use crate::models::tag::Tag;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    #[sqlx(try_from = "String")]
    pub difficulty: Difficulty,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    pub started_at: Option<Timestamp>,
    pub finished_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// The editable scalar fields of this row.
    pub fn fields(&self) -> ProjectFields {
        ProjectFields {
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
            difficulty: self.difficulty,
            image_url: self.image_url.clone(),
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }
}

/// A project together with its tags (in stored order) and gallery images.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub tags: Vec<Tag>,
    pub images: Vec<ProjectImage>,
}
