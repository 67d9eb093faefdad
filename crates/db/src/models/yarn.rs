//! Yarn rows.

use serde::Serialize;
use sqlx::FromRow;
use yarnstash_core::labels::{FiberContent, YarnWeight};
use yarnstash_core::types::{DbId, Timestamp};
use yarnstash_core::yarn::YarnFields;

/// A row from the `yarns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Yarn {
    pub id: DbId,
    pub name: String,
    pub brand: String,
    pub color: String,
    pub quantity: i64,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    pub notes: Option<String>,
    #[serde(rename = "addedAt")]
    pub added_at: Timestamp,
    #[serde(rename = "fiberContent")]
    #[sqlx(try_from = "String")]
    pub fiber_content: FiberContent,
    #[sqlx(try_from = "String")]
    pub weight: YarnWeight,
    pub updated_at: Timestamp,
}

impl Yarn {
    /// The editable fields of this row.
    pub fn fields(&self) -> YarnFields {
        YarnFields {
            name: self.name.clone(),
            brand: self.brand.clone(),
            color: self.color.clone(),
            quantity: self.quantity,
            image_url: self.image_url.clone(),
            notes: self.notes.clone(),
            fiber_content: self.fiber_content,
            weight: self.weight,
        }
    }
}
