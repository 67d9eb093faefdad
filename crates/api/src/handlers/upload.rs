//! Standalone image upload.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::files::{self, IMAGE_FIELD};
use crate::state::AppState;

/// Response of an upload: the public URL of the stored file.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

/// POST /api/image/upload and POST /api/project/image/upload
///
/// Accepts a multipart form with a required `image` file field.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some(IMAGE_FIELD) {
            upload = files::read_file(field).await?;
        }
    }

    let upload =
        upload.ok_or_else(|| AppError::BadRequest("No image file uploaded".into()))?;
    let image_url = files::store_image(&state, &upload).await?;
    Ok(Json(UploadResponse { image_url }))
}
