//! Upload intake and best-effort image cleanup shared by handlers.

use std::collections::HashMap;

use axum::extract::multipart::Field;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use serde_json::Value;
use yarnstash_core::payload::{self, Payload};
use yarnstash_core::storage::{self, CleanupOutcome};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Multipart field carrying an uploaded image.
pub const IMAGE_FIELD: &str = "image";

/// A file received in a multipart request.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Body of an endpoint that accepts either JSON or a multipart form.
#[derive(Debug)]
pub enum ImageForm {
    Json(Payload),
    Multipart {
        fields: HashMap<String, String>,
        image: Option<UploadedFile>,
    },
}

impl ImageForm {
    /// Read the request body according to its `Content-Type`.
    pub async fn from_request(request: Request, state: &AppState) -> AppResult<Self> {
        let is_multipart = request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("multipart/form-data"));

        if !is_multipart {
            let Json(body) = Json::<Value>::from_request(request, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            return Ok(ImageForm::Json(payload::into_payload(body)?));
        }

        let mut multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let mut fields = HashMap::new();
        let mut image = None;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            if name == IMAGE_FIELD {
                image = read_file(field).await?;
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                fields.insert(name, text);
            }
        }

        Ok(ImageForm::Multipart { fields, image })
    }
}

/// Read a file field. An empty part without a file name (a form submitted
/// with no file chosen) yields `None`.
pub async fn read_file(field: Field<'_>) -> AppResult<Option<UploadedFile>> {
    let file_name = field.file_name().unwrap_or("").to_string();
    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if data.is_empty() && file_name.is_empty() {
        return Ok(None);
    }
    Ok(Some(UploadedFile {
        file_name,
        data: data.to_vec(),
    }))
}

/// Store an uploaded image and return its public URL.
pub async fn store_image(state: &AppState, upload: &UploadedFile) -> AppResult<String> {
    let name = state.files.store(&upload.data, &upload.file_name).await?;
    tracing::info!(file = %name, bytes = upload.data.len(), "Image stored");
    Ok(storage::public_url(&state.config.public_base_url, &name))
}

/// Delete the file behind an image URL. Failures are logged, never returned.
pub async fn discard_image(state: &AppState, url: &str) {
    match storage::remove_image(state.files.as_ref(), url).await {
        CleanupOutcome::Deleted(file) => tracing::info!(file, "Image file deleted"),
        CleanupOutcome::Skipped => tracing::debug!(url, "Image URL names no file"),
        CleanupOutcome::Failed { file, error } => {
            tracing::warn!(file, error, "Failed to delete image file");
        }
    }
}
