//! Handlers for project gallery images.
//!
//! Create and update accept either a JSON body or a multipart form. A
//! multipart `image` part is stored through the file store; only JSON
//! bodies may instead reference an already uploaded file by `imageUrl`.

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;
use yarnstash_core::error::CoreError;
use yarnstash_core::payload::{self, Payload};
use yarnstash_core::types::DbId;
use yarnstash_db::models::project_image::{CreateProjectImage, ProjectImage, UpdateProjectImage};
use yarnstash_db::repositories::{ProjectImageRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::files::{self, ImageForm};
use crate::state::AppState;

const PROJECT_ID_KEYS: &[&str] = &["projectId", "project_id"];
const IMAGE_URL_KEYS: &[&str] = &["imageUrl", "image_url"];

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "ProjectImage",
        id,
    })
}

fn optional_text(body: &Payload, keys: &[&str]) -> AppResult<Option<String>> {
    match payload::lookup_non_null(body, keys) {
        Some(value) => Ok(Some(payload::string_value(keys[0], value)?)),
        None => Ok(None),
    }
}

/// POST /api/project/image
pub async fn create(
    State(state): State<AppState>,
    request: Request,
) -> AppResult<(StatusCode, Json<ProjectImage>)> {
    let form = ImageForm::from_request(request, &state).await?;

    let (project_id, caption, upload, image_url) = match form {
        ImageForm::Json(body) => {
            let project_id = payload::lookup_non_null(&body, PROJECT_ID_KEYS)
                .map(|v| payload::integer_value("projectId", v))
                .transpose()?;
            let caption = optional_text(&body, &["caption"])?;
            let image_url = optional_text(&body, IMAGE_URL_KEYS)?;
            (project_id, caption, None, image_url)
        }
        ImageForm::Multipart { fields, image } => {
            let project_id = PROJECT_ID_KEYS
                .iter()
                .find_map(|key| fields.get(*key))
                .filter(|raw| !raw.trim().is_empty())
                .map(|raw| {
                    payload::integer_value("projectId", &serde_json::Value::String(raw.clone()))
                })
                .transpose()?;
            // A form carries its image as a file; URLs come only from JSON.
            (project_id, fields.get("caption").cloned(), image, None)
        }
    };

    let project_id = project_id
        .ok_or_else(|| AppError::Core(CoreError::Validation("Project ID is required".into())))?;
    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    let caption = caption.unwrap_or_default();
    if upload.is_none() && image_url.as_deref().is_none_or(str::is_empty) {
        return Err(CoreError::Validation("No image file or URL provided".into()).into());
    }

    // Validate with a placeholder URL before any file lands on disk.
    let mut input = CreateProjectImage {
        project_id,
        image_url: image_url.clone().unwrap_or_else(|| "pending".into()),
        caption,
    };
    input.validate()?;

    if let Some(upload) = &upload {
        input.image_url = files::store_image(&state, upload).await?;
    }

    let image = match ProjectImageRepo::create(&state.pool, &input).await {
        Ok(image) => image,
        Err(err) => {
            if upload.is_some() {
                files::discard_image(&state, &input.image_url).await;
            }
            return Err(err.into());
        }
    };

    tracing::info!(image_id = image.id, project_id, "Project image created");
    Ok((StatusCode::CREATED, Json(image)))
}

/// GET /api/project/image/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectImage>> {
    let image = ProjectImageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(image))
}

/// PUT/POST /api/project/image/{id}
///
/// Changes the caption and/or the image. When the image URL changes, the
/// old file is deleted after the new value is committed.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    request: Request,
) -> AppResult<Json<ProjectImage>> {
    let current = ProjectImageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let form = ImageForm::from_request(request, &state).await?;
    let (mut input, upload) = match form {
        ImageForm::Json(body) => {
            let input = UpdateProjectImage {
                image_url: optional_text(&body, IMAGE_URL_KEYS)?,
                caption: optional_text(&body, &["caption"])?,
            };
            (input, None)
        }
        ImageForm::Multipart { fields, image } => {
            let input = UpdateProjectImage {
                image_url: None,
                caption: fields.get("caption").cloned(),
            };
            (input, image)
        }
    };
    input.validate()?;

    if let Some(upload) = &upload {
        input.image_url = Some(files::store_image(&state, upload).await?);
    }

    let updated = match ProjectImageRepo::update(&state.pool, id, &input).await {
        Ok(Some(image)) => image,
        other => {
            if let (Some(_), Some(url)) = (&upload, &input.image_url) {
                files::discard_image(&state, url).await;
            }
            return Err(match other {
                Err(err) => err.into(),
                Ok(_) => not_found(id),
            });
        }
    };

    if updated.image_url != current.image_url {
        files::discard_image(&state, &current.image_url).await;
    }

    tracing::info!(image_id = id, "Project image updated");
    Ok(Json(updated))
}

/// DELETE /api/project/image/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let image = ProjectImageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !ProjectImageRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    files::discard_image(&state, &image.image_url).await;

    tracing::info!(image_id = id, "Project image deleted");
    Ok(StatusCode::NO_CONTENT)
}
