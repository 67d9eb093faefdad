//! Handlers for individual tags.
//!
//! A project's whole tag collection is normally replaced through the
//! project update endpoint; these handlers edit one tag at a time.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use yarnstash_core::error::CoreError;
use yarnstash_core::payload::{self, Payload};
use yarnstash_core::tags::tag_label;
use yarnstash_core::types::DbId;
use yarnstash_db::models::tag::Tag;
use yarnstash_db::repositories::{ProjectRepo, TagRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Tag", id })
}

/// The trimmed `label` of a request body. `None` when the key is absent or null.
fn label_of(body: &Payload) -> AppResult<Option<String>> {
    let Some(value) = payload::lookup_non_null(body, &["label"]) else {
        return Ok(None);
    };
    let label = match value {
        Value::String(_) => tag_label(value)?,
        _ => {
            return Err(CoreError::Validation("Field 'label' must be a string".into()).into());
        }
    };
    if label.is_empty() {
        return Err(CoreError::Validation("Tag label must not be empty".into()).into());
    }
    Ok(Some(label))
}

/// The `project.id` of a request body, checked to exist.
async fn project_of(state: &AppState, body: &Payload) -> AppResult<Option<DbId>> {
    let id = match body.get("project") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(project)) => match project.get("id") {
            Some(id) if !id.is_null() => payload::integer_value("project.id", id)?,
            _ => return Ok(None),
        },
        Some(_) => {
            return Err(CoreError::Validation(
                "Field 'project' must be an object with an 'id'".into(),
            )
            .into());
        }
    };

    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Some(id))
}

/// Fail with a conflict when another tag of `project_id` already has `label`.
async fn ensure_unique(
    state: &AppState,
    project_id: DbId,
    label: &str,
    except: Option<DbId>,
) -> AppResult<()> {
    match TagRepo::find_by_label(&state.pool, project_id, label).await? {
        Some(existing) if Some(existing.id) != except => Err(AppError::Core(
            CoreError::Conflict(format!("Project {project_id} already has tag '{label}'")),
        )),
        _ => Ok(()),
    }
}

/// GET /api/tags
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Tag>>> {
    let tags = TagRepo::list(&state.pool).await?;
    Ok(Json(tags))
}

/// POST /api/tags
///
/// Body: `{"label": "...", "project": {"id": 1}}`.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<Tag>)> {
    let body = payload::into_payload(body)?;

    let label = label_of(&body)?
        .ok_or_else(|| AppError::Core(CoreError::Validation("Tag label is required".into())))?;
    let project_id = project_of(&state, &body)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Validation("Project is required".into())))?;

    ensure_unique(&state, project_id, &label, None).await?;

    let tag = TagRepo::create(&state.pool, project_id, &label).await?;
    tracing::info!(tag_id = tag.id, project_id, "Tag created");
    Ok((StatusCode::CREATED, Json(tag)))
}

/// GET /api/tags/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Tag>> {
    let tag = TagRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(tag))
}

/// PUT /api/tags/{id}
///
/// Changes the label and/or moves the tag to another project.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<Value>,
) -> AppResult<Json<Tag>> {
    let body = payload::into_payload(body)?;
    let current = TagRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let label = label_of(&body)?;
    let project_id = project_of(&state, &body).await?;

    ensure_unique(
        &state,
        project_id.unwrap_or(current.project_id),
        label.as_deref().unwrap_or(&current.label),
        Some(id),
    )
    .await?;

    let tag = TagRepo::update(&state.pool, id, label.as_deref(), project_id)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(tag_id = id, "Tag updated");
    Ok(Json(tag))
}

/// DELETE /api/tags/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if !TagRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(tag_id = id, "Tag deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/tags/project/{project_id}
///
/// An unknown project simply has no tags.
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Tag>>> {
    let tags = TagRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(tags))
}
