//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;
use yarnstash_core::error::CoreError;
use yarnstash_core::payload;
use yarnstash_core::project::{self, ProjectPatch};
use yarnstash_core::types::DbId;
use yarnstash_db::models::project::ProjectDetail;
use yarnstash_db::models::tag::Tag;
use yarnstash_db::repositories::{ProjectRepo, TagRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::files;
use crate::state::AppState;

/// Query parameters for listing and searching projects.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<ProjectDetail>)> {
    let patch = ProjectPatch::from_payload(&payload::into_payload(body)?)?;
    let fields = patch.create(chrono::Utc::now());
    fields.validate()?;

    let tags = patch.tags.unwrap_or_default();
    let detail = ProjectRepo::create(&state.pool, &fields, &tags).await?;

    tracing::info!(
        project_id = detail.project.id,
        tags = detail.tags.len(),
        "Project created"
    );
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/projects
///
/// A non-blank `q` parameter runs a keyword search instead of a plain list.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<ProjectDetail>>> {
    let projects = match params.q.as_deref() {
        Some(q) if !q.trim().is_empty() => {
            ProjectRepo::search(&state.pool, q, state.config.search_match_case()).await?
        }
        _ => ProjectRepo::list(&state.pool).await?,
    };
    Ok(Json(projects))
}

/// GET /api/projects/search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<ProjectDetail>>> {
    let query = params.q.unwrap_or_default();
    let projects =
        ProjectRepo::search(&state.pool, &query, state.config.search_match_case()).await?;
    Ok(Json(projects))
}

/// GET /api/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectDetail>> {
    let detail = ProjectRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(detail))
}

/// PUT/PATCH /api/projects/{id}
///
/// Only keys present in the body change. A `tags` key replaces the tag
/// collection by reconciliation. When the image URL changes, the old file
/// is deleted after the new value is committed.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<Value>,
) -> AppResult<Json<ProjectDetail>> {
    let current = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?
        .fields();

    let patch = ProjectPatch::from_payload(&payload::into_payload(body)?)?;
    let next = patch.apply(&current, chrono::Utc::now());
    next.validate()?;

    let detail = ProjectRepo::update(&state.pool, id, &next, patch.tags.as_deref())
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(old_url) = project::replaced_image(&current, &next) {
        files::discard_image(&state, &old_url).await;
    }

    tracing::info!(project_id = id, "Project updated");
    Ok(Json(detail))
}

/// DELETE /api/projects/{id}
///
/// Removes the project with its tags and images, then deletes the project
/// image file and every gallery file (best effort).
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let image_urls = ProjectRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    for url in &image_urls {
        files::discard_image(&state, url).await;
    }

    tracing::info!(project_id = id, files = image_urls.len(), "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/projects/{id}/tags
pub async fn list_tags(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Tag>>> {
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let tags = TagRepo::list_by_project(&state.pool, id).await?;
    Ok(Json(tags))
}
