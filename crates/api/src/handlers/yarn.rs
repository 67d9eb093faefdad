//! Handlers for the `/yarns` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use validator::Validate;
use yarnstash_core::error::CoreError;
use yarnstash_core::payload;
use yarnstash_core::types::DbId;
use yarnstash_core::yarn::{self, YarnPatch};
use yarnstash_db::models::yarn::Yarn;
use yarnstash_db::repositories::YarnRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::files;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Yarn", id })
}

/// POST /api/yarns
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<Yarn>)> {
    let patch = YarnPatch::from_payload(&payload::into_payload(body)?)?;
    let fields = patch.create()?;
    fields.validate()?;

    let yarn = YarnRepo::create(&state.pool, &fields).await?;
    tracing::info!(yarn_id = yarn.id, "Yarn created");
    Ok((StatusCode::CREATED, Json(yarn)))
}

/// GET /api/yarns
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Yarn>>> {
    let yarns = YarnRepo::list(&state.pool).await?;
    Ok(Json(yarns))
}

/// GET /api/yarns/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Yarn>> {
    let yarn = YarnRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(yarn))
}

/// PUT/PATCH /api/yarns/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<Value>,
) -> AppResult<Json<Yarn>> {
    let current = YarnRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?
        .fields();

    let patch = YarnPatch::from_payload(&payload::into_payload(body)?)?;
    let next = patch.apply(&current);
    next.validate()?;

    let yarn = YarnRepo::update(&state.pool, id, &next)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(old_url) = yarn::replaced_image(&current, &next) {
        files::discard_image(&state, &old_url).await;
    }

    tracing::info!(yarn_id = id, "Yarn updated");
    Ok(Json(yarn))
}

/// DELETE /api/yarns/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let yarn = YarnRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !YarnRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    if let Some(url) = &yarn.image_url {
        files::discard_image(&state, url).await;
    }

    tracing::info!(yarn_id = id, "Yarn deleted");
    Ok(StatusCode::NO_CONTENT)
}
