//! Route definitions for individual tags.

use axum::routing::get;
use axum::Router;

use crate::handlers::tags;
use crate::state::AppState;

/// Routes mounted at `/tags`.
///
/// ```text
/// GET    /                       -> list
/// POST   /                       -> create
/// GET    /{id}                   -> get_by_id
/// PUT    /{id}                   -> update
/// DELETE /{id}                   -> delete
/// GET    /project/{project_id}   -> list_by_project
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tags::list).post(tags::create))
        .route(
            "/{id}",
            get(tags::get_by_id).put(tags::update).delete(tags::delete),
        )
        .route("/project/{project_id}", get(tags::list_by_project))
}
