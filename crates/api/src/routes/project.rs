//! Route definitions for the `/projects` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> create
/// GET    /search         -> search
/// GET    /{id}           -> get_by_id
/// PUT    /{id}           -> update
/// PATCH  /{id}           -> update
/// DELETE /{id}           -> delete
/// GET    /{id}/tags      -> list_tags
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/search", get(project::search))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .patch(project::update)
                .delete(project::delete),
        )
        .route("/{id}/tags", get(project::list_tags))
}
