use axum::routing::get;
use axum::Router;

use crate::handlers::yarn;
use crate::state::AppState;

/// Routes mounted at `/yarns`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// PATCH  /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(yarn::list).post(yarn::create))
        .route(
            "/{id}",
            get(yarn::get_by_id)
                .put(yarn::update)
                .patch(yarn::update)
                .delete(yarn::delete),
        )
}
