//! Route definitions for project gallery images.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{project_image, upload};
use crate::state::AppState;

/// Routes mounted at `/project/image`.
///
/// ```text
/// POST   /          -> create (JSON or multipart)
/// POST   /upload    -> upload::upload_image
/// GET    /{id}      -> get_by_id
/// PUT    /{id}      -> update (JSON or multipart)
/// POST   /{id}      -> update
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(project_image::create))
        .route("/upload", post(upload::upload_image))
        .route(
            "/{id}",
            get(project_image::get_by_id)
                .put(project_image::update)
                .post(project_image::update)
                .delete(project_image::delete),
        )
}
