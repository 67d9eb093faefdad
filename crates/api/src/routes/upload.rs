use axum::routing::post;
use axum::Router;

use crate::handlers::upload;
use crate::state::AppState;

/// Routes mounted at `/image`.
///
/// ```text
/// POST   /upload    -> upload_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/upload", post(upload::upload_image))
}
