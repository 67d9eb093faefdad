pub mod health;
pub mod project;
pub mod project_image;
pub mod tags;
pub mod upload;
pub mod yarn;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                          list (?q= searches), create
/// /projects/search                   keyword search (?q=)
/// /projects/{id}                     get, update (PUT/PATCH), delete
/// /projects/{id}/tags                tags of a project
///
/// /tags                              list, create
/// /tags/{id}                         get, update, delete
/// /tags/project/{project_id}         tags of a project
///
/// /yarns                             list, create
/// /yarns/{id}                        get, update (PUT/PATCH), delete
///
/// /project/image                     attach an image to a project
/// /project/image/upload              upload a file, returns its URL
/// /project/image/{id}                get, update (PUT/POST), delete
///
/// /image/upload                      upload a file, returns its URL
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/tags", tags::router())
        .nest("/yarns", yarn::router())
        .nest("/project/image", project_image::router())
        .nest("/image", upload::router())
}
