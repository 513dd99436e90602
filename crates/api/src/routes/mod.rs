pub mod catalog;
pub mod health;
pub mod images;
pub mod jobs;
pub mod stories;

use axum::Router;

use crate::state::AppState;

/// Build the gateway route tree.
///
/// Route hierarchy:
///
/// ```text
/// /admin/stories                                   list (?status=)
/// /admin/stories/{id}                              get, update (PATCH)
/// /admin/stories/{id}/split                        submit parts (POST)
/// /admin/stories/{id}/enqueue                      create render jobs (POST)
///
/// /admin/jobs                                      list (?story_id=)
///
/// /catalog                                         media catalog
///
/// /stories/{id}/images                             list image assets
/// /stories/{id}/images/{image_id}                  patch selected/rank
/// /stories/{id}/fetch-images                       fetch candidates (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/admin/stories", stories::router())
        .nest("/admin/jobs", jobs::router())
        .merge(catalog::router())
        .nest("/stories", images::router())
}
