//! Route definitions for the `/admin/stories` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::stories;
use crate::state::AppState;

/// Routes mounted at `/admin/stories`.
///
/// ```text
/// GET    /                -> list_stories
/// GET    /{id}            -> get_story
/// PATCH  /{id}            -> update_story
/// POST   /{id}/split      -> split_story
/// POST   /{id}/enqueue    -> enqueue_story
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(stories::list_stories))
        .route("/{id}", get(stories::get_story).patch(stories::update_story))
        .route("/{id}/split", post(stories::split_story))
        .route("/{id}/enqueue", post(stories::enqueue_story))
}
