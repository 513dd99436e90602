//! Route definitions for story image assets.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::images;
use crate::state::AppState;

/// Routes mounted at `/stories`.
///
/// ```text
/// GET    /{id}/images               -> list_images
/// PATCH  /{id}/images/{image_id}    -> patch_image
/// POST   /{id}/fetch-images         -> fetch_images
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/images", get(images::list_images))
        .route("/{id}/images/{image_id}", patch(images::patch_image))
        .route("/{id}/fetch-images", post(images::fetch_images))
}
