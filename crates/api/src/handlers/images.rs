//! Handlers for story image assets.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use storyreel_client::AssetApi;
use storyreel_core::media::AssetPatch;
use storyreel_core::types::DbId;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /stories/{id}/images
///
/// Image assets of a story, in rank order.
pub async fn list_images(
    State(state): State<AppState>,
    Path(story_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let assets = state.backend.list_images(story_id).await?;
    Ok(Json(assets))
}

/// PATCH /stories/{id}/images/{image_id}
///
/// Set `selected` and/or `rank` on one image.
pub async fn patch_image(
    State(state): State<AppState>,
    Path((story_id, image_id)): Path<(DbId, DbId)>,
    Json(input): Json<AssetPatch>,
) -> AppResult<impl IntoResponse> {
    input.check()?;

    let asset = state.backend.patch_image(story_id, image_id, &input).await?;

    tracing::debug!(story_id, image_id, selected = asset.selected, rank = ?asset.rank, "Image patched");

    Ok(Json(asset))
}

/// POST /stories/{id}/fetch-images
///
/// Ask the backend to fetch candidate images. Returns the updated list.
pub async fn fetch_images(
    State(state): State<AppState>,
    Path(story_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let assets = state.backend.fetch_images(story_id).await?;

    tracing::info!(story_id, images = assets.len(), "Images fetched");

    Ok(Json(assets))
}
