use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use storyreel_client::CatalogApi;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /catalog
pub async fn get_catalog(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let images = state.backend.fetch_catalog().await?;
    Ok(Json(images))
}
