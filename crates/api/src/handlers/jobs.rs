use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use storyreel_client::JobApi;
use storyreel_core::job::JobListQuery;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /admin/jobs
///
/// List jobs, optionally only those of `story_id`.
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobListQuery>,
) -> AppResult<impl IntoResponse> {
    let jobs = state.backend.list_jobs(params.story_id).await?;
    Ok(Json(jobs))
}
