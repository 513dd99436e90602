//! Handlers for the `/admin/stories` resource.
//!
//! Payloads are validated here before they reach the backend, so the
//! gateway rejects the same requests in proxy and in-memory mode.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use storyreel_client::{JobApi, SplitApi, StoryApi};
use storyreel_core::error::CoreError;
use storyreel_core::job::{EnqueueRequest, EnqueueResponse};
use storyreel_core::story::{SplitRequest, StoryListQuery, StoryUpdate};
use storyreel_core::types::DbId;
use validator::Validate;

use crate::error::AppResult;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// GET /admin/stories
///
/// List stories, optionally filtered by `status`.
pub async fn list_stories(
    State(state): State<AppState>,
    Query(params): Query<StoryListQuery>,
) -> AppResult<impl IntoResponse> {
    let stories = state.backend.list_stories(params.status).await?;
    Ok(Json(stories))
}

/// GET /admin/stories/{id}
pub async fn get_story(
    State(state): State<AppState>,
    Path(story_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let story = state.backend.get_story(story_id).await?;
    Ok(Json(story))
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// PATCH /admin/stories/{id}
///
/// Partial update: status change with optional review notes, or title and
/// body edits. Absent fields are left unchanged.
pub async fn update_story(
    State(state): State<AppState>,
    Path(story_id): Path<DbId>,
    Json(input): Json<StoryUpdate>,
) -> AppResult<impl IntoResponse> {
    input.validate().map_err(CoreError::from)?;

    let story = state.backend.update_story(story_id, &input).await?;

    tracing::info!(
        story_id,
        status = %story.status,
        has_notes = input.notes.is_some(),
        "Story updated",
    );

    Ok(Json(story))
}

// ---------------------------------------------------------------------------
// Split / enqueue
// ---------------------------------------------------------------------------

/// POST /admin/stories/{id}/split
///
/// Replace the story's parts with the submitted texts. Returns the saved
/// parts with their estimated durations.
pub async fn split_story(
    State(state): State<AppState>,
    Path(story_id): Path<DbId>,
    Json(input): Json<SplitRequest>,
) -> AppResult<impl IntoResponse> {
    input.check()?;

    let parts = state.backend.submit_split(story_id, &input.parts).await?;

    tracing::info!(story_id, parts = parts.len(), "Story split");

    Ok(Json(parts))
}

/// POST /admin/stories/{id}/enqueue
///
/// Create render jobs. Returns 201 with `{jobs}`.
pub async fn enqueue_story(
    State(state): State<AppState>,
    Path(story_id): Path<DbId>,
    Json(input): Json<EnqueueRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate().map_err(CoreError::from)?;

    let jobs = state.backend.enqueue(story_id, &input).await?;

    tracing::info!(
        story_id,
        jobs = jobs.len(),
        preset = %input.preset,
        captions = input.captions,
        "Story enqueued",
    );

    Ok((StatusCode::CREATED, Json(EnqueueResponse { jobs })))
}
