//! HTTP-level integration tests for the gateway routes.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener. The backend is the seeded in-memory one.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, patch_json, post_json, seeded_backend};
use serde_json::json;
use storyreel_core::story::StoryStatus;

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_reports_upstream_mode() {
    let app = build_test_app(seeded_backend().await);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["upstream"], "in_memory");
    assert_eq!(json["upstream_healthy"], true);
}

#[tokio::test]
async fn health_check_is_degraded_when_backend_fails() {
    let backend = seeded_backend().await;
    backend.fail_next(500).await;
    let response = get(build_test_app(backend), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "degraded");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app(seeded_backend().await);
    let response = get(app, "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Stories
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_stories_filters_by_status() {
    let backend = seeded_backend().await;
    backend.set_story_status(2, StoryStatus::Approved).await;

    let response = get(build_test_app(backend.clone()), "/admin/stories").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);

    let response = get(build_test_app(backend), "/admin/stories?status=approved").await;
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["id"], 2);
    assert_eq!(json[0]["status"], "approved");
}

#[tokio::test]
async fn get_missing_story_returns_404() {
    let app = build_test_app(seeded_backend().await);
    let response = get(app, "/admin/stories/999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn patch_story_sets_status_and_records_notes() {
    let backend = seeded_backend().await;
    let response = patch_json(
        build_test_app(backend.clone()),
        "/admin/stories/1",
        json!({"status": "rejected", "notes": "Too short"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "rejected");
    assert_eq!(backend.notes(1).await, vec!["Too short".to_string()]);
}

#[tokio::test]
async fn overlong_notes_are_rejected_before_reaching_backend() {
    let backend = seeded_backend().await;
    let response = patch_json(
        build_test_app(backend.clone()),
        "/admin/stories/1",
        json!({"status": "approved", "notes": "x".repeat(10_001)}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    assert!(backend.notes(1).await.is_empty());
}

#[tokio::test]
async fn split_returns_parts_with_estimates() {
    let backend = seeded_backend().await;
    let response = post_json(
        build_test_app(backend.clone()),
        "/admin/stories/2/split",
        json!({"parts": ["This is the first sentence.", "Here is the second one."]}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json[1]["index"], 1);
    assert_eq!(json[1]["body_md"], "Here is the second one.");
    assert_eq!(json[1]["est_seconds"], 2);
    assert_eq!(backend.parts(2).await.len(), 2);
}

#[tokio::test]
async fn split_with_blank_part_is_rejected() {
    let app = build_test_app(seeded_backend().await);
    let response = post_json(app, "/admin/stories/2/split", json!({"parts": ["One.", " "]})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Part 1 is empty");
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn enqueue_returns_jobs_and_jobs_are_listed() {
    let backend = seeded_backend().await;
    let response = post_json(
        build_test_app(backend.clone()),
        "/admin/stories/2/enqueue",
        json!({"preset": "default", "captions": true}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["jobs"][0]["kind"], "render");
    assert_eq!(json["jobs"][0]["status"], "queued");

    let response = get(build_test_app(backend.clone()), "/admin/jobs?story_id=2").await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    let response = get(build_test_app(backend), "/admin/jobs?story_id=1").await;
    assert!(body_json(response).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn enqueue_with_empty_preset_is_rejected() {
    let app = build_test_app(seeded_backend().await);
    let response = post_json(app, "/admin/stories/2/enqueue", json!({"preset": ""})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Catalog and images
// ---------------------------------------------------------------------------

#[tokio::test]
async fn catalog_lists_images() {
    let app = build_test_app(seeded_backend().await);
    let json = body_json(get(app, "/catalog").await).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[1]["nsfw"], true);
}

#[tokio::test]
async fn image_patch_and_fetch() {
    let backend = seeded_backend().await;

    let json = body_json(get(build_test_app(backend.clone()), "/stories/2/images").await).await;
    let image_id = json[0]["id"].as_i64().unwrap();

    let response = patch_json(
        build_test_app(backend.clone()),
        &format!("/stories/2/images/{image_id}"),
        json!({"selected": true}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["selected"], true);

    let response = post_json(build_test_app(backend), "/stories/2/fetch-images", json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn empty_image_patch_is_rejected() {
    let app = build_test_app(seeded_backend().await);
    let response = patch_json(app, "/stories/2/images/1", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = build_test_app(seeded_backend().await);
    let response = get(app, "/catalog").await;
    assert!(response.headers().contains_key("x-request-id"));
}
