//! Render jobs: wire shape, enqueue payload and display labels.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::story::StoryStatus;
use crate::types::DbId;

/// Job is waiting for a renderer.
pub const JOB_STATUS_QUEUED: &str = "queued";
/// Job is being rendered.
pub const JOB_STATUS_RUNNING: &str = "running";
/// Job finished successfully.
pub const JOB_STATUS_DONE: &str = "done";
/// Job failed.
pub const JOB_STATUS_ERROR: &str = "error";

/// Label shown for any status string not listed above.
pub const UNKNOWN_STATUS_LABEL: &str = "Unknown";

/// Kind of the job created by an enqueue.
pub const JOB_KIND_RENDER: &str = "render";

/// Render preset used when the caller does not pick one.
pub const DEFAULT_PRESET: &str = "default";

/// A backend job. `status` is open-ended and may hold values this crate
/// does not know about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: DbId,
    pub story_id: Option<DbId>,
    pub kind: String,
    pub status: String,
}

impl Job {
    /// Display label for this job's status.
    pub fn status_label(&self) -> &'static str {
        map_job_status(&self.status)
    }
}

/// Map a raw job status to its display label. Never fails.
pub fn map_job_status(status: &str) -> &'static str {
    match status {
        JOB_STATUS_QUEUED => "Queued",
        JOB_STATUS_RUNNING => "Running",
        JOB_STATUS_DONE => "Done",
        JOB_STATUS_ERROR => "Error",
        _ => UNKNOWN_STATUS_LABEL,
    }
}

/// Body of an enqueue request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct EnqueueRequest {
    #[validate(length(min = 1, max = 100))]
    pub preset: String,
    #[serde(default)]
    pub captions: bool,
}

impl Default for EnqueueRequest {
    fn default() -> Self {
        Self {
            preset: DEFAULT_PRESET.to_string(),
            captions: false,
        }
    }
}

/// Response of an enqueue request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnqueueResponse {
    pub jobs: Vec<Job>,
}

/// Query filter for listing jobs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobListQuery {
    pub story_id: Option<DbId>,
}

/// Why a story may not be enqueued yet, if anything.
///
/// Enqueueing requires an approved story and at least one selected image.
pub fn enqueue_blocker(status: StoryStatus, selected_images: usize) -> Option<String> {
    if status != StoryStatus::Approved {
        return Some(format!(
            "Story must be approved before enqueueing (current status: {status})"
        ));
    }
    if selected_images == 0 {
        return Some("Select at least one image before enqueueing".to_string());
    }
    None
}
