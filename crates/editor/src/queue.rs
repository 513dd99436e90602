//! Render queue: enqueue a story and poll job status.

use std::sync::Arc;
use std::time::Duration;

use storyreel_client::config::parse_var;
use storyreel_client::error::ConfigError;
use storyreel_client::JobApi;
use storyreel_core::job::{enqueue_blocker, map_job_status, EnqueueRequest, Job};
use storyreel_core::story::StoryStatus;
use storyreel_core::types::DbId;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::error::EditorError;

/// Default interval between job list polls.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;

/// Create render jobs for a story.
///
/// The story must be approved and have at least one selected image. The
/// story status is left alone; the backend moves it when it sees fit.
pub async fn enqueue<A: JobApi + ?Sized>(
    api: &A,
    story_id: DbId,
    status: StoryStatus,
    selected_images: usize,
    request: &EnqueueRequest,
) -> Result<Vec<Job>, EditorError> {
    if let Some(reason) = enqueue_blocker(status, selected_images) {
        return Err(EditorError::precondition("enqueue", reason));
    }

    let jobs = api
        .enqueue(story_id, request)
        .await
        .map_err(EditorError::failed("enqueue"))?;

    tracing::info!(
        story_id,
        jobs = jobs.len(),
        preset = %request.preset,
        captions = request.captions,
        "Story enqueued",
    );
    Ok(jobs)
}

/* --------------------------------------------------------------------------
Polling
-------------------------------------------------------------------------- */

/// Poller settings.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl PollerConfig {
    /// | Env Var                | Default |
    /// |------------------------|---------|
    /// | `JOB_POLL_INTERVAL_MS` | `2000`  |
    pub fn from_env() -> Result<Self, ConfigError> {
        let millis: u64 = parse_var(
            "JOB_POLL_INTERVAL_MS",
            DEFAULT_POLL_INTERVAL_MS,
            "a positive integer",
        )?;
        if millis == 0 {
            return Err(ConfigError::Invalid {
                name: "JOB_POLL_INTERVAL_MS",
                expected: "a positive integer",
                value: millis.to_string(),
            });
        }
        Ok(Self {
            interval: Duration::from_millis(millis),
        })
    }
}

/// One row of the job table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRow {
    pub id: DbId,
    pub story_id: Option<DbId>,
    pub kind: String,
    pub status: String,
    pub label: &'static str,
}

impl From<Job> for JobRow {
    fn from(job: Job) -> Self {
        let label = map_job_status(&job.status);
        Self {
            id: job.id,
            story_id: job.story_id,
            kind: job.kind,
            status: job.status,
            label,
        }
    }
}

/// Periodically lists jobs and publishes them as [`JobRow`]s.
pub struct JobPoller<A: ?Sized> {
    api: Arc<A>,
    story_id: Option<DbId>,
    interval: Duration,
    rows: watch::Sender<Vec<JobRow>>,
}

impl<A: JobApi + ?Sized> JobPoller<A> {
    /// Poll every job, or only those of `story_id`.
    pub fn new(api: Arc<A>, story_id: Option<DbId>, config: &PollerConfig) -> Self {
        let (rows, _) = watch::channel(Vec::new());
        Self {
            api,
            story_id,
            interval: config.interval,
            rows,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<JobRow>> {
        self.rows.subscribe()
    }

    /// Rows from the last successful poll.
    pub fn rows(&self) -> Vec<JobRow> {
        self.rows.borrow().clone()
    }

    /// Poll once. On failure the previous rows stay published.
    pub async fn poll_once(&self) -> Result<usize, EditorError> {
        let jobs = self
            .api
            .list_jobs(self.story_id)
            .await
            .map_err(EditorError::failed("list-jobs"))?;
        let rows: Vec<JobRow> = jobs.into_iter().map(JobRow::from).collect();
        let count = rows.len();
        self.rows.send_replace(rows);
        Ok(count)
    }

    /// Poll until `cancel` fires. The first poll happens immediately.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(
            story_id = ?self.story_id,
            interval_ms = self.interval.as_millis() as u64,
            "Job poller started",
        );
        let mut interval = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Job poller stopping");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.poll_once().await {
                        tracing::warn!(error = %e, "Job poll failed; keeping previous rows");
                    }
                }
            }
        }
    }
}
