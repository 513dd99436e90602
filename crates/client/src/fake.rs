//! In-memory backend for tests and offline development.
//!
//! Holds stories, parts, jobs, assets and a catalog behind a single lock.
//! Identities come from an injected [`IdGenerator`] so tests can predict
//! them. Failures can be queued with [`InMemoryBackend::fail_next`] to
//! exercise rollback paths.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use storyreel_core::error::CoreError;
use storyreel_core::job::{EnqueueRequest, Job, JOB_KIND_RENDER, JOB_STATUS_QUEUED};
use storyreel_core::media::{Asset, AssetPatch, CatalogImage};
use storyreel_core::split::{count_words, estimate_duration};
use storyreel_core::story::{SplitRequest, Story, StoryPart, StoryStatus, StoryUpdate};
use storyreel_core::types::DbId;
use tokio::sync::RwLock;

use crate::api::{AssetApi, CatalogApi, JobApi, SplitApi, StoryApi};
use crate::error::ClientError;

// ---------------------------------------------------------------------------
// Identity generation
// ---------------------------------------------------------------------------

/// Source of new entity ids.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> DbId;
}

/// Monotonic ids starting from a fixed value.
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicI64,
}

impl SequentialIds {
    pub fn starting_at(first: DbId) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> DbId {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FakeState {
    stories: BTreeMap<DbId, Story>,
    parts: HashMap<DbId, Vec<StoryPart>>,
    notes: HashMap<DbId, Vec<String>>,
    jobs: Vec<Job>,
    assets: HashMap<DbId, Vec<Asset>>,
    catalog: Vec<CatalogImage>,
    failures: VecDeque<u16>,
}

/// Backend that keeps everything in process memory.
pub struct InMemoryBackend {
    state: RwLock<FakeState>,
    story_ids: Arc<dyn IdGenerator>,
    job_ids: Arc<dyn IdGenerator>,
    asset_ids: Arc<dyn IdGenerator>,
}

impl InMemoryBackend {
    /// Empty backend drawing every kind of id from `ids`.
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            state: RwLock::new(FakeState::default()),
            story_ids: Arc::clone(&ids),
            job_ids: Arc::clone(&ids),
            asset_ids: ids,
        }
    }

    /// Empty backend with independent sequential ids per entity kind,
    /// each starting at 1.
    pub fn with_sequential_ids() -> Self {
        Self {
            state: RwLock::new(FakeState::default()),
            story_ids: Arc::new(SequentialIds::default()),
            job_ids: Arc::new(SequentialIds::default()),
            asset_ids: Arc::new(SequentialIds::default()),
        }
    }

    /// Backend pre-populated with two pending stories, one of them with
    /// images, and a two-image catalog.
    pub async fn seeded() -> Self {
        let backend = Self::with_sequential_ids();
        backend
            .insert_story("First story", Some("Hello"), StoryStatus::Pending)
            .await;
        let second = backend
            .insert_story(
                "Second story",
                Some("This is the first sentence. Here is the second one. And finally the third."),
                StoryStatus::Pending,
            )
            .await;
        backend
            .set_catalog(vec![
                CatalogImage {
                    url: "https://images.example/forest.jpg".into(),
                    nsfw: Some(false),
                    attribution: Some("img1".into()),
                },
                CatalogImage {
                    url: "https://images.example/city.jpg".into(),
                    nsfw: Some(true),
                    attribution: Some("img2".into()),
                },
            ])
            .await;
        backend
            .insert_asset(second.id, "https://images.example/cover.jpg")
            .await;
        backend
    }

    /// Insert a story and return it.
    pub async fn insert_story(
        &self,
        title: &str,
        body_md: Option<&str>,
        status: StoryStatus,
    ) -> Story {
        let story = Story {
            id: self.story_ids.next_id(),
            title: title.to_string(),
            body_md: body_md.map(str::to_string),
            status,
            updated_at: Some(Utc::now()),
        };
        self.state
            .write()
            .await
            .stories
            .insert(story.id, story.clone());
        story
    }

    /// Attach an unselected image asset to a story, ranked last.
    pub async fn insert_asset(&self, story_id: DbId, remote_url: &str) -> Asset {
        let mut state = self.state.write().await;
        let assets = state.assets.entry(story_id).or_default();
        let asset = Asset {
            id: self.asset_ids.next_id(),
            remote_url: remote_url.to_string(),
            selected: false,
            rank: Some(assets.len() as i32),
        };
        assets.push(asset.clone());
        asset
    }

    /// Replace the catalog.
    pub async fn set_catalog(&self, catalog: Vec<CatalogImage>) {
        self.state.write().await.catalog = catalog;
    }

    /// Make the next remote call fail with `status`. Calls queue up.
    pub async fn fail_next(&self, status: u16) {
        self.state.write().await.failures.push_back(status);
    }

    /// Overwrite a job's status, as a renderer would.
    pub async fn set_job_status(&self, job_id: DbId, status: &str) -> bool {
        let mut state = self.state.write().await;
        match state.jobs.iter_mut().find(|job| job.id == job_id) {
            Some(job) => {
                job.status = status.to_string();
                true
            }
            None => false,
        }
    }

    /// Overwrite a story's status, as the backend would on its own.
    pub async fn set_story_status(&self, story_id: DbId, status: StoryStatus) -> bool {
        let mut state = self.state.write().await;
        match state.stories.get_mut(&story_id) {
            Some(story) => {
                story.status = status;
                true
            }
            None => false,
        }
    }

    /// Review notes recorded for a story, oldest first.
    pub async fn notes(&self, story_id: DbId) -> Vec<String> {
        let state = self.state.read().await;
        state.notes.get(&story_id).cloned().unwrap_or_default()
    }

    /// Parts saved by the last split of a story.
    pub async fn parts(&self, story_id: DbId) -> Vec<StoryPart> {
        let state = self.state.read().await;
        state.parts.get(&story_id).cloned().unwrap_or_default()
    }

    /// Pop one queued failure, if any.
    async fn take_failure(&self) -> Result<(), ClientError> {
        match self.state.write().await.failures.pop_front() {
            Some(status) => Err(ClientError::Api {
                status,
                body: format!("injected failure ({status})"),
            }),
            None => Ok(()),
        }
    }
}

fn story_not_found(id: DbId) -> ClientError {
    rejected(CoreError::NotFound { entity: "Story", id })
}

/// Render a domain error the way an HTTP backend would report it.
fn rejected(err: CoreError) -> ClientError {
    let status = match &err {
        CoreError::NotFound { .. } => 404,
        CoreError::Validation(_) => 400,
        CoreError::Conflict(_) => 409,
        CoreError::Internal(_) => 500,
    };
    ClientError::Api {
        status,
        body: err.to_string(),
    }
}

#[async_trait]
impl StoryApi for InMemoryBackend {
    async fn list_stories(&self, status: Option<StoryStatus>) -> Result<Vec<Story>, ClientError> {
        self.take_failure().await?;
        let state = self.state.read().await;
        Ok(state
            .stories
            .values()
            .filter(|story| status.map_or(true, |s| story.status == s))
            .cloned()
            .collect())
    }

    async fn get_story(&self, id: DbId) -> Result<Story, ClientError> {
        self.take_failure().await?;
        let state = self.state.read().await;
        state.stories.get(&id).cloned().ok_or_else(|| story_not_found(id))
    }

    async fn update_story(&self, id: DbId, update: &StoryUpdate) -> Result<Story, ClientError> {
        self.take_failure().await?;
        validator::Validate::validate(update)
            .map_err(|e| rejected(CoreError::from(e)))?;

        let mut state = self.state.write().await;
        let story = state.stories.get_mut(&id).ok_or_else(|| story_not_found(id))?;
        if let Some(status) = update.status {
            story.status = status;
        }
        if let Some(title) = &update.title {
            story.title = title.clone();
        }
        if let Some(body) = &update.body_md {
            story.body_md = Some(body.clone());
        }
        story.updated_at = Some(Utc::now());
        let story = story.clone();

        if let Some(notes) = update.notes.as_ref().filter(|n| !n.trim().is_empty()) {
            state.notes.entry(id).or_default().push(notes.clone());
        }
        Ok(story)
    }
}

#[async_trait]
impl SplitApi for InMemoryBackend {
    async fn submit_split(&self, id: DbId, parts: &[String]) -> Result<Vec<StoryPart>, ClientError> {
        self.take_failure().await?;
        SplitRequest {
            parts: parts.to_vec(),
        }
        .check()
        .map_err(rejected)?;

        let mut state = self.state.write().await;
        let story = state.stories.get_mut(&id).ok_or_else(|| story_not_found(id))?;
        story.status = StoryStatus::Split;
        story.updated_at = Some(Utc::now());

        let saved: Vec<StoryPart> = parts
            .iter()
            .enumerate()
            .map(|(index, text)| StoryPart {
                index,
                body_md: text.clone(),
                est_seconds: estimate_duration(count_words(text)),
            })
            .collect();
        state.parts.insert(id, saved.clone());
        Ok(saved)
    }
}

#[async_trait]
impl JobApi for InMemoryBackend {
    async fn enqueue(
        &self,
        story_id: DbId,
        request: &EnqueueRequest,
    ) -> Result<Vec<Job>, ClientError> {
        self.take_failure().await?;
        validator::Validate::validate(request).map_err(|e| rejected(CoreError::from(e)))?;

        let mut state = self.state.write().await;
        if !state.stories.contains_key(&story_id) {
            return Err(story_not_found(story_id));
        }
        let job = Job {
            id: self.job_ids.next_id(),
            story_id: Some(story_id),
            kind: JOB_KIND_RENDER.to_string(),
            status: JOB_STATUS_QUEUED.to_string(),
        };
        state.jobs.push(job.clone());
        tracing::debug!(story_id, job_id = job.id, preset = %request.preset, "Fake job enqueued");
        Ok(vec![job])
    }

    async fn list_jobs(&self, story_id: Option<DbId>) -> Result<Vec<Job>, ClientError> {
        self.take_failure().await?;
        let state = self.state.read().await;
        Ok(state
            .jobs
            .iter()
            .filter(|job| story_id.is_none() || job.story_id == story_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CatalogApi for InMemoryBackend {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogImage>, ClientError> {
        self.take_failure().await?;
        Ok(self.state.read().await.catalog.clone())
    }
}

#[async_trait]
impl AssetApi for InMemoryBackend {
    async fn list_images(&self, story_id: DbId) -> Result<Vec<Asset>, ClientError> {
        self.take_failure().await?;
        let state = self.state.read().await;
        if !state.stories.contains_key(&story_id) {
            return Err(story_not_found(story_id));
        }
        let mut assets = state.assets.get(&story_id).cloned().unwrap_or_default();
        assets.sort_by_key(|a| a.rank.unwrap_or(i32::MAX));
        Ok(assets)
    }

    async fn patch_image(
        &self,
        story_id: DbId,
        image_id: DbId,
        patch: &AssetPatch,
    ) -> Result<Asset, ClientError> {
        self.take_failure().await?;
        patch.check().map_err(rejected)?;
        let mut state = self.state.write().await;
        let asset = state
            .assets
            .get_mut(&story_id)
            .and_then(|assets| assets.iter_mut().find(|a| a.id == image_id))
            .ok_or_else(|| {
                rejected(CoreError::NotFound {
                    entity: "Image",
                    id: image_id,
                })
            })?;
        patch.apply(asset);
        Ok(asset.clone())
    }

    async fn fetch_images(&self, story_id: DbId) -> Result<Vec<Asset>, ClientError> {
        self.take_failure().await?;
        let mut state = self.state.write().await;
        if !state.stories.contains_key(&story_id) {
            return Err(story_not_found(story_id));
        }
        let catalog = state.catalog.clone();
        let assets = state.assets.entry(story_id).or_default();
        for image in catalog {
            if assets.iter().any(|a| a.remote_url == image.url) {
                continue;
            }
            let rank = assets.len() as i32;
            assets.push(Asset {
                id: self.asset_ids.next_id(),
                remote_url: image.url,
                selected: false,
                rank: Some(rank),
            });
        }
        Ok(assets.clone())
    }
}
