//! The backend surface the pipeline depends on.
//!
//! Each trait covers one collaborator. The editor only needs their
//! input/output shapes; transport is up to the implementation.

use async_trait::async_trait;
use storyreel_core::job::{EnqueueRequest, Job};
use storyreel_core::media::{Asset, AssetPatch, CatalogImage};
use storyreel_core::story::{Story, StoryPart, StoryStatus, StoryUpdate};
use storyreel_core::types::DbId;

use crate::error::ClientError;

/// Story fetch and partial update.
#[async_trait]
pub trait StoryApi: Send + Sync {
    async fn list_stories(&self, status: Option<StoryStatus>) -> Result<Vec<Story>, ClientError>;

    async fn get_story(&self, id: DbId) -> Result<Story, ClientError>;

    async fn update_story(&self, id: DbId, update: &StoryUpdate) -> Result<Story, ClientError>;
}

/// Submission of finalized part texts.
#[async_trait]
pub trait SplitApi: Send + Sync {
    async fn submit_split(&self, id: DbId, parts: &[String]) -> Result<Vec<StoryPart>, ClientError>;
}

/// Render job creation and listing.
#[async_trait]
pub trait JobApi: Send + Sync {
    async fn enqueue(&self, story_id: DbId, request: &EnqueueRequest)
        -> Result<Vec<Job>, ClientError>;

    async fn list_jobs(&self, story_id: Option<DbId>) -> Result<Vec<Job>, ClientError>;
}

/// Media catalog used to populate image choices.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogImage>, ClientError>;
}

/// Per-story image assets.
#[async_trait]
pub trait AssetApi: Send + Sync {
    async fn list_images(&self, story_id: DbId) -> Result<Vec<Asset>, ClientError>;

    async fn patch_image(
        &self,
        story_id: DbId,
        image_id: DbId,
        patch: &AssetPatch,
    ) -> Result<Asset, ClientError>;

    /// Ask the backend to fetch candidate images for the story.
    async fn fetch_images(&self, story_id: DbId) -> Result<Vec<Asset>, ClientError>;
}

/// Everything the gateway forwards.
pub trait Backend: StoryApi + SplitApi + JobApi + CatalogApi + AssetApi {}

impl<T> Backend for T where T: StoryApi + SplitApi + JobApi + CatalogApi + AssetApi {}
