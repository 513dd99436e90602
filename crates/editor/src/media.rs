//! Media step: pick one catalog image per part.

use std::sync::Arc;

use storyreel_client::{CatalogApi, StoryApi};
use storyreel_core::media::{all_assigned, bulk_apply, select_image, CatalogImage, ImageSlots};
use storyreel_core::split::{join_part, split_text, DEFAULT_TARGET_SECONDS};
use storyreel_core::story::{Story, StoryAction, StoryStatus, StoryUpdate};
use storyreel_core::types::DbId;
use tokio::sync::watch;

use crate::busy::BusyFlag;
use crate::error::EditorError;
use crate::optimistic::OptimisticValue;

pub struct MediaSession<A: ?Sized> {
    api: Arc<A>,
    story_id: DbId,
    parts: Vec<String>,
    slots: ImageSlots,
    catalog: Vec<CatalogImage>,
    status: OptimisticValue<StoryStatus>,
    busy: BusyFlag,
}

impl<A: StoryApi + CatalogApi + ?Sized> MediaSession<A> {
    /// Session over the given part texts, all slots empty.
    pub fn new(api: Arc<A>, story: &Story, parts: Vec<String>) -> Self {
        let slots = vec![None; parts.len()];
        Self {
            api,
            story_id: story.id,
            parts,
            slots,
            catalog: Vec::new(),
            status: OptimisticValue::new(story.status),
            busy: BusyFlag::default(),
        }
    }

    /// Session over the story's body, split at the default target.
    pub fn from_story(api: Arc<A>, story: &Story) -> Self {
        let parts = split_text(story.body(), DEFAULT_TARGET_SECONDS)
            .iter()
            .map(|part| join_part(part))
            .collect();
        Self::new(api, story, parts)
    }

    /// Fetch the catalog. A failed fetch leaves an empty catalog.
    pub async fn load_catalog(&mut self) -> &[CatalogImage] {
        self.catalog = match self.api.fetch_catalog().await {
            Ok(images) => images,
            Err(e) => {
                tracing::warn!(story_id = self.story_id, error = %e, "Catalog fetch failed");
                Vec::new()
            }
        };
        &self.catalog
    }

    pub fn catalog(&self) -> &[CatalogImage] {
        &self.catalog
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn slots(&self) -> &[Option<CatalogImage>] {
        &self.slots
    }

    pub fn status(&self) -> StoryStatus {
        self.status.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoryStatus> {
        self.status.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Assign `image` to part `index`; out-of-range indexes are ignored.
    pub fn select(&mut self, index: usize, image: CatalogImage) {
        self.slots = select_image(&self.slots, index, image);
    }

    /// Assign the catalog entry at `catalog_index` to part `index`.
    pub fn select_from_catalog(&mut self, index: usize, catalog_index: usize) -> bool {
        match self.catalog.get(catalog_index).cloned() {
            Some(image) if index < self.slots.len() => {
                self.select(index, image);
                true
            }
            _ => false,
        }
    }

    /// Use the first part's image for every part.
    pub fn apply_to_all(&mut self) {
        self.slots = bulk_apply(&self.slots);
    }

    pub fn is_complete(&self) -> bool {
        all_assigned(&self.slots)
    }

    /// Move the story to `media_selected`. Every part needs an image.
    pub async fn save(&self) -> Result<Story, EditorError> {
        let action = StoryAction::SaveMedia;
        if !self.is_complete() {
            let missing = self.slots.iter().filter(|slot| slot.is_none()).count();
            let reason = if self.slots.is_empty() {
                "story has no parts".to_string()
            } else {
                format!("{missing} of {} parts have no image", self.slots.len())
            };
            return Err(EditorError::precondition(action.name(), reason));
        }

        let _busy = self.busy.enter();
        let api = self.api.as_ref();
        let story_id = self.story_id;
        let update = StoryUpdate::status(action.target_status(), None);
        let update = &update;

        let story = self
            .status
            .transition(action.target_status(), move || api.update_story(story_id, update))
            .await
            .map_err(EditorError::failed(action.name()))?;

        self.status.set(story.status);
        tracing::info!(story_id, parts = self.slots.len(), "Media selection saved");
        Ok(story)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use storyreel_client::fake::InMemoryBackend;

    use super::*;

    async fn session(parts: &[&str]) -> (Arc<InMemoryBackend>, MediaSession<InMemoryBackend>) {
        let backend = Arc::new(InMemoryBackend::seeded().await);
        let story = backend.get_story(2).await.unwrap();
        let parts = parts.iter().map(|p| p.to_string()).collect();
        let session = MediaSession::new(backend.clone(), &story, parts);
        (backend, session)
    }

    #[tokio::test]
    async fn from_story_uses_automatic_split() {
        let backend = Arc::new(InMemoryBackend::seeded().await);
        let story = backend.get_story(1).await.unwrap();
        let session = MediaSession::from_story(backend, &story);
        assert_eq!(session.parts(), ["Hello".to_string()]);
        assert_eq!(session.slots(), [None]);
    }

    #[tokio::test]
    async fn catalog_failure_yields_empty_catalog() {
        let (backend, mut session) = session(&["One."]).await;
        backend.fail_next(500).await;
        assert!(session.load_catalog().await.is_empty());
        assert_eq!(session.load_catalog().await.len(), 2);
    }

    #[tokio::test]
    async fn save_requires_every_part_to_have_an_image() {
        let (_backend, mut session) = session(&["One.", "Two."]).await;
        session.load_catalog().await;
        assert!(session.select_from_catalog(0, 1));
        assert!(!session.select_from_catalog(5, 0));
        assert!(!session.select_from_catalog(0, 9));

        let err = session.save().await.unwrap_err();
        assert_matches!(err, EditorError::Precondition { action: "save-media", ref reason } if reason.contains("1 of 2"));
        assert_eq!(session.status(), StoryStatus::Pending);
    }

    #[tokio::test]
    async fn apply_to_all_then_save() {
        let (backend, mut session) = session(&["One.", "Two.", "Three."]).await;
        session.select(0, CatalogImage::from_url("https://images.example/mine.jpg", Some("me")));
        session.apply_to_all();
        assert!(session.is_complete());

        let story = session.save().await.unwrap();
        assert_eq!(story.status, StoryStatus::MediaSelected);
        assert_eq!(session.status(), StoryStatus::MediaSelected);
        assert_eq!(
            backend.get_story(2).await.unwrap().status,
            StoryStatus::MediaSelected
        );
    }

    #[tokio::test]
    async fn failed_save_rolls_back() {
        let (backend, mut session) = session(&["One."]).await;
        session.select(0, CatalogImage::from_url("https://images.example/a.jpg", None));
        backend.fail_next(409).await;
        let err = session.save().await.unwrap_err();
        assert_matches!(err, EditorError::ActionFailed { action: "save-media", .. });
        assert_eq!(session.status(), StoryStatus::Pending);
    }

    #[tokio::test]
    async fn empty_first_slot_clears_everything() {
        let (_backend, mut session) = session(&["One.", "Two."]).await;
        session.select(1, CatalogImage::from_url("https://images.example/a.jpg", None));
        session.apply_to_all();
        assert_eq!(session.slots(), [None, None]);
    }
}
