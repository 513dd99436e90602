//! Split step: divide a story into parts, rebalance them by hand, save.

use std::sync::Arc;

use storyreel_client::SplitApi;
use storyreel_core::rebalance::{self, MoveDirection};
use storyreel_core::split::{
    estimate_part, finalize_parts, split_text, DurationBand, Part, PartEstimate,
    DEFAULT_TARGET_SECONDS,
};
use storyreel_core::story::{Story, StoryAction, StoryPart, StoryStatus};
use storyreel_core::types::DbId;
use tokio::sync::watch;

use crate::busy::BusyFlag;
use crate::error::EditorError;
use crate::input::boundary_key;
use crate::optimistic::OptimisticValue;

/// Parts of one story being edited.
pub struct SplitSession<A: ?Sized> {
    api: Arc<A>,
    story_id: DbId,
    body: String,
    target_seconds: u32,
    band: DurationBand,
    parts: Vec<Part>,
    status: OptimisticValue<StoryStatus>,
    busy: BusyFlag,
}

impl<A: SplitApi + ?Sized> SplitSession<A> {
    /// Start from an automatic split at the default target.
    pub fn new(api: Arc<A>, story: &Story) -> Self {
        Self::with_target(api, story, DEFAULT_TARGET_SECONDS)
    }

    pub fn with_target(api: Arc<A>, story: &Story, target_seconds: u32) -> Self {
        Self {
            api,
            story_id: story.id,
            body: story.body().to_string(),
            target_seconds,
            band: DurationBand::DEFAULT,
            parts: split_text(story.body(), target_seconds),
            status: OptimisticValue::new(story.status),
            busy: BusyFlag::default(),
        }
    }

    /// Use a different band for flagging part durations.
    pub fn with_band(mut self, band: DurationBand) -> Self {
        self.band = band;
        self
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn target_seconds(&self) -> u32 {
        self.target_seconds
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

    /// Discard manual moves and split again at a new target.
    pub fn resplit(&mut self, target_seconds: u32) {
        self.target_seconds = target_seconds;
        self.parts = split_text(&self.body, target_seconds);
    }

    pub fn move_sentence(&mut self, boundary: usize, direction: MoveDirection) -> bool {
        rebalance::move_sentence(&mut self.parts, boundary, direction)
    }

    /// Drop boundary handle `from` onto handle `to`.
    pub fn drag(&mut self, from: usize, to: usize) -> usize {
        rebalance::drag_boundary(&mut self.parts, from, to)
    }

    /// Keyboard on a focused boundary handle. Returns whether a sentence
    /// moved.
    pub fn on_key(&mut self, boundary: usize, key: &str) -> bool {
        match boundary_key(key) {
            Some(direction) => self.move_sentence(boundary, direction),
            None => false,
        }
    }

    /// Word count and duration of every part, flagged against the band.
    pub fn estimates(&self) -> Vec<PartEstimate> {
        self.parts
            .iter()
            .map(|part| estimate_part(part, self.band))
            .collect()
    }

    /// Part texts as they would be submitted.
    pub fn part_texts(&self) -> Vec<String> {
        finalize_parts(&self.parts)
    }

    /// Submit the parts and move the story to `split`.
    pub async fn save(&self) -> Result<Vec<StoryPart>, EditorError> {
        let action = StoryAction::SaveSplit;
        let texts = self.part_texts();
        if texts.is_empty() {
            return Err(EditorError::precondition(action.name(), "story has no text to split"));
        }

        let _busy = self.busy.enter();
        let api = self.api.as_ref();
        let story_id = self.story_id;
        let texts = texts.as_slice();

        let saved = self
            .status
            .transition(action.target_status(), move || api.submit_split(story_id, texts))
            .await
            .map_err(EditorError::failed(action.name()))?;

        tracing::info!(story_id, parts = saved.len(), "Split saved");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use storyreel_client::fake::InMemoryBackend;
    use storyreel_client::{ClientError, StoryApi};

    use super::*;

    // Story 2 of the seeded backend has sentences of 5, 5 and 4 words;
    // a 3-second target (8-word budget) puts each in its own part.
    async fn three_part_session() -> (Arc<InMemoryBackend>, SplitSession<InMemoryBackend>) {
        let backend = Arc::new(InMemoryBackend::seeded().await);
        let story = backend.get_story(2).await.unwrap();
        let session = SplitSession::with_target(backend.clone(), &story, 3);
        (backend, session)
    }

    #[tokio::test]
    async fn default_target_keeps_short_story_in_one_part() {
        let backend = Arc::new(InMemoryBackend::seeded().await);
        let story = backend.get_story(2).await.unwrap();
        let session = SplitSession::new(backend, &story);
        assert_eq!(session.parts().len(), 1);
        assert_eq!(session.parts()[0].len(), 3);
        let estimate = session.estimates()[0];
        assert_eq!(estimate.words, 14);
        assert_eq!(estimate.seconds, 5);
        assert!(!estimate.in_band);
    }

    #[tokio::test]
    async fn keyboard_and_drag_move_sentences() {
        let (_backend, mut session) = three_part_session().await;
        assert_eq!(session.parts().len(), 3);

        assert!(session.on_key(0, "ArrowRight"));
        assert!(session.parts()[0].is_empty());
        assert_eq!(session.parts()[1].len(), 2);
        assert!(!session.on_key(0, "ArrowRight"));
        assert!(!session.on_key(0, "Tab"));

        assert_eq!(session.drag(2, 1), 1);
        assert_eq!(
            session.parts().iter().map(Vec::len).collect::<Vec<_>>(),
            vec![0, 3, 0]
        );
        assert_eq!(session.part_texts().len(), 1);
    }

    #[tokio::test]
    async fn save_submits_finalized_parts() {
        let (backend, mut session) = three_part_session().await;
        session.move_sentence(0, MoveDirection::Right);
        let saved = session.save().await.unwrap();

        assert_eq!(saved.len(), 2);
        assert_eq!(
            saved[0].body_md,
            "This is the first sentence. Here is the second one."
        );
        assert_eq!(session.status(), StoryStatus::Split);
        assert_eq!(backend.parts(2).await, saved);
        assert_eq!(backend.get_story(2).await.unwrap().status, StoryStatus::Split);
    }

    #[tokio::test]
    async fn failed_save_rolls_back_status() {
        let (backend, session) = three_part_session().await;
        backend.fail_next(503).await;
        let err = session.save().await.unwrap_err();
        assert_matches!(
            err,
            EditorError::ActionFailed {
                action: "save-split",
                source: ClientError::Api { status: 503, .. }
            }
        );
        assert_eq!(session.status(), StoryStatus::Pending);
        assert!(backend.parts(2).await.is_empty());
    }

    #[tokio::test]
    async fn empty_story_cannot_be_saved() {
        let backend = Arc::new(InMemoryBackend::with_sequential_ids());
        let story = backend.insert_story("Empty", None, StoryStatus::Draft).await;
        let session = SplitSession::new(backend, &story);
        assert!(session.parts().is_empty());
        let err = session.save().await.unwrap_err();
        assert_matches!(err, EditorError::Precondition { action: "save-split", .. });
        assert_eq!(session.status(), StoryStatus::Draft);
    }

    #[tokio::test]
    async fn resplit_discards_manual_moves() {
        let (_backend, mut session) = three_part_session().await;
        session.move_sentence(1, MoveDirection::Left);
        session.resplit(60);
        assert_eq!(session.target_seconds(), 60);
        assert_eq!(session.parts().len(), 1);
    }
}
