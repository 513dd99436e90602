//! Review step: approve, reject or send a story back to pending.

use std::sync::Arc;

use storyreel_client::StoryApi;
use storyreel_core::story::{Story, StoryAction, StoryStatus, StoryUpdate};
use storyreel_core::types::DbId;
use tokio::sync::watch;

use crate::busy::BusyFlag;
use crate::error::EditorError;
use crate::input::{review_key, Navigation, ReviewCommand};
use crate::optimistic::OptimisticValue;

/// Review state of one story.
pub struct ReviewSession<A: ?Sized> {
    api: Arc<A>,
    story_id: DbId,
    status: OptimisticValue<StoryStatus>,
    notes: String,
    busy: BusyFlag,
}

impl<A: StoryApi + ?Sized> ReviewSession<A> {
    pub fn new(api: Arc<A>, story: &Story) -> Self {
        Self {
            api,
            story_id: story.id,
            status: OptimisticValue::new(story.status),
            notes: String::new(),
            busy: BusyFlag::default(),
        }
    }

    /// Fetch the story and open a session on it.
    pub async fn load(api: Arc<A>, story_id: DbId) -> Result<Self, EditorError> {
        let story = api
            .get_story(story_id)
            .await
            .map_err(EditorError::failed("load-story"))?;
        Ok(Self::new(api, &story))
    }

    pub fn story_id(&self) -> DbId {
        self.story_id
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

    /// Draft notes sent with the next keyboard action.
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub async fn approve(&self, notes: Option<&str>) -> Result<Story, EditorError> {
        self.apply(StoryAction::Approve, notes.map(str::to_string)).await
    }

    pub async fn reject(&self, notes: Option<&str>) -> Result<Story, EditorError> {
        self.apply(StoryAction::Reject, notes.map(str::to_string)).await
    }

    pub async fn reset_to_pending(&self) -> Result<Story, EditorError> {
        self.apply(StoryAction::ResetToPending, None).await
    }

    /// Run a review action optimistically.
    ///
    /// Blank notes are not sent. On success the status reported by the
    /// backend replaces the speculative one.
    pub async fn apply(
        &self,
        action: StoryAction,
        notes: Option<String>,
    ) -> Result<Story, EditorError> {
        if matches!(action, StoryAction::SaveSplit | StoryAction::SaveMedia) {
            return Err(EditorError::precondition(action.name(), "not a review action"));
        }

        let _busy = self.busy.enter();
        let notes = notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let update = StoryUpdate::status(action.target_status(), notes);
        let api = self.api.as_ref();
        let update = &update;
        let story_id = self.story_id;

        let story = self
            .status
            .transition(action.target_status(), move || api.update_story(story_id, update))
            .await
            .map_err(EditorError::failed(action.name()))?;

        self.status.set(story.status);
        tracing::info!(story_id, action = action.name(), status = %story.status, "Story reviewed");
        Ok(story)
    }

    /// Re-read the story and take the backend's status as authoritative.
    pub async fn refresh(&self) -> Result<StoryStatus, EditorError> {
        let story = self
            .api
            .get_story(self.story_id)
            .await
            .map_err(EditorError::failed("refresh"))?;
        self.status.set(story.status);
        Ok(story.status)
    }

    /// Handle a review shortcut. Actions carry the draft notes; navigation
    /// is returned to the caller untouched.
    pub async fn on_key(&self, key: &str) -> Result<Option<Navigation>, EditorError> {
        match review_key(key) {
            Some(ReviewCommand::Act(action)) => {
                self.apply(action, Some(self.notes.clone())).await?;
                Ok(None)
            }
            Some(ReviewCommand::Navigate(to)) => Ok(Some(to)),
            None => Ok(None),
        }
    }
}
