//! Image board: a story's candidate images, selectable and orderable.
//!
//! Toggles and reorders are applied to the whole list optimistically; if
//! any patch fails the list goes back to the snapshot taken before the
//! change. A failed reorder then reloads the list, since some of its rank
//! patches may already have been stored.

use std::sync::Arc;

use futures::future::try_join_all;
use storyreel_client::AssetApi;
use storyreel_core::media::{move_asset, rank_patches, selected_count, Asset, AssetPatch};
use storyreel_core::types::DbId;
use tokio::sync::watch;

use crate::busy::BusyFlag;
use crate::error::EditorError;
use crate::optimistic::OptimisticValue;

pub struct ImageBoard<A: ?Sized> {
    api: Arc<A>,
    story_id: DbId,
    assets: OptimisticValue<Vec<Asset>>,
    busy: BusyFlag,
}

impl<A: AssetApi + ?Sized> ImageBoard<A> {
    /// An empty board; call [`ImageBoard::load`] to populate it.
    pub fn new(api: Arc<A>, story_id: DbId) -> Self {
        Self {
            api,
            story_id,
            assets: OptimisticValue::new(Vec::new()),
            busy: BusyFlag::default(),
        }
    }

    pub fn assets(&self) -> Vec<Asset> {
        self.assets.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Asset>> {
        self.assets.subscribe()
    }

    pub fn selected_count(&self) -> usize {
        selected_count(&self.assets.get())
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Replace the board with the backend's list.
    pub async fn load(&self) -> Result<usize, EditorError> {
        let assets = self
            .api
            .list_images(self.story_id)
            .await
            .map_err(EditorError::failed("load-images"))?;
        let count = assets.len();
        self.assets.set(assets);
        Ok(count)
    }

    /// Flip the `selected` flag of one image.
    pub async fn toggle_selected(&self, image_id: DbId) -> Result<Asset, EditorError> {
        const ACTION: &str = "toggle-image";
        let current = self
            .assets
            .get()
            .into_iter()
            .find(|a| a.id == image_id)
            .ok_or_else(|| {
                EditorError::precondition(ACTION, format!("image {image_id} is not on this board"))
            })?;

        let _busy = self.busy.enter();
        let patch = AssetPatch {
            selected: Some(!current.selected),
            rank: None,
        };
        let api = self.api.as_ref();
        let story_id = self.story_id;
        let patch = &patch;

        let updated = self
            .assets
            .mutate(
                |assets| {
                    if let Some(asset) = assets.iter_mut().find(|a| a.id == image_id) {
                        patch.apply(asset);
                    }
                },
                move |_| api.patch_image(story_id, image_id, patch),
            )
            .await
            .map_err(EditorError::failed(ACTION))?;

        tracing::info!(story_id, image_id, selected = updated.selected, "Image toggled");
        Ok(updated)
    }

    /// Move the image at `from` to `to` and persist every rank.
    pub async fn reorder(&self, from: usize, to: usize) -> Result<(), EditorError> {
        const ACTION: &str = "reorder-images";
        let len = self.assets.get().len();
        if from >= len || to >= len {
            return Err(EditorError::precondition(
                ACTION,
                format!("position out of range ({from} -> {to}, {len} images)"),
            ));
        }
        if from == to {
            return Ok(());
        }

        let _busy = self.busy.enter();
        let api = self.api.as_ref();
        let story_id = self.story_id;

        let result = self
            .assets
            .mutate(
                |assets| {
                    move_asset(assets, from, to);
                    for (position, asset) in assets.iter_mut().enumerate() {
                        asset.rank = Some(position as i32);
                    }
                },
                move |assets| async move {
                    let patches = rank_patches(&assets);
                    try_join_all(
                        patches
                            .iter()
                            .map(|(image_id, patch)| api.patch_image(story_id, *image_id, patch)),
                    )
                    .await
                    .map(|_| ())
                },
            )
            .await;

        if let Err(err) = result {
            // Some rank patches may have landed before the failure.
            if let Err(reload) = self.load().await {
                tracing::warn!(
                    story_id,
                    error = %reload,
                    "Could not reload images after failed reorder"
                );
            }
            return Err(EditorError::failed(ACTION)(err));
        }

        tracing::info!(story_id, from, to, "Images reordered");
        Ok(())
    }

    /// Ask the backend to fetch candidate images, then reload.
    pub async fn auto_fetch(&self) -> Result<usize, EditorError> {
        let _busy = self.busy.enter();
        self.api
            .fetch_images(self.story_id)
            .await
            .map_err(EditorError::failed("fetch-images"))?;
        self.load().await
    }
}
