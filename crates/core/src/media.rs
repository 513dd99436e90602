//! Media assignment: catalog images per part and the story image board.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// An image offered by the media catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nsfw: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
}

impl CatalogImage {
    /// An image entered by URL, with optional attribution. A blank
    /// attribution is treated as none.
    pub fn from_url(url: impl Into<String>, attribution: Option<&str>) -> Self {
        Self {
            url: url.into(),
            nsfw: None,
            attribution: attribution
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string),
        }
    }

    pub fn is_nsfw(&self) -> bool {
        self.nsfw.unwrap_or(false)
    }
}

/// One optional image per part.
pub type ImageSlots = Vec<Option<CatalogImage>>;

/// Copy of `slots` with `image` assigned at `index`. Out-of-range indexes
/// leave the slots unchanged.
pub fn select_image(slots: &[Option<CatalogImage>], index: usize, image: CatalogImage) -> ImageSlots {
    let mut next = slots.to_vec();
    if let Some(slot) = next.get_mut(index) {
        *slot = Some(image);
    }
    next
}

/// Copy the first slot's value, assigned or not, into every slot.
pub fn bulk_apply(slots: &[Option<CatalogImage>]) -> ImageSlots {
    let first = slots.first().cloned().flatten();
    vec![first; slots.len()]
}

/// True when there is at least one slot and every slot holds an image.
pub fn all_assigned(slots: &[Option<CatalogImage>]) -> bool {
    !slots.is_empty() && slots.iter().all(Option::is_some)
}

/* --------------------------------------------------------------------------
Image board
-------------------------------------------------------------------------- */

/// An image asset attached to a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: DbId,
    pub remote_url: String,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub rank: Option<i32>,
}

/// Partial update of an asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<i32>,
}

impl AssetPatch {
    /// Reject empty patches and negative ranks.
    pub fn check(&self) -> Result<(), CoreError> {
        if self.selected.is_none() && self.rank.is_none() {
            return Err(CoreError::Validation(
                "Patch must set at least one of: selected, rank".to_string(),
            ));
        }
        if let Some(rank) = self.rank.filter(|r| *r < 0) {
            return Err(CoreError::Validation(format!(
                "rank must be non-negative, got {rank}"
            )));
        }
        Ok(())
    }

    pub fn apply(&self, asset: &mut Asset) {
        if let Some(selected) = self.selected {
            asset.selected = selected;
        }
        if let Some(rank) = self.rank {
            asset.rank = Some(rank);
        }
    }
}

/// Move the asset at `from` to position `to`, shifting the rest. Returns
/// `false` when either index is out of range.
pub fn move_asset(assets: &mut Vec<Asset>, from: usize, to: usize) -> bool {
    if from >= assets.len() || to >= assets.len() {
        return false;
    }
    let moved = assets.remove(from);
    assets.insert(to, moved);
    true
}

/// Rank patches matching the current order: position `i` gets rank `i`.
pub fn rank_patches(assets: &[Asset]) -> Vec<(DbId, AssetPatch)> {
    assets
        .iter()
        .enumerate()
        .map(|(position, asset)| {
            (
                asset.id,
                AssetPatch {
                    rank: Some(position as i32),
                    ..AssetPatch::default()
                },
            )
        })
        .collect()
}

/// Number of selected assets.
pub fn selected_count(assets: &[Asset]) -> usize {
    assets.iter().filter(|a| a.selected).count()
}
