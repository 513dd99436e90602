//! Story lifecycle: statuses, named actions and the request shapes that
//! carry them.
//!
//! The backend is the authority on which transitions are legal. There is no
//! transition table here: a [`StoryAction`] only names the
//! status it asks for, and the editor applies it optimistically.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Maximum length for review notes attached to a status change.
pub const MAX_NOTES_LENGTH: usize = 10_000;

/// `u64` form of [`MAX_NOTES_LENGTH`] for the `validator` length attribute.
const MAX_NOTES_LENGTH_U64: u64 = MAX_NOTES_LENGTH as u64;

/* --------------------------------------------------------------------------
Status
-------------------------------------------------------------------------- */

/// Stage of a story in the review/production workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
    Split,
    MediaSelected,
    Queued,
    Rendered,
    Uploaded,
}

impl StoryStatus {
    /// Every status, in workflow order.
    pub const ALL: [StoryStatus; 9] = [
        Self::Draft,
        Self::Pending,
        Self::Approved,
        Self::Rejected,
        Self::Split,
        Self::MediaSelected,
        Self::Queued,
        Self::Rendered,
        Self::Uploaded,
    ];

    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Split => "split",
            Self::MediaSelected => "media_selected",
            Self::Queued => "queued",
            Self::Rendered => "rendered",
            Self::Uploaded => "uploaded",
        }
    }
}

impl fmt::Display for StoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoryStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid story status '{s}'. Must be one of: {}",
                    Self::ALL.map(StoryStatus::as_str).join(", ")
                ))
            })
    }
}

/* --------------------------------------------------------------------------
Actions
-------------------------------------------------------------------------- */

/// A named, status-changing editor action.
///
/// Enqueueing is not an action: it creates jobs and leaves
/// the story status to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryAction {
    Approve,
    Reject,
    ResetToPending,
    SaveSplit,
    SaveMedia,
}

impl StoryAction {
    /// Status the action asks the backend for.
    pub fn target_status(self) -> StoryStatus {
        match self {
            Self::Approve => StoryStatus::Approved,
            Self::Reject => StoryStatus::Rejected,
            Self::ResetToPending => StoryStatus::Pending,
            Self::SaveSplit => StoryStatus::Split,
            Self::SaveMedia => StoryStatus::MediaSelected,
        }
    }

    /// Short name used in logs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::ResetToPending => "reset-to-pending",
            Self::SaveSplit => "save-split",
            Self::SaveMedia => "save-media",
        }
    }
}

/* --------------------------------------------------------------------------
Entities and payloads
-------------------------------------------------------------------------- */

/// A story as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: DbId,
    pub title: String,
    #[serde(default)]
    pub body_md: Option<String>,
    pub status: StoryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl Story {
    /// Body text used as segmentation input; absent bodies read as empty.
    pub fn body(&self) -> &str {
        self.body_md.as_deref().unwrap_or_default()
    }
}

/// Partial update of a story. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct StoryUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StoryStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_NOTES_LENGTH_U64))]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_md: Option<String>,
}

impl StoryUpdate {
    /// A status change with optional review notes.
    pub fn status(status: StoryStatus, notes: Option<String>) -> Self {
        Self {
            status: Some(status),
            notes,
            ..Self::default()
        }
    }
}

/// Body of a split submission: finalized part texts in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SplitRequest {
    #[validate(length(min = 1, max = 500))]
    pub parts: Vec<String>,
}

impl SplitRequest {
    /// Validate lengths and reject blank parts.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()?;
        if let Some(index) = self.parts.iter().position(|p| p.trim().is_empty()) {
            return Err(CoreError::Validation(format!("Part {index} is empty")));
        }
        Ok(())
    }
}

/// One persisted part of a split story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryPart {
    pub index: usize,
    pub body_md: String,
    pub est_seconds: u32,
}

/// Query filter for listing stories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryListQuery {
    pub status: Option<StoryStatus>,
}
