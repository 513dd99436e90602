//! Editor sessions for the story pipeline.
//!
//! Each session owns the in-memory state of one editing step (review,
//! split, media, image board, queue) and pushes status changes to the
//! backend through [`optimistic`] transitions: the new value is visible
//! immediately and restored to the previous one if the backend refuses.

pub mod busy;
pub mod error;
pub mod images;
pub mod input;
pub mod media;
pub mod optimistic;
pub mod queue;
pub mod review;
pub mod split;

pub use busy::BusyFlag;
pub use error::EditorError;
pub use optimistic::{optimistic_update, OptimisticValue};
