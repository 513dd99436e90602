//! Pure domain logic for the story pipeline.
//!
//! Everything in this crate is synchronous and total over its inputs:
//! segmentation, splitting, rebalancing, duration estimation and job
//! status mapping never fail. Remote collaborators live in
//! `storyreel-client`; sessions that drive them live in `storyreel-editor`.

pub mod error;
pub mod job;
pub mod media;
pub mod rebalance;
pub mod split;
pub mod story;
pub mod types;
