//! Remote collaborators of the story pipeline.
//!
//! [`api`] defines the backend surface as async traits, [`http`] implements
//! it over REST with [`reqwest`], and (behind the `fake` feature) [`fake`]
//! implements it in memory for tests and offline development.

pub mod api;
pub mod config;
pub mod error;
#[cfg(any(test, feature = "fake"))]
pub mod fake;
pub mod http;

pub use api::{AssetApi, Backend, CatalogApi, JobApi, SplitApi, StoryApi};
pub use error::ClientError;
pub use http::HttpBackend;
