//! REST implementation of the backend traits.
//!
//! Every path is appended to the configured base URL. When an admin token
//! is configured it is sent as `Authorization: Bearer <token>`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use storyreel_core::job::{EnqueueRequest, EnqueueResponse, Job};
use storyreel_core::media::{Asset, AssetPatch, CatalogImage};
use storyreel_core::story::{SplitRequest, Story, StoryPart, StoryStatus, StoryUpdate};
use storyreel_core::types::DbId;

use crate::api::{AssetApi, CatalogApi, JobApi, SplitApi, StoryApi};
use crate::config::ClientConfig;
use crate::error::ClientError;

/// HTTP client for the story backend.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    admin_token: Option<String>,
}

impl HttpBackend {
    /// Create a client with default `reqwest` settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            admin_token: None,
        }
    }

    /// Build a client from configuration, applying the request timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let backend = Self::with_client(client, config.base_url.clone());
        Ok(match &config.admin_token {
            Some(token) => backend.with_admin_token(token.clone()),
            None => backend,
        })
    }

    /// Send `Authorization: Bearer <token>` on every request.
    pub fn with_admin_token(mut self, token: impl Into<String>) -> Self {
        self.admin_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.admin_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Ensure the response has a success status code. On failure the
    /// status and body text are captured in [`ClientError::Api`].
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::debug!(status = status.as_u16(), %body, "Backend rejected request");
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl StoryApi for HttpBackend {
    async fn list_stories(&self, status: Option<StoryStatus>) -> Result<Vec<Story>, ClientError> {
        let mut request = self.request(Method::GET, "/admin/stories");
        if let Some(status) = status {
            request = request.query(&[("status", status.as_str())]);
        }
        Self::parse_response(request.send().await?).await
    }

    async fn get_story(&self, id: DbId) -> Result<Story, ClientError> {
        let response = self
            .request(Method::GET, &format!("/admin/stories/{id}"))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn update_story(&self, id: DbId, update: &StoryUpdate) -> Result<Story, ClientError> {
        let response = self
            .request(Method::PATCH, &format!("/admin/stories/{id}"))
            .json(update)
            .send()
            .await?;
        Self::parse_response(response).await
    }
}

#[async_trait]
impl SplitApi for HttpBackend {
    async fn submit_split(&self, id: DbId, parts: &[String]) -> Result<Vec<StoryPart>, ClientError> {
        let body = SplitRequest {
            parts: parts.to_vec(),
        };
        let response = self
            .request(Method::POST, &format!("/admin/stories/{id}/split"))
            .json(&body)
            .send()
            .await?;
        Self::parse_response(response).await
    }
}

#[async_trait]
impl JobApi for HttpBackend {
    async fn enqueue(
        &self,
        story_id: DbId,
        request: &EnqueueRequest,
    ) -> Result<Vec<Job>, ClientError> {
        let response = self
            .request(Method::POST, &format!("/admin/stories/{story_id}/enqueue"))
            .json(request)
            .send()
            .await?;
        let body: EnqueueResponse = Self::parse_response(response).await?;
        Ok(body.jobs)
    }

    async fn list_jobs(&self, story_id: Option<DbId>) -> Result<Vec<Job>, ClientError> {
        let mut request = self.request(Method::GET, "/admin/jobs");
        if let Some(story_id) = story_id {
            request = request.query(&[("story_id", story_id)]);
        }
        Self::parse_response(request.send().await?).await
    }
}

#[async_trait]
impl CatalogApi for HttpBackend {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogImage>, ClientError> {
        let response = self.request(Method::GET, "/catalog").send().await?;
        Self::parse_response(response).await
    }
}

#[async_trait]
impl AssetApi for HttpBackend {
    async fn list_images(&self, story_id: DbId) -> Result<Vec<Asset>, ClientError> {
        let response = self
            .request(Method::GET, &format!("/stories/{story_id}/images"))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn patch_image(
        &self,
        story_id: DbId,
        image_id: DbId,
        patch: &AssetPatch,
    ) -> Result<Asset, ClientError> {
        let response = self
            .request(
                Method::PATCH,
                &format!("/stories/{story_id}/images/{image_id}"),
            )
            .json(patch)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn fetch_images(&self, story_id: DbId) -> Result<Vec<Asset>, ClientError> {
        let response = self
            .request(Method::POST, &format!("/stories/{story_id}/fetch-images"))
            .send()
            .await?;
        Self::parse_response(response).await
    }
}
