use std::sync::Arc;

use storyreel_client::fake::InMemoryBackend;
use storyreel_client::{Backend, ClientError, HttpBackend};

use crate::config::ServerConfig;

/// Where requests are served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamMode {
    /// Seeded in-process backend.
    InMemory,
    /// Forwarded to `API_BASE_URL`.
    Proxy,
}

impl UpstreamMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InMemory => "in_memory",
            Self::Proxy => "proxy",
        }
    }
}

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Copy`).
#[derive(Clone)]
pub struct AppState {
    /// Backend every route forwards to.
    pub backend: Arc<dyn Backend>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    pub mode: UpstreamMode,
}

impl AppState {
    pub fn new(backend: Arc<dyn Backend>, config: ServerConfig, mode: UpstreamMode) -> Self {
        Self {
            backend,
            config: Arc::new(config),
            mode,
        }
    }

    /// Build the backend described by `config`.
    pub async fn from_config(config: ServerConfig) -> Result<Self, ClientError> {
        let (backend, mode) = match &config.upstream {
            Some(upstream) => {
                let backend: Arc<dyn Backend> = Arc::new(HttpBackend::from_config(upstream)?);
                tracing::info!(base_url = %upstream.base_url, "Proxying to story backend");
                (backend, UpstreamMode::Proxy)
            }
            None => {
                let backend: Arc<dyn Backend> = Arc::new(InMemoryBackend::seeded().await);
                tracing::info!("Serving seeded in-memory backend");
                (backend, UpstreamMode::InMemory)
            }
        };

        Ok(Self::new(backend, config, mode))
    }
}
