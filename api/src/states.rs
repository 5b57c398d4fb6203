use chrono::Utc;
use std::sync::Arc;

use crate::{
    config::Config,
    errors::ServiceError,
    store::{CacheKey, Store},
    upstream::UpstreamClient,
};

/// Shared by every request. Built once at startup and cloned into
/// handlers; the clones share one `Store`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<Store>,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let upstream = UpstreamClient::new(config.upstream_base_url.clone());

        Self {
            config: Arc::new(config),
            store: Arc::new(Store::new()),
            upstream,
        }
    }

    pub fn demo_mode(&self) -> bool {
        self.config.demo_mode
    }

    /// Demo data never goes stale.
    pub fn is_stale(&self, key: CacheKey) -> bool {
        !self.demo_mode() && self.store.is_stale(key, Utc::now())
    }

    pub async fn bearer_token(&self) -> Result<String, ServiceError> {
        self.store
            .auth_token()
            .await
            .map(|token| token.access_token().to_string())
            .ok_or(ServiceError::NotAuthenticated)
    }
}
