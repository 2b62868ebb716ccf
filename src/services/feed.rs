// src/services/feed.rs

//! Calendar feed sources.
//!
//! Retrieves the raw body of a room's feed. The resolver depends on the
//! [`FeedSource`] trait so fetches can be swapped out in tests.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::Semaphore;

use crate::error::{AppError, Result};
use crate::models::HttpConfig;
use crate::utils::http::create_async_client;
use crate::utils::url::normalize_feed_url;

/// Something that can retrieve a calendar feed body by URL.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the full feed body at `url`.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Feed source backed by an HTTP client.
///
/// Concurrent fetches across all callers are bounded by
/// `HttpConfig::max_concurrent`.
#[derive(Clone)]
pub struct HttpFeedSource {
    client: Client,
    permits: Arc<Semaphore>,
}

impl HttpFeedSource {
    /// Create a feed source with a client built from `config`.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = create_async_client(config)?;
        Ok(Self::with_client(client, config.max_concurrent))
    }

    /// Create a feed source around an existing client.
    pub fn with_client(client: Client, max_concurrent: usize) -> Self {
        Self {
            client,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<String> {
        let target = normalize_feed_url(url)?;
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| AppError::fetch(url, e))?;

        let response = self.client.get(target).send().await?.error_for_status()?;
        let body = response.text().await?;
        log::debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
