//! HTTP client for the page content service.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::ports::{ContentError, ContentFetcher, PageContent};

/// Configuration for the content client.
#[derive(Debug, Clone)]
pub struct ContentClientConfig {
    /// Service endpoint URL.
    pub url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ContentClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_millis(2_000),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// reqwest-backed implementation of the [`ContentFetcher`] port.
pub struct HttpContentFetcher {
    config: ContentClientConfig,
    client: Client,
}

impl HttpContentFetcher {
    pub fn new(config: ContentClientConfig) -> Result<Self, ContentError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ContentError::Transport(e.to_string()))?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl ContentFetcher for HttpContentFetcher {
    async fn fetch(&self, page_title: &str) -> Result<PageContent, ContentError> {
        let response = self
            .client
            .post(&self.config.url)
            .json(&json!({ "page_title": page_title }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ContentError::Timeout
                } else {
                    ContentError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(ContentError::NotFound(page_title.to_string()));
        }
        if !status.is_success() {
            return Err(ContentError::Transport(format!("status {}", status)));
        }

        let content: PageContent = response
            .json()
            .await
            .map_err(|e| ContentError::Malformed(e.to_string()))?;
        debug!(
            page_title,
            sections = content.sections.len(),
            "page content fetched"
        );
        Ok(content)
    }
}
