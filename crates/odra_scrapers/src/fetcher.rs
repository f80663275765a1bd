use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use odra_core::{Error, Result};
use tracing::{debug, instrument};

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the body of `url`, failing on transport errors and non-success statuses
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetches pages over HTTP with the client's default settings.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch(url, format!("status {}", status)));
        }

        let body = response.text().await.map_err(|e| Error::fetch(url, e))?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

/// Serves pages from memory. Unknown URLs fail like a 404 would.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    /// URLs requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| Error::fetch(url, "status 404 Not Found"))
    }
}
