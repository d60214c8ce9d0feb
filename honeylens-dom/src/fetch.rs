//! Single-document HTTP loading
//!
//! Fetches exactly one page for inspection. There is no link following.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::Page;

/// HTTP loading configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User agent presented to the site
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36".to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Errors from loading a document
#[derive(Debug, Error)]
pub enum DomError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned status {0}")]
    Status(u16),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the HTTP client used for page loads
pub fn create_client(config: &FetchConfig) -> Result<Client, DomError> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| DomError::ClientBuild(e.to_string()))
}

/// Fetch one page; the resulting page carries the post-redirect URL
pub async fn fetch_page(url: &str, config: &FetchConfig) -> Result<Page, DomError> {
    let parsed = Url::parse(url).map_err(|e| DomError::InvalidUrl(format!("{}: {}", url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(DomError::InvalidUrl(format!("unsupported scheme: {}", parsed.scheme())));
    }

    let client = create_client(config)?;

    debug!("Fetching: {}", parsed);

    let response = client.get(parsed).send().await?;

    if !response.status().is_success() {
        warn!("Fetch of {} returned status: {}", url, response.status());
        return Err(DomError::Status(response.status().as_u16()));
    }

    let final_url = response.url().clone();
    let html = response.text().await?;

    debug!("Fetched {} bytes from {}", html.len(), final_url);
    Ok(Page::parse(html, final_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.contains("Mozilla"));
    }

    #[tokio::test]
    async fn test_rejects_non_http_targets() {
        let err = fetch_page("ftp://files.example/page.html", &FetchConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomError::InvalidUrl(_)));

        let err = fetch_page("not a url", &FetchConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomError::InvalidUrl(_)));
    }
}
