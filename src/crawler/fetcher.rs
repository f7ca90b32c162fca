//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester:
//! - Building the HTTP client with the configured user agent and timeout
//! - Single GET requests returning status and body
//! - Degrading any transport failure to an empty document
//!
//! The fetcher never retries. Resilience policy belongs to its callers.

use crate::config::Config;
use crate::HarvestError;
use reqwest::Client;
use std::time::Duration;

/// A fetched document
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status code
    pub status: u16,

    /// Response body decoded as text
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use salon_harvest::config::Config;
/// use salon_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, HarvestError> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_secs(config.crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(HarvestError::ClientBuild)
}

/// Performs a single GET request
///
/// Any HTTP status is returned as-is; only transport failures (connection,
/// timeout, body decoding) become errors.
pub async fn fetch_page(client: &Client, url: &str) -> Result<FetchedPage, HarvestError> {
    let to_error = |source: reqwest::Error| HarvestError::Http {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().await.map_err(to_error)?;
    let status = response.status();
    let body = response.text().await.map_err(to_error)?;

    if !status.is_success() {
        tracing::debug!("GET {} returned {}", url, status);
    }

    Ok(FetchedPage {
        status: status.as_u16(),
        body,
    })
}

/// Fetches a document's text, degrading every transport failure to `""`
///
/// Callers treat an empty document as "extraction will find nothing"; it is
/// not distinguishable from a genuinely empty response.
pub async fn fetch_text(client: &Client, url: &str) -> String {
    match fetch_page(client, url).await {
        Ok(page) => page.body,
        Err(e) => {
            tracing::warn!("Fetch failed, continuing with empty document: {}", e);
            String::new()
        }
    }
}
