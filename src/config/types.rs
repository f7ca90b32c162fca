use serde::Deserialize;

/// Main configuration structure for Salon-Harvest
///
/// Every section and key is optional; omitted values fall back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// Target site locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Absolute origin that canonical salon URLs are anchored to
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the salon search results page
    #[serde(rename = "search-path")]
    pub search_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://beauty.hotpepper.jp".to_string(),
            search_path: "/CSP/bt/salonSearch/search/".to_string(),
        }
    }
}

/// Fetch scheduling configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of workers in the continuous pool
    pub workers: usize,

    /// Delay between two items handled by the same worker (milliseconds)
    #[serde(rename = "item-delay-ms")]
    pub item_delay_ms: u64,

    /// Number of search result pages fetched per wave
    #[serde(rename = "page-concurrency")]
    pub page_concurrency: usize,

    /// Delay between waves of search result pages (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// Number of listings processed per resumable invocation
    #[serde(rename = "chunk-size")]
    pub chunk_size: usize,

    /// Number of listings enriched concurrently inside a chunk
    #[serde(rename = "chunk-workers")]
    pub chunk_workers: usize,

    /// Delay between sub-batches of a chunk (milliseconds)
    #[serde(rename = "chunk-delay-ms")]
    pub chunk_delay_ms: u64,

    /// Whole-request timeout for a single fetch (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Page limit used when the caller does not give one
    #[serde(rename = "default-page-limit")]
    pub default_page_limit: u32,

    /// Largest page limit a caller may request
    #[serde(rename = "max-page-limit")]
    pub max_page_limit: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            item_delay_ms: 200,
            page_concurrency: 10,
            page_delay_ms: 300,
            chunk_size: 15,
            chunk_workers: 3,
            chunk_delay_ms: 500,
            request_timeout_secs: 30,
            default_page_limit: 5,
            max_page_limit: 10,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SalonHarvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/salon-harvest/salon-harvest".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}
