//! Salon-Harvest: a resumable directory crawler
//!
//! This crate crawls the paginated salon search of a directory site, enriches
//! each listing with its detail and contact pages, and exports the merged
//! records as CSV. Large jobs can be split into bounded chunks whose progress
//! lives in a caller-held checkpoint.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod record;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Salon-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("keyword is required")]
    MissingKeyword,

    #[error("Page limit must be between 1 and {max}, got {requested}")]
    InvalidPageLimit { requested: u32, max: u32 },

    #[error("Listing limit must be at least 1")]
    InvalidListingLimit,

    #[error("Chunk cursor {cursor} is past the end of {len} listings")]
    InvalidChunk { cursor: usize, len: usize },

    #[error("Invalid job transition: {from} -> {to}")]
    InvalidTransition {
        from: state::JobPhase,
        to: state::JobPhase,
    },

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Faults raised while walking a parsed document
///
/// A missing element is never an error; these only cover the extraction
/// machinery itself failing.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

/// Result type alias for Salon-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for extraction operations
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CollectTarget, Coordinator};
pub use record::{DetailFields, FullRecord, ListingRecord};
pub use state::{JobCheckpoint, JobPhase};
