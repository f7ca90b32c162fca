//! Crawler module for collecting and enriching salon listings
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching that degrades failures to empty documents
//! - Pagination discovery and listing collection
//! - Detail and contact page enrichment
//! - Batch scheduling and pacing
//! - Overall job coordination

mod collector;
mod coordinator;
mod enricher;
mod fetcher;
mod scheduler;

pub use collector::{effective_pages, CollectTarget, SearchSummary, PREVIEW_LEN};
pub use coordinator::Coordinator;
pub use enricher::enrich;
pub use fetcher::{build_http_client, fetch_page, fetch_text, FetchedPage};
pub use scheduler::{
    chunk_bounds, run_in_waves, run_in_workers, run_sequential, ChunkOutcome, Scheduler,
};

use crate::config::Config;
use crate::record::FullRecord;
use crate::HarvestError;

/// Runs a complete continuous job
///
/// This is the main entry point for a one-shot harvest. It will:
/// 1. Build the HTTP client
/// 2. Collect listings from up to `page_limit` result pages
/// 3. Enrich every listing with the worker pool
///
/// # Arguments
///
/// * `config` - The harvester configuration
/// * `keyword` - Free-text search keyword
/// * `page_limit` - Maximum number of result pages to visit
///
/// # Returns
///
/// * `Ok(records)` - Enriched records, grouped by worker
/// * `Err(HarvestError)` - The job could not start
pub async fn harvest(
    config: Config,
    keyword: &str,
    page_limit: u32,
) -> Result<Vec<FullRecord>, HarvestError> {
    let coordinator = Coordinator::new(config)?;
    let listings = coordinator.collect(keyword, page_limit).await?;
    Ok(coordinator.run_continuous(listings).await)
}
