//! Page collector: pagination discovery and listing collection
//!
//! The first results page is fetched once and reused: it yields both the
//! total page count and page 1's listings. The remaining pages are fetched in
//! order-preserving waves and their listings concatenated in page order.
//!
//! A job is sized either by a page limit or by a listing count. A listing
//! count is turned into a page count using the number of listings on page 1,
//! and the collected list is cut to that count.
//!
//! Deduplication is per page only. A salon the site repeats on two pages is
//! collected twice.

use crate::config::Config;
use crate::crawler::fetcher::fetch_text;
use crate::crawler::scheduler::Scheduler;
use crate::extract::{parse_listing_page, parse_total_count, parse_total_pages};
use crate::record::ListingRecord;
use crate::url::search_page_url;
use crate::HarvestError;
use reqwest::Client;
use serde::Serialize;

/// Number of listings included in a search preview
pub const PREVIEW_LEN: usize = 5;

/// Single-page summary used to size a job before crawling it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSummary {
    pub keyword: String,

    /// Result pages the site reports for the keyword
    pub total_pages: u32,

    /// Salons the site reports for the keyword
    pub total_count: u64,

    /// Listings found on the first page
    pub per_page_count: usize,

    /// First few listings of the first page
    pub preview: Vec<ListingRecord>,
}

/// Number of pages a job will actually visit
pub fn effective_pages(total_available: u32, page_limit: u32) -> u32 {
    total_available.min(page_limit)
}

/// How much of the search results a job collects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectTarget {
    /// Visit at most this many result pages
    Pages(u32),

    /// Collect at most this many listings, from as many pages as needed
    Listings(usize),
}

impl CollectTarget {
    /// Number of pages to visit given the site's page count and the number of
    /// listings found on page 1
    ///
    /// A listing target on an empty first page visits page 1 only.
    pub fn pages_to_visit(&self, total_available: u32, first_page_count: usize) -> u32 {
        match *self {
            Self::Pages(limit) => effective_pages(total_available, limit),
            Self::Listings(_) if first_page_count == 0 => 1,
            Self::Listings(max) => {
                let needed = u32::try_from(max.div_ceil(first_page_count)).unwrap_or(u32::MAX);
                effective_pages(total_available, needed.max(1))
            }
        }
    }

    /// Upper bound on the number of listings kept, if any
    pub fn listing_limit(&self) -> Option<usize> {
        match *self {
            Self::Pages(_) => None,
            Self::Listings(max) => Some(max),
        }
    }
}

/// Fetches one search results page as text
async fn fetch_search_page(
    client: &Client,
    config: &Config,
    keyword: &str,
    page: u32,
) -> Result<String, HarvestError> {
    let url = search_page_url(&config.site, keyword, page)?;
    tracing::debug!("Fetching results page {}: {}", page, url);
    Ok(fetch_text(client, url.as_str()).await)
}

/// Extracts a page's listings; an extraction fault degrades the page to zero
/// listings
fn listings_on_page(html: &str, base_url: &str, page: u32) -> Vec<ListingRecord> {
    match parse_listing_page(html, base_url, page) {
        Ok(listings) => {
            tracing::debug!("Page {}: {} listings", page, listings.len());
            listings
        }
        Err(e) => {
            tracing::warn!("Page {} contributed no listings: {}", page, e);
            Vec::new()
        }
    }
}

/// Reads the first results page for a keyword
pub async fn search(
    client: &Client,
    config: &Config,
    keyword: &str,
) -> Result<SearchSummary, HarvestError> {
    let html = fetch_search_page(client, config, keyword, 1).await?;

    let total_pages = parse_total_pages(&html)?;
    let total_count = parse_total_count(&html)?;
    let listings = parse_listing_page(&html, &config.site.base_url, 1)?;

    Ok(SearchSummary {
        keyword: keyword.to_string(),
        total_pages,
        total_count,
        per_page_count: listings.len(),
        preview: listings.into_iter().take(PREVIEW_LEN).collect(),
    })
}

/// Collects the listings covered by `target`
///
/// # Flow
///
/// 1. Fetch page 1 and read the total page count and its listings from it
/// 2. Decide how many pages to visit from `target`; page 1 is never fetched
///    twice
/// 3. Fetch pages `2..=effective` in waves of `page-concurrency`
/// 4. Concatenate listings in page order, cut to the listing limit if any
///
/// A page whose fetch or extraction fails contributes zero listings; the
/// job continues. A listing target can therefore come up short.
pub async fn collect(
    client: &Client,
    config: &Config,
    scheduler: &Scheduler,
    keyword: &str,
    target: CollectTarget,
) -> Result<Vec<ListingRecord>, HarvestError> {
    let base_url = config.site.base_url.as_str();
    let first_page = fetch_search_page(client, config, keyword, 1).await?;

    let total_pages = parse_total_pages(&first_page).unwrap_or_else(|e| {
        tracing::warn!("Could not read page count, assuming 1: {}", e);
        1
    });
    let mut listings = listings_on_page(&first_page, base_url, 1);

    let pages = target.pages_to_visit(total_pages, listings.len());
    tracing::info!(
        "Keyword '{}': {} pages available, collecting {}",
        keyword,
        total_pages,
        pages
    );

    let remaining: Vec<u32> = (2..=pages).collect();
    let per_page = scheduler
        .run_pages(remaining, |page| async move {
            match fetch_search_page(client, config, keyword, page).await {
                Ok(html) => listings_on_page(&html, base_url, page),
                Err(e) => {
                    tracing::warn!("Page {} contributed no listings: {}", page, e);
                    Vec::new()
                }
            }
        })
        .await;

    listings.extend(per_page.into_iter().flatten());
    if let Some(limit) = target.listing_limit() {
        listings.truncate(limit);
    }
    tracing::info!("Collected {} listings from {} pages", listings.len(), pages);

    Ok(listings)
}
