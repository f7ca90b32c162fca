//! Detail enricher: merges a listing with its detail and contact pages

use crate::crawler::fetcher::fetch_text;
use crate::extract::{parse_contact_page, parse_detail_page};
use crate::record::{DetailFields, FullRecord, ListingRecord};
use crate::url::contact_url;
use crate::ExtractResult;
use reqwest::Client;

/// Enriches one listing into a full record
///
/// The detail page and the contact page are fetched concurrently; each fetch
/// degrades to an empty document on failure. If extraction itself faults the
/// listing is returned bare, so one bad record never aborts a batch.
pub async fn enrich(client: &Client, listing: ListingRecord) -> FullRecord {
    let contact = contact_url(&listing.url);
    let (detail_html, contact_html) =
        tokio::join!(fetch_text(client, &listing.url), fetch_text(client, &contact));

    match extract(&detail_html, &contact_html) {
        Ok((detail, tel_real)) => FullRecord::merge(listing, detail, tel_real),
        Err(e) => {
            tracing::warn!("Enrichment of {} degraded to bare listing: {}", listing.url, e);
            FullRecord::bare(listing)
        }
    }
}

fn extract(detail_html: &str, contact_html: &str) -> ExtractResult<(DetailFields, Option<String>)> {
    let detail = parse_detail_page(detail_html)?;
    let tel_real = parse_contact_page(contact_html)?;
    Ok((detail, tel_real))
}
