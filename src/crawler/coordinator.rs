//! Harvest coordinator - the operations exposed to the surrounding application
//!
//! This module wires the collector, enricher and scheduler together:
//! - `search`: first results page, used to size a job
//! - `collect` / `collect_target`: phase one of a chunked job
//! - `process_chunk` / `process_checkpoint`: phase two, one bounded chunk per call
//! - `run_continuous`: round-robin worker pool over every listing
//! - `run_streaming`: sequential run reporting progress events
//! - `run_chunked`: in-process supervisor driving the chunked phases

use crate::config::Config;
use crate::crawler::collector::{self, CollectTarget, SearchSummary};
use crate::crawler::enricher;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::scheduler::{ChunkOutcome, Scheduler};
use crate::output::HarvestEvent;
use crate::record::{FullRecord, ListingRecord};
use crate::state::{JobCheckpoint, JobPhase, JobTracker};
use crate::HarvestError;
use reqwest::Client;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Main harvest coordinator structure
///
/// Cheap to clone; clones share the HTTP client and configuration. The
/// coordinator holds no job state between calls.
#[derive(Clone)]
pub struct Coordinator {
    config: Arc<Config>,
    client: Client,
    scheduler: Scheduler,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let client = build_http_client(&config)?;
        let scheduler = Scheduler::new(&config.crawler);

        Ok(Self {
            config: Arc::new(config),
            client,
            scheduler,
        })
    }

    /// The configuration this coordinator runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Rejects job requests that cannot start
    ///
    /// Page targets are bounded by `max-page-limit`; listing targets only
    /// need to be positive and may reach the last results page.
    fn validate_request<'k>(
        &self,
        keyword: &'k str,
        target: CollectTarget,
    ) -> Result<&'k str, HarvestError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(HarvestError::MissingKeyword);
        }

        match target {
            CollectTarget::Pages(page_limit) => {
                let max = self.config.crawler.max_page_limit;
                if page_limit < 1 || page_limit > max {
                    return Err(HarvestError::InvalidPageLimit {
                        requested: page_limit,
                        max,
                    });
                }
            }
            CollectTarget::Listings(0) => return Err(HarvestError::InvalidListingLimit),
            CollectTarget::Listings(_) => {}
        }

        Ok(keyword)
    }

    /// Reads the first results page for `keyword`
    pub async fn search(&self, keyword: &str) -> Result<SearchSummary, HarvestError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(HarvestError::MissingKeyword);
        }
        collector::search(&self.client, &self.config, keyword).await
    }

    /// Collects the listings of up to `page_limit` result pages
    pub async fn collect(
        &self,
        keyword: &str,
        page_limit: u32,
    ) -> Result<Vec<ListingRecord>, HarvestError> {
        self.collect_target(keyword, CollectTarget::Pages(page_limit)).await
    }

    /// Collects the listings covered by `target`
    pub async fn collect_target(
        &self,
        keyword: &str,
        target: CollectTarget,
    ) -> Result<Vec<ListingRecord>, HarvestError> {
        let keyword = self.validate_request(keyword, target)?;
        collector::collect(&self.client, &self.config, &self.scheduler, keyword, target).await
    }

    /// Enriches a single listing
    pub async fn enrich(&self, listing: ListingRecord) -> FullRecord {
        enricher::enrich(&self.client, listing).await
    }

    /// Processes the chunk of `listings` starting at `cursor`
    ///
    /// The result carries the cursor of the next chunk, or `None` once the
    /// list is exhausted.
    pub async fn process_chunk(
        &self,
        listings: &[ListingRecord],
        cursor: usize,
    ) -> Result<ChunkOutcome<FullRecord>, HarvestError> {
        self.scheduler
            .run_chunk(listings, cursor, |listing| self.enrich(listing))
            .await
    }

    /// Processes the next chunk of a caller-held checkpoint
    pub async fn process_checkpoint(
        &self,
        checkpoint: &JobCheckpoint,
    ) -> Result<ChunkOutcome<FullRecord>, HarvestError> {
        self.process_chunk(&checkpoint.items, checkpoint.cursor).await
    }

    /// Enriches every listing with the round-robin worker pool
    ///
    /// Output is grouped by worker, not in input order.
    pub async fn run_continuous(&self, listings: Vec<ListingRecord>) -> Vec<FullRecord> {
        tracing::info!("Enriching {} listings", listings.len());
        self.scheduler
            .run_continuous(listings, |listing| self.enrich(listing))
            .await
    }

    /// Runs a whole job in the background, streaming its events
    ///
    /// Listings are enriched one at a time in input order, with a progress
    /// event before each. The stream ends with a `complete` event carrying the
    /// CSV export and the elapsed time, or an `error` event. Dropping the
    /// receiver abandons the job once the in-flight listing finishes.
    pub fn run_streaming(
        &self,
        keyword: impl Into<String>,
        target: CollectTarget,
    ) -> mpsc::UnboundedReceiver<HarvestEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let coordinator = self.clone();
        let keyword = keyword.into();

        tokio::spawn(async move {
            let started = Instant::now();
            let event = match coordinator.stream_job(&keyword, target, &tx).await {
                Ok(records) => HarvestEvent::complete(&records, started.elapsed()),
                Err(e) => {
                    tracing::error!("Streaming job for '{}' failed: {}", keyword, e);
                    HarvestEvent::Error {
                        message: e.to_string(),
                    }
                }
            };

            if tx.send(event).is_err() {
                tracing::info!("Receiver closed, discarding result for '{}'", keyword);
            }
        });

        rx
    }

    async fn stream_job(
        &self,
        keyword: &str,
        target: CollectTarget,
        tx: &mpsc::UnboundedSender<HarvestEvent>,
    ) -> Result<Vec<FullRecord>, HarvestError> {
        let listings = self.collect_target(keyword, target).await?;

        let on_progress = |current: usize, total: usize, listing: &ListingRecord| {
            let event = HarvestEvent::Progress {
                current,
                total,
                name: listing.name.clone(),
            };
            match tx.send(event) {
                Ok(()) => ControlFlow::Continue(()),
                Err(_) => ControlFlow::Break(()),
            }
        };

        let records = self
            .scheduler
            .run_streaming(listings, on_progress, |listing| self.enrich(listing))
            .await;

        Ok(records)
    }

    /// Drives a chunked job to completion in-process
    ///
    /// Collects the listings, then repeatedly processes the checkpoint and
    /// advances it with the returned cursor, exactly as an external supervisor
    /// would. `tracker` must start in the collecting phase; it ends `complete`,
    /// or `failed` when an error is returned. `on_chunk` sees each checkpoint
    /// with the outcome it produced. Records are returned in input order.
    pub async fn run_chunked<F>(
        &self,
        keyword: &str,
        target: CollectTarget,
        tracker: &mut JobTracker,
        mut on_chunk: F,
    ) -> Result<Vec<FullRecord>, HarvestError>
    where
        F: FnMut(&JobCheckpoint, &ChunkOutcome<FullRecord>),
    {
        let result = self
            .drive_chunks(keyword, target, tracker, &mut on_chunk)
            .await;

        if let Err(e) = &result {
            tracker.fail();
            tracing::warn!(
                "Chunked job for '{}' {} after {} chunks: {}",
                keyword.trim(),
                tracker.phase(),
                tracker.chunks(),
                e
            );
        }
        result
    }

    async fn drive_chunks<F>(
        &self,
        keyword: &str,
        target: CollectTarget,
        tracker: &mut JobTracker,
        on_chunk: &mut F,
    ) -> Result<Vec<FullRecord>, HarvestError>
    where
        F: FnMut(&JobCheckpoint, &ChunkOutcome<FullRecord>),
    {
        let listings = self.collect_target(keyword, target).await?;

        let mut records = Vec::with_capacity(listings.len());
        let mut checkpoint = JobCheckpoint::new(keyword.trim(), listings);

        if checkpoint.is_complete() {
            tracker.transition(JobPhase::Complete)?;
            return Ok(records);
        }

        loop {
            tracker.transition(JobPhase::Processing)?;

            let outcome = self.process_checkpoint(&checkpoint).await?;
            on_chunk(&checkpoint, &outcome);
            tracing::info!(
                "Chunk {} done: {} records, {} remaining",
                tracker.chunks(),
                outcome.results.len(),
                checkpoint.remaining() - outcome.results.len()
            );

            let next_cursor = outcome.next_cursor;
            records.extend(outcome.results);

            match checkpoint.advance(next_cursor) {
                Some(next) => checkpoint = next,
                None => break,
            }
        }

        tracker.transition(JobPhase::Complete)?;
        Ok(records)
    }
}
