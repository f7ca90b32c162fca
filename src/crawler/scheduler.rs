//! Batch scheduler for bounded-concurrency, rate-limited work
//!
//! This module drives a list of work items through a per-item async
//! operation. It offers:
//! - A round-robin worker pool with an inter-item delay (continuous mode)
//! - Order-preserving waves with an inter-wave delay (listing pages, chunks)
//! - A single sequential worker that reports progress before each item
//! - Resumable chunks addressed by a cursor into the full item list
//!
//! Concurrency is cooperative: every operation runs on the calling task and
//! suspends at its own awaits. No state is shared between workers; results
//! are gathered only after all workers of a wave have finished.

use crate::config::CrawlerConfig;
use crate::HarvestError;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::ops::{ControlFlow, Range};
use std::time::Duration;

/// Results of one resumable invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkOutcome<R> {
    /// Results for the chunk, in input order
    pub results: Vec<R>,

    /// Where the next invocation starts; `None` once the list is exhausted
    pub next_cursor: Option<usize>,
}

impl<R> ChunkOutcome<R> {
    /// Returns true if this was the last chunk of the job
    pub fn is_complete(&self) -> bool {
        self.next_cursor.is_none()
    }
}

/// Computes the slice a chunk covers and the cursor that follows it
///
/// # Returns
///
/// * `Ok((range, Some(next)))` - More items remain after this chunk
/// * `Ok((range, None))` - This chunk reaches the end of the list
/// * `Err(HarvestError::InvalidChunk)` - `cursor` is past the end of the list
pub fn chunk_bounds(
    len: usize,
    cursor: usize,
    chunk_size: usize,
) -> Result<(Range<usize>, Option<usize>), HarvestError> {
    if cursor > len {
        return Err(HarvestError::InvalidChunk { cursor, len });
    }

    let end = cursor.saturating_add(chunk_size.max(1));
    if end >= len {
        Ok((cursor..len, None))
    } else {
        Ok((cursor..end, Some(end)))
    }
}

/// Scheduler holding the pacing parameters of one job
#[derive(Debug, Clone)]
pub struct Scheduler {
    workers: usize,
    item_delay: Duration,
    page_concurrency: usize,
    page_delay: Duration,
    chunk_size: usize,
    chunk_workers: usize,
    chunk_delay: Duration,
}

impl Scheduler {
    /// Creates a scheduler from the crawler configuration
    pub fn new(config: &CrawlerConfig) -> Self {
        Self {
            workers: config.workers.max(1),
            item_delay: Duration::from_millis(config.item_delay_ms),
            page_concurrency: config.page_concurrency.max(1),
            page_delay: Duration::from_millis(config.page_delay_ms),
            chunk_size: config.chunk_size.max(1),
            chunk_workers: config.chunk_workers.max(1),
            chunk_delay: Duration::from_millis(config.chunk_delay_ms),
        }
    }

    /// Number of items handled per resumable invocation
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Continuous mode: the round-robin worker pool
    pub async fn run_continuous<T, R, F, Fut>(&self, items: Vec<T>, op: F) -> Vec<R>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = R>,
    {
        run_in_workers(items, self.workers, self.item_delay, op).await
    }

    /// Fetches listing pages in order-preserving waves
    pub async fn run_pages<T, R, F, Fut>(&self, items: Vec<T>, op: F) -> Vec<R>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = R>,
    {
        run_in_waves(items, self.page_concurrency, self.page_delay, op).await
    }

    /// Streaming mode: one worker, progress reported before each item
    pub async fn run_streaming<T, R, F, Fut, P>(&self, items: Vec<T>, on_progress: P, op: F) -> Vec<R>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = R>,
        P: FnMut(usize, usize, &T) -> ControlFlow<()>,
    {
        run_sequential(items, self.item_delay, on_progress, op).await
    }

    /// Chunked mode: processes `items[cursor..cursor + chunk_size]`
    ///
    /// The chunk runs in sub-batches of `chunk_workers` concurrent items with
    /// a delay between sub-batches, so results keep input order.
    pub async fn run_chunk<T, R, F, Fut>(
        &self,
        items: &[T],
        cursor: usize,
        op: F,
    ) -> Result<ChunkOutcome<R>, HarvestError>
    where
        T: Clone,
        F: Fn(T) -> Fut,
        Fut: Future<Output = R>,
    {
        let (range, next_cursor) = chunk_bounds(items.len(), cursor, self.chunk_size)?;
        tracing::debug!(
            "Processing chunk {}..{} of {} (next cursor: {:?})",
            range.start,
            range.end,
            items.len(),
            next_cursor
        );

        let chunk = items[range].to_vec();
        let results = run_in_waves(chunk, self.chunk_workers, self.chunk_delay, op).await;

        Ok(ChunkOutcome {
            results,
            next_cursor,
        })
    }
}

/// Partitions `items` round-robin across at most `worker_count` workers
///
/// Each worker handles its partition strictly in order, sleeping `delay`
/// between items; workers run concurrently. Results are concatenated worker
/// by worker, so with more than one worker the output is grouped by
/// partition rather than in input order.
pub async fn run_in_workers<T, R, F, Fut>(
    items: Vec<T>,
    worker_count: usize,
    delay: Duration,
    op: F,
) -> Vec<R>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = R>,
{
    if items.is_empty() {
        return Vec::new();
    }

    let n = worker_count.clamp(1, items.len());
    let mut buckets: Vec<Vec<T>> = (0..n).map(|_| Vec::new()).collect();
    for (index, item) in items.into_iter().enumerate() {
        buckets[index % n].push(item);
    }

    let op = &op;
    let workers = buckets.into_iter().enumerate().map(|(worker, bucket)| async move {
        let mut out = Vec::with_capacity(bucket.len());
        for (index, item) in bucket.into_iter().enumerate() {
            if index > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            out.push(op(item).await);
        }
        tracing::trace!("Worker {} finished {} items", worker, out.len());
        out
    });

    join_all(workers).await.into_iter().flatten().collect()
}

/// Runs `items` in consecutive waves of `wave_size` concurrent operations
///
/// Waves are separated by `delay`. Results keep input order.
pub async fn run_in_waves<T, R, F, Fut>(
    items: Vec<T>,
    wave_size: usize,
    delay: Duration,
    op: F,
) -> Vec<R>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = R>,
{
    let wave_size = wave_size.max(1);
    let mut results = Vec::with_capacity(items.len());
    let mut remaining = items.into_iter().peekable();
    let mut first_wave = true;

    while remaining.peek().is_some() {
        if !first_wave && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        first_wave = false;

        let wave: Vec<T> = remaining.by_ref().take(wave_size).collect();
        results.extend(join_all(wave.into_iter().map(&op)).await);
    }

    results
}

/// Runs `items` one at a time, calling `on_progress(current, total, item)`
/// before each item's work begins
///
/// `current` is 1-based. Returning [`ControlFlow::Break`] from `on_progress`
/// stops the run; results gathered so far are returned.
pub async fn run_sequential<T, R, F, Fut, P>(
    items: Vec<T>,
    delay: Duration,
    mut on_progress: P,
    op: F,
) -> Vec<R>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = R>,
    P: FnMut(usize, usize, &T) -> ControlFlow<()>,
{
    let total = items.len();
    let mut results = Vec::with_capacity(total);

    for (index, item) in items.into_iter().enumerate() {
        if index > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if on_progress(index + 1, total, &item).is_break() {
            tracing::info!("Sequential run stopped after {} of {} items", index, total);
            break;
        }
        results.push(op(item).await);
    }

    results
}
