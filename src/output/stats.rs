//! Statistics over a finished job
//!
//! Counts how many records were fully or partially enriched, so a run that
//! degraded some records still reports what it delivered.

use crate::record::FullRecord;
use std::time::Duration;

/// Job statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobStatistics {
    /// Number of exported records
    pub total: usize,

    /// Records with at least one detail field
    pub with_detail: usize,

    /// Records with a resolved phone number
    pub with_phone: usize,

    /// Records where enrichment contributed nothing
    pub degraded: usize,

    /// Number of distinct source pages
    pub pages: usize,

    /// Wall-clock time the job took
    pub elapsed: Duration,
}

impl JobStatistics {
    /// Computes statistics for a set of records
    pub fn from_records(records: &[FullRecord]) -> Self {
        let mut pages: Vec<u32> = records.iter().map(|r| r.listing.page).collect();
        pages.sort_unstable();
        pages.dedup();

        Self {
            total: records.len(),
            with_detail: records.iter().filter(|r| !r.detail.is_empty()).count(),
            with_phone: records.iter().filter(|r| r.tel_real.is_some()).count(),
            degraded: records.iter().filter(|r| r.is_degraded()).count(),
            pages: pages.len(),
            elapsed: Duration::ZERO,
        }
    }

    /// Records how long the job took
    pub fn with_elapsed(self, elapsed: Duration) -> Self {
        Self { elapsed, ..self }
    }

    /// Returns the share of fully or partially enriched records as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        ((self.total - self.degraded) as f64 / self.total as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &JobStatistics) {
    println!("=== Harvest Statistics ===\n");
    println!("  Records exported: {}", stats.total);
    println!("  Source pages: {}", stats.pages);
    println!("  With detail fields: {}", stats.with_detail);
    println!("  With phone number: {}", stats.with_phone);
    println!("  Degraded: {}", stats.degraded);
    println!("  Elapsed: {:.1}s", stats.elapsed.as_secs_f64());
    println!();
    println!(
        "Enrichment Rate: {:.1}% ({} / {} records enriched)",
        stats.success_rate(),
        stats.total - stats.degraded,
        stats.total
    );
}
