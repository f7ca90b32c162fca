use crate::output::csv::to_csv;
use crate::record::FullRecord;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Events emitted by a streaming harvest
///
/// A stream is a run of `progress` events ending in exactly one `complete`
/// or `error` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HarvestEvent {
    /// Emitted before enrichment of listing `current` (1-based) begins
    Progress {
        current: usize,
        total: usize,
        name: String,
    },

    /// The job finished; `csv` holds the full export
    Complete {
        count: usize,
        csv: String,
        elapsed_ms: u64,
    },

    /// The job failed
    Error { message: String },
}

impl HarvestEvent {
    /// Builds the completion event for a finished job
    pub fn complete(records: &[FullRecord], elapsed: Duration) -> Self {
        Self::Complete {
            count: records.len(),
            csv: to_csv(records),
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Returns true for the event that ends a stream
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }

    /// Renders the event as one line of JSON
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
