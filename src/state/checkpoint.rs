use crate::record::ListingRecord;
use crate::HarvestError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Caller-held resumption state for chunked processing
///
/// The pipeline keeps nothing between invocations. The caller stores this
/// checkpoint, passes it to each chunk invocation, and advances it with the
/// returned cursor until the job completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCheckpoint {
    /// Keyword the listings were collected for
    pub keyword: String,

    /// Every listing of the job, in collection order
    pub items: Vec<ListingRecord>,

    /// Index of the first listing the next invocation processes
    pub cursor: usize,
}

impl JobCheckpoint {
    /// Creates a checkpoint at the start of the item list
    pub fn new(keyword: impl Into<String>, items: Vec<ListingRecord>) -> Self {
        Self {
            keyword: keyword.into(),
            items,
            cursor: 0,
        }
    }

    /// Number of listings not yet processed
    pub fn remaining(&self) -> usize {
        self.items.len().saturating_sub(self.cursor)
    }

    /// Returns true if the cursor has consumed every listing
    pub fn is_complete(&self) -> bool {
        self.remaining() == 0
    }

    /// Produces the checkpoint for the next invocation
    ///
    /// Returns `None` when `next_cursor` signals completion.
    pub fn advance(self, next_cursor: Option<usize>) -> Option<Self> {
        next_cursor.map(|cursor| Self { cursor, ..self })
    }

    /// Reads a checkpoint from a JSON file
    pub fn load(path: &Path) -> Result<Self, HarvestError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Writes the checkpoint to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), HarvestError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
