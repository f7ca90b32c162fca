//! Job phase definitions for tracking harvest progress
//!
//! A job moves `collecting -> processing -> complete`, re-entering
//! `processing` once per chunk. `failed` can be reached from any
//! non-terminal phase and ends the job.

use crate::HarvestError;
use std::fmt;

/// Represents the phase of one harvest job as seen by its caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobPhase {
    /// Search result pages are being collected
    Collecting,

    /// Listings are being enriched, one chunk at a time
    Processing,

    /// Every listing has been enriched
    Complete,

    /// The job hit a job-level error; restart from collecting
    Failed,
}

impl JobPhase {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    /// Returns true if moving from `self` to `next` is legal
    pub fn can_transition_to(&self, next: JobPhase) -> bool {
        match (self, next) {
            (Self::Collecting, Self::Processing) => true,
            // Nothing was collected
            (Self::Collecting, Self::Complete) => true,
            (Self::Processing, Self::Processing) => true,
            (Self::Processing, Self::Complete) => true,
            (from, Self::Failed) => !from.is_terminal(),
            _ => false,
        }
    }

    /// String form used in logs and events
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collecting => "collecting",
            Self::Processing => "processing",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tracks the phase of a job driven in-process
#[derive(Debug, Clone)]
pub struct JobTracker {
    phase: JobPhase,
    chunks: usize,
}

impl Default for JobTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl JobTracker {
    /// Creates a tracker in the collecting phase
    pub fn new() -> Self {
        Self {
            phase: JobPhase::Collecting,
            chunks: 0,
        }
    }

    /// Current phase
    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    /// Number of times the processing phase was entered
    pub fn chunks(&self) -> usize {
        self.chunks
    }

    /// Moves to `next`, rejecting illegal transitions
    pub fn transition(&mut self, next: JobPhase) -> Result<(), HarvestError> {
        if !self.phase.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }

        if next == JobPhase::Processing {
            self.chunks += 1;
        }
        tracing::debug!("Job phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    /// Marks the job failed unless it already ended
    pub fn fail(&mut self) {
        if !self.phase.is_terminal() {
            self.phase = JobPhase::Failed;
        }
    }
}
