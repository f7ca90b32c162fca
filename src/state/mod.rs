//! State module for tracking job progress
//!
//! # Components
//!
//! - `JobPhase`: the phase of a job (collecting, processing, complete, failed)
//! - `JobTracker`: enforces legal phase transitions for an in-process job
//! - `JobCheckpoint`: caller-held item list and cursor for resumable chunks

mod checkpoint;
mod job_phase;

// Re-export main types
pub use checkpoint::JobCheckpoint;
pub use job_phase::{JobPhase, JobTracker};
