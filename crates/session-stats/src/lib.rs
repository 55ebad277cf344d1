//! Session Statistics
//!
//! Accumulates incident counts, incident durations and per-level frame counts
//! over a monitoring session, and derives a 0-100 safety score with a text
//! rating at any point.

mod accumulator;
mod statistics;
mod summary;

pub use accumulator::SessionStatisticsAccumulator;
pub use statistics::{Incident, IncidentStats, RiskCounts, SafetyRating, SessionStatistics};
pub use summary::SessionSummary;

use thiserror::Error;

/// Session statistics errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Snapshot codec error: {0}")]
    Snapshot(String),
}
