//! Session report

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use session_stats::SessionSummary;
use uuid::Uuid;

/// Identified, time-stamped summary of one monitoring session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub summary: SessionSummary,
}

impl SessionReport {
    pub fn new(session_id: Uuid, started_at: DateTime<Utc>, summary: SessionSummary) -> Self {
        Self {
            session_id,
            started_at,
            finished_at: Utc::now(),
            summary,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(70);
        writeln!(f, "{rule}")?;
        writeln!(f, "DRIVER MONITORING SESSION REPORT")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Session: {}", self.session_id)?;
        writeln!(
            f,
            "Started: {}",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(f)?;
        writeln!(f, "{}", self.summary)?;
        write!(f, "{rule}")
    }
}
