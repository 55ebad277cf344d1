//! End-of-session summary

use std::fmt;

use event_fusion::RiskLevel;
use serde::{Deserialize, Serialize};

use crate::statistics::{SafetyRating, SessionStatistics};

const RULE_WIDTH: usize = 70;

/// Final statistics with the derived score and rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub statistics: SessionStatistics,
    pub duration_secs: f64,
    pub safety_score: f64,
    pub rating: SafetyRating,
}

impl SessionSummary {
    pub fn new(statistics: SessionStatistics, duration_secs: f64) -> Self {
        let safety_score = statistics.safety_score(duration_secs);
        Self {
            statistics,
            duration_secs,
            safety_score,
            rating: SafetyRating::from_score(safety_score),
        }
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.statistics;
        let rule = "-".repeat(RULE_WIDTH);

        writeln!(
            f,
            "Duration: {:.1} seconds ({:.1} minutes)",
            self.duration_secs,
            self.duration_secs / 60.0
        )?;
        writeln!(f, "Total Frames: {}", stats.total_frames)?;
        writeln!(f)?;

        writeln!(f, "ALERTS SUMMARY")?;
        writeln!(f, "{rule}")?;
        for level in [RiskLevel::Critical, RiskLevel::Danger, RiskLevel::Warning] {
            let label = match level {
                RiskLevel::Critical => "Critical",
                RiskLevel::Danger => "Danger",
                _ => "Warning",
            };
            writeln!(f, "{label} Alerts: {}", stats.risk_frames.count(level))?;
        }
        writeln!(f)?;

        writeln!(f, "SAFETY INCIDENTS")?;
        writeln!(f, "{rule}")?;
        let incidents = [
            ("Microsleep", &stats.microsleep),
            ("Distraction", &stats.distraction),
            ("Phone Usage", &stats.phone_usage),
            ("Yawn", &stats.yawning),
        ];
        for (label, incident) in incidents {
            writeln!(
                f,
                "{label} Events: {} (Total: {:.1}s)",
                incident.events, incident.duration_secs
            )?;
        }
        writeln!(f)?;

        writeln!(f, "SAFETY SCORE")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Overall Safety: {:.1}/100", self.safety_score)?;
        write!(f, "Rating: {}", self.rating)
    }
}
