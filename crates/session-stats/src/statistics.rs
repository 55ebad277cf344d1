//! Session counters and the safety score

use std::fmt;

use event_fusion::RiskLevel;
use serde::{Deserialize, Serialize};

use crate::SessionError;

/// Incident kinds tracked across a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Incident {
    Microsleep,
    Distraction,
    PhoneUsage,
    Yawning,
}

impl Incident {
    pub const ALL: [Incident; 4] = [
        Incident::Microsleep,
        Incident::Distraction,
        Incident::PhoneUsage,
        Incident::Yawning,
    ];

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Incident::Microsleep => "microsleep",
            Incident::Distraction => "distraction",
            Incident::PhoneUsage => "phone_usage",
            Incident::Yawning => "yawning",
        }
    }

    /// Score deduction per occurrence
    fn event_penalty(&self) -> f64 {
        match self {
            Incident::Microsleep => 10.0,
            Incident::Distraction => 3.0,
            Incident::PhoneUsage => 5.0,
            Incident::Yawning => 2.0,
        }
    }

    /// Score deduction for spending the whole session in this incident
    fn duration_penalty(&self) -> f64 {
        match self {
            Incident::Microsleep => 20.0,
            Incident::Distraction => 10.0,
            Incident::PhoneUsage => 15.0,
            Incident::Yawning => 0.0,
        }
    }
}

impl fmt::Display for Incident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Count and cumulative time of one incident kind
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IncidentStats {
    /// Number of separate occurrences
    pub events: u64,
    /// Total time spent in completed occurrences (seconds)
    pub duration_secs: f64,
}

/// Frames per risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskCounts {
    pub safe: u64,
    pub warning: u64,
    pub danger: u64,
    pub critical: u64,
}

impl RiskCounts {
    pub fn count(&self, level: RiskLevel) -> u64 {
        match level {
            RiskLevel::Safe => self.safe,
            RiskLevel::Warning => self.warning,
            RiskLevel::Danger => self.danger,
            RiskLevel::Critical => self.critical,
        }
    }

    pub(crate) fn increment(&mut self, level: RiskLevel) {
        let slot = match level {
            RiskLevel::Safe => &mut self.safe,
            RiskLevel::Warning => &mut self.warning,
            RiskLevel::Danger => &mut self.danger,
            RiskLevel::Critical => &mut self.critical,
        };
        *slot = slot.saturating_add(1);
    }
}

/// Accumulated statistics of one monitoring session
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionStatistics {
    pub total_frames: u64,
    pub microsleep: IncidentStats,
    pub distraction: IncidentStats,
    pub phone_usage: IncidentStats,
    pub yawning: IncidentStats,
    pub risk_frames: RiskCounts,
}

impl SessionStatistics {
    pub fn incident(&self, kind: Incident) -> &IncidentStats {
        match kind {
            Incident::Microsleep => &self.microsleep,
            Incident::Distraction => &self.distraction,
            Incident::PhoneUsage => &self.phone_usage,
            Incident::Yawning => &self.yawning,
        }
    }

    pub(crate) fn incident_mut(&mut self, kind: Incident) -> &mut IncidentStats {
        match kind {
            Incident::Microsleep => &mut self.microsleep,
            Incident::Distraction => &mut self.distraction,
            Incident::PhoneUsage => &mut self.phone_usage,
            Incident::Yawning => &mut self.yawning,
        }
    }

    /// Total incident occurrences of all kinds
    pub fn total_incidents(&self) -> u64 {
        Incident::ALL
            .iter()
            .map(|kind| self.incident(*kind).events)
            .fold(0u64, u64::saturating_add)
    }

    /// Safety score in [0, 100] for a session of the given length.
    ///
    /// Each occurrence costs a fixed penalty; the time share of microsleep,
    /// distraction and phone usage costs up to 20, 10 and 15 points. A session
    /// without positive duration scores 100.
    pub fn safety_score(&self, session_duration_secs: f64) -> f64 {
        if session_duration_secs <= 0.0 {
            return 100.0;
        }

        let mut score = 100.0;
        for kind in Incident::ALL {
            let stats = self.incident(kind);
            score -= stats.events as f64 * kind.event_penalty();
            score -= stats.duration_secs / session_duration_secs * kind.duration_penalty();
        }

        score.clamp(0.0, 100.0)
    }

    /// Compact binary snapshot for checkpointing
    pub fn to_bytes(&self) -> Result<Vec<u8>, SessionError> {
        postcard::to_allocvec(self).map_err(|e| SessionError::Snapshot(e.to_string()))
    }

    /// Restore a snapshot written by [`SessionStatistics::to_bytes`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SessionError> {
        postcard::from_bytes(bytes).map_err(|e| SessionError::Snapshot(e.to_string()))
    }
}

/// Text rating of a safety score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafetyRating {
    Dangerous,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl SafetyRating {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            SafetyRating::Excellent
        } else if score >= 75.0 {
            SafetyRating::Good
        } else if score >= 60.0 {
            SafetyRating::Fair
        } else if score >= 40.0 {
            SafetyRating::Poor
        } else {
            SafetyRating::Dangerous
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyRating::Excellent => "EXCELLENT",
            SafetyRating::Good => "GOOD",
            SafetyRating::Fair => "FAIR",
            SafetyRating::Poor => "POOR",
            SafetyRating::Dangerous => "DANGEROUS",
        }
    }
}

impl fmt::Display for SafetyRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clean_session_scores_100() {
        let stats = SessionStatistics {
            total_frames: 300,
            ..Default::default()
        };
        assert_eq!(stats.safety_score(10.0), 100.0);
        assert_eq!(stats.safety_score(0.0), 100.0);
    }

    #[test]
    fn test_score_formula() {
        let stats = SessionStatistics {
            microsleep: IncidentStats { events: 1, duration_secs: 2.0 },
            distraction: IncidentStats { events: 2, duration_secs: 10.0 },
            phone_usage: IncidentStats { events: 1, duration_secs: 4.0 },
            yawning: IncidentStats { events: 3, duration_secs: 9.0 },
            ..Default::default()
        };
        // 100 - 10 - 6 - 5 - 6 - 20*0.05 - 10*0.25 - 15*0.1
        let expected = 100.0 - 10.0 - 6.0 - 5.0 - 6.0 - 1.0 - 2.5 - 1.5;
        assert!((stats.safety_score(40.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_zero_length_session_scores_100() {
        let stats = SessionStatistics {
            total_frames: 1,
            distraction: IncidentStats { events: 1, duration_secs: 0.0 },
            ..Default::default()
        };
        assert_eq!(stats.safety_score(0.0), 100.0);
        assert_eq!(stats.safety_score(-1.0), 100.0);
        assert_eq!(stats.safety_score(1.0), 97.0);
    }

    #[test]
    fn test_score_clamped_at_zero() {
        let stats = SessionStatistics {
            microsleep: IncidentStats { events: 20, duration_secs: 0.0 },
            ..Default::default()
        };
        assert_eq!(stats.safety_score(60.0), 0.0);
    }

    #[test]
    fn test_rating_buckets() {
        assert_eq!(SafetyRating::from_score(100.0), SafetyRating::Excellent);
        assert_eq!(SafetyRating::from_score(90.0), SafetyRating::Excellent);
        assert_eq!(SafetyRating::from_score(89.9), SafetyRating::Good);
        assert_eq!(SafetyRating::from_score(75.0), SafetyRating::Good);
        assert_eq!(SafetyRating::from_score(60.0), SafetyRating::Fair);
        assert_eq!(SafetyRating::from_score(40.0), SafetyRating::Poor);
        assert_eq!(SafetyRating::from_score(39.9), SafetyRating::Dangerous);
    }

    #[test]
    fn test_snapshot_restores_counters() {
        let mut stats = SessionStatistics {
            total_frames: 1234,
            phone_usage: IncidentStats { events: 2, duration_secs: 3.25 },
            ..Default::default()
        };
        stats.risk_frames.increment(RiskLevel::Danger);

        let bytes = stats.to_bytes().unwrap();
        let restored = SessionStatistics::from_bytes(&bytes).unwrap();
        assert_eq!(restored, stats);
        assert_eq!(restored.risk_frames.count(RiskLevel::Danger), 1);
    }

    #[test]
    fn test_snapshot_rejects_garbage() {
        assert!(matches!(
            SessionStatistics::from_bytes(&[0xff]),
            Err(SessionError::Snapshot(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_score_within_bounds(
            events in proptest::collection::vec(0u64..50, 4),
            durations in proptest::collection::vec(0.0f64..100.0, 4),
            session in 0.0f64..1000.0,
        ) {
            let stats = SessionStatistics {
                microsleep: IncidentStats { events: events[0], duration_secs: durations[0] },
                distraction: IncidentStats { events: events[1], duration_secs: durations[1] },
                phone_usage: IncidentStats { events: events[2], duration_secs: durations[2] },
                yawning: IncidentStats { events: events[3], duration_secs: durations[3] },
                ..Default::default()
            };
            let score = stats.safety_score(session);
            prop_assert!((0.0..=100.0).contains(&score));
        }

        #[test]
        fn prop_incident_free_session_is_perfect(frames in 0u64..100_000, session in 0.0f64..1e6) {
            let stats = SessionStatistics { total_frames: frames, ..Default::default() };
            prop_assert_eq!(stats.safety_score(session), 100.0);
        }
    }
}
