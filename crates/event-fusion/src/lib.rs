//! Event Fusion Engine
//!
//! Combines the per-channel driver state into one frame verdict:
//! - Eye (microsleep, closing eyes)
//! - Head (looking away)
//! - Phone (confirmed or likely usage)
//! - Mouth (yawning)
//!
//! The verdict carries an overall risk level and the alerts that raised it,
//! in fixed priority order, for display and persistence sinks.

mod aggregator;

pub use aggregator::RiskAggregator;

use std::fmt;

use dms::{EyeState, HeadState, MouthState, PhoneState};
use serde::{Deserialize, Serialize};

/// Overall frame risk, ordered by severity
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    #[default]
    Safe,
    Warning,
    Danger,
    Critical,
}

impl RiskLevel {
    /// All levels in severity order
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Safe,
        RiskLevel::Warning,
        RiskLevel::Danger,
        RiskLevel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "SAFE",
            RiskLevel::Warning => "WARNING",
            RiskLevel::Danger => "DANGER",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert raised for a single frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DriverAlert {
    /// Eyes closed long enough to count as microsleep
    Microsleep { duration_secs: f64 },

    /// Confirmed phone usage
    PhoneUsage { confidence: f64 },

    /// Driver looking away from the road
    Distracted { direction: HeadState },

    /// Sustained yawn (fatigue sign)
    Yawning { duration_secs: f64 },

    /// Eyes closed, not yet microsleep
    EyesClosing,

    /// Hand at the face, phone not confirmed
    PossiblePhoneUsage,
}

impl DriverAlert {
    /// Minimum frame risk implied by this alert
    pub fn risk_floor(&self) -> RiskLevel {
        match self {
            DriverAlert::Microsleep { .. } => RiskLevel::Critical,
            DriverAlert::PhoneUsage { .. } | DriverAlert::Distracted { .. } => RiskLevel::Danger,
            DriverAlert::Yawning { .. }
            | DriverAlert::EyesClosing
            | DriverAlert::PossiblePhoneUsage => RiskLevel::Warning,
        }
    }
}

impl fmt::Display for DriverAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverAlert::Microsleep { duration_secs } => {
                write!(f, "MICROSLEEP! ({duration_secs:.1}s)")
            }
            DriverAlert::PhoneUsage { confidence } => {
                write!(f, "PHONE USAGE! ({:.0}%)", confidence * 100.0)
            }
            DriverAlert::Distracted { direction } => write!(f, "DISTRACTED: Looking {direction}"),
            DriverAlert::Yawning { duration_secs } => {
                write!(f, "YAWNING - Fatigue ({duration_secs:.1}s)")
            }
            DriverAlert::EyesClosing => f.write_str("Eyes closing"),
            DriverAlert::PossiblePhoneUsage => f.write_str("Possible phone usage"),
        }
    }
}

/// Complete verdict for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameAnalysis {
    /// Overall risk of the frame
    pub risk_level: RiskLevel,

    /// Alerts in priority order
    pub alerts: Vec<DriverAlert>,

    pub eye_state: EyeState,
    pub head_state: HeadState,
    pub phone_state: PhoneState,
    pub mouth_state: MouthState,
}

impl FrameAnalysis {
    /// Check if any alerts are active
    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }

    /// Highest-priority alert of the frame
    pub fn primary_alert(&self) -> Option<&DriverAlert> {
        self.alerts.first()
    }

    /// Alerts rendered as display strings, in priority order
    pub fn alert_messages(&self) -> Vec<String> {
        self.alerts.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_order() {
        assert!(RiskLevel::Safe < RiskLevel::Warning);
        assert!(RiskLevel::Warning < RiskLevel::Danger);
        assert!(RiskLevel::Danger < RiskLevel::Critical);
    }

    #[test]
    fn test_alert_messages() {
        assert_eq!(
            DriverAlert::Microsleep { duration_secs: 1.52 }.to_string(),
            "MICROSLEEP! (1.5s)"
        );
        assert_eq!(
            DriverAlert::PhoneUsage { confidence: 0.95 }.to_string(),
            "PHONE USAGE! (95%)"
        );
        assert_eq!(
            DriverAlert::Distracted { direction: HeadState::Left }.to_string(),
            "DISTRACTED: Looking LEFT"
        );
        assert_eq!(
            DriverAlert::Yawning { duration_secs: 2.04 }.to_string(),
            "YAWNING - Fatigue (2.0s)"
        );
        assert_eq!(DriverAlert::EyesClosing.to_string(), "Eyes closing");
    }

    #[test]
    fn test_alert_serialization() {
        let json = serde_json::to_string(&DriverAlert::EyesClosing).unwrap();
        assert_eq!(json, r#"{"kind":"eyes_closing"}"#);

        let json = serde_json::to_string(&RiskLevel::Critical).unwrap();
        assert_eq!(json, "\"CRITICAL\"");
    }
}
