//! Priority-based risk aggregation

use dms::{EyeReading, EyeState, HeadReading, MouthReading, PhoneState, PhoneUsageSample};

use crate::{DriverAlert, FrameAnalysis, RiskLevel};

/// Combines the four channel outputs into a [`FrameAnalysis`].
///
/// Holds no state: the same readings always produce the same analysis.
/// Rules run in a fixed order, each appending its alert and only ever
/// raising the frame risk.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskAggregator;

impl RiskAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn combine(
        &self,
        eye: &EyeReading,
        head: &HeadReading,
        phone: &PhoneUsageSample,
        mouth: &MouthReading,
    ) -> FrameAnalysis {
        let mut alerts = Vec::new();

        if eye.state == EyeState::Microsleep {
            alerts.push(DriverAlert::Microsleep {
                duration_secs: eye.closed_duration_secs,
            });
        }

        if phone.state == PhoneState::PhoneUsage {
            alerts.push(DriverAlert::PhoneUsage {
                confidence: phone.confidence,
            });
        }

        if head.is_distracted {
            alerts.push(DriverAlert::Distracted {
                direction: head.state,
            });
        }

        if mouth.is_yawning() {
            alerts.push(DriverAlert::Yawning {
                duration_secs: mouth.yawn_duration_secs,
            });
        }

        if eye.state == EyeState::Closed {
            alerts.push(DriverAlert::EyesClosing);
        }

        if phone.state == PhoneState::LikelyPhone {
            alerts.push(DriverAlert::PossiblePhoneUsage);
        }

        let risk_level = alerts
            .iter()
            .map(DriverAlert::risk_floor)
            .max()
            .unwrap_or(RiskLevel::Safe);

        FrameAnalysis {
            risk_level,
            alerts,
            eye_state: eye.state,
            head_state: head.state,
            phone_state: phone.state,
            mouth_state: mouth.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dms::{HeadState, MouthState};
    use proptest::prelude::*;

    fn eye(state: EyeState) -> EyeReading {
        EyeReading {
            state,
            ear: 0.1,
            closed_duration_secs: 1.6,
        }
    }

    fn head(state: HeadState) -> HeadReading {
        HeadReading {
            state,
            yaw_degrees: 0.0,
            pitch_degrees: 0.0,
            is_distracted: state.is_distracted(),
        }
    }

    fn phone(state: PhoneState) -> PhoneUsageSample {
        PhoneUsageSample::new(state, 0.9)
    }

    fn mouth(state: MouthState) -> MouthReading {
        MouthReading {
            state,
            mar: 0.5,
            yawn_duration_secs: 2.5,
        }
    }

    #[test]
    fn test_safe_frame() {
        let analysis = RiskAggregator::new().combine(
            &eye(EyeState::Open),
            &head(HeadState::Forward),
            &phone(PhoneState::NoPhone),
            &mouth(MouthState::Closed),
        );
        assert_eq!(analysis.risk_level, RiskLevel::Safe);
        assert!(!analysis.has_alerts());
    }

    #[test]
    fn test_microsleep_phone_and_distraction() {
        let analysis = RiskAggregator::new().combine(
            &eye(EyeState::Microsleep),
            &head(HeadState::Left),
            &phone(PhoneState::PhoneUsage),
            &mouth(MouthState::Closed),
        );
        assert_eq!(analysis.risk_level, RiskLevel::Critical);
        assert_eq!(
            analysis.alerts,
            vec![
                DriverAlert::Microsleep { duration_secs: 1.6 },
                DriverAlert::PhoneUsage { confidence: 0.9 },
                DriverAlert::Distracted { direction: HeadState::Left },
            ]
        );
        assert_eq!(analysis.alert_messages()[0], "MICROSLEEP! (1.6s)");
    }

    #[test]
    fn test_warning_rules_do_not_downgrade() {
        let analysis = RiskAggregator::new().combine(
            &eye(EyeState::Closed),
            &head(HeadState::Down),
            &phone(PhoneState::LikelyPhone),
            &mouth(MouthState::Yawning),
        );
        assert_eq!(analysis.risk_level, RiskLevel::Danger);
        assert_eq!(
            analysis.alerts,
            vec![
                DriverAlert::Distracted { direction: HeadState::Down },
                DriverAlert::Yawning { duration_secs: 2.5 },
                DriverAlert::EyesClosing,
                DriverAlert::PossiblePhoneUsage,
            ]
        );
    }

    #[test]
    fn test_warning_only() {
        let analysis = RiskAggregator::new().combine(
            &eye(EyeState::Open),
            &head(HeadState::Forward),
            &phone(PhoneState::HandUp),
            &mouth(MouthState::Yawning),
        );
        assert_eq!(analysis.risk_level, RiskLevel::Warning);
        assert_eq!(analysis.alerts.len(), 1);
    }

    #[test]
    fn test_no_face_is_safe() {
        let analysis = RiskAggregator::new().combine(
            &EyeReading::default(),
            &HeadReading::default(),
            &PhoneUsageSample::default(),
            &MouthReading::default(),
        );
        assert_eq!(analysis.risk_level, RiskLevel::Safe);
        assert_eq!(analysis.eye_state, EyeState::NoFace);
        assert_eq!(analysis.head_state, HeadState::NoFace);
    }

    fn eye_states() -> impl Strategy<Value = EyeState> {
        prop_oneof![
            Just(EyeState::NoFace),
            Just(EyeState::Open),
            Just(EyeState::Closed),
            Just(EyeState::Microsleep),
        ]
    }

    fn head_states() -> impl Strategy<Value = HeadState> {
        prop_oneof![
            Just(HeadState::NoFace),
            Just(HeadState::Forward),
            Just(HeadState::Left),
            Just(HeadState::Right),
            Just(HeadState::Up),
            Just(HeadState::Down),
        ]
    }

    fn phone_states() -> impl Strategy<Value = PhoneState> {
        proptest::sample::select(PhoneState::ALL.to_vec())
    }

    fn mouth_states() -> impl Strategy<Value = MouthState> {
        prop_oneof![
            Just(MouthState::NoFace),
            Just(MouthState::Closed),
            Just(MouthState::Open),
            Just(MouthState::WideOpen),
            Just(MouthState::Yawning),
        ]
    }

    proptest! {
        #[test]
        fn prop_combine_is_pure_and_monotone(
            e in eye_states(),
            h in head_states(),
            p in phone_states(),
            m in mouth_states(),
        ) {
            let aggregator = RiskAggregator::new();
            let first = aggregator.combine(&eye(e), &head(h), &phone(p), &mouth(m));
            let second = aggregator.combine(&eye(e), &head(h), &phone(p), &mouth(m));
            prop_assert_eq!(&first, &second);

            for alert in &first.alerts {
                prop_assert!(first.risk_level >= alert.risk_floor());
            }
            if e == EyeState::Microsleep {
                prop_assert_eq!(first.risk_level, RiskLevel::Critical);
                let primary_is_microsleep =
                    matches!(first.primary_alert(), Some(DriverAlert::Microsleep { .. }));
                prop_assert!(primary_is_microsleep);
            }
            prop_assert_eq!(first.has_alerts(), first.risk_level != RiskLevel::Safe);
        }
    }
}
