//! Head pose direction classification

use crate::classifier::FrameClassifier;
use crate::config::DmsConfig;
use crate::measurement::HeadMeasurement;
use crate::state::{HeadReading, HeadState};

/// Yaw/pitch threshold classifier.
///
/// Each frame is classified on its own; the only retained state is the last
/// label. Yaw wins over pitch when both exceed their thresholds. Negative yaw
/// is the driver's left, negative pitch is looking up.
#[derive(Debug, Clone)]
pub struct HeadPoseClassifier {
    yaw_threshold: f64,
    pitch_threshold: f64,
    last_state: HeadState,
}

impl HeadPoseClassifier {
    pub fn new(config: &DmsConfig) -> Self {
        Self {
            yaw_threshold: config.yaw_threshold_degrees,
            pitch_threshold: config.pitch_threshold_degrees,
            last_state: HeadState::NoFace,
        }
    }

    /// Classify one frame
    pub fn update(&mut self, measurement: &HeadMeasurement) -> HeadReading {
        if !measurement.face_visible {
            self.last_state = HeadState::NoFace;
            return HeadReading::default();
        }

        let yaw = measurement.yaw_degrees;
        let pitch = measurement.pitch_degrees;

        let state = if yaw.abs() > self.yaw_threshold {
            if yaw < 0.0 {
                HeadState::Left
            } else {
                HeadState::Right
            }
        } else if pitch < -self.pitch_threshold {
            HeadState::Up
        } else if pitch > self.pitch_threshold {
            HeadState::Down
        } else {
            HeadState::Forward
        };

        self.last_state = state;
        HeadReading {
            state,
            yaw_degrees: yaw,
            pitch_degrees: pitch,
            is_distracted: state.is_distracted(),
        }
    }

    /// Label of the most recent frame
    pub fn last_state(&self) -> HeadState {
        self.last_state
    }

    pub fn reset(&mut self) {
        self.last_state = HeadState::NoFace;
    }
}

impl Default for HeadPoseClassifier {
    fn default() -> Self {
        Self::new(&DmsConfig::default())
    }
}

impl FrameClassifier for HeadPoseClassifier {
    type Input = HeadMeasurement;
    type Output = HeadReading;

    fn classify(&mut self, input: &HeadMeasurement, _now_secs: f64) -> HeadReading {
        self.update(input)
    }

    fn reset(&mut self) {
        HeadPoseClassifier::reset(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn classify(yaw: f64, pitch: f64) -> HeadReading {
        HeadPoseClassifier::default().update(&HeadMeasurement::visible(yaw, pitch))
    }

    #[test]
    fn test_yaw_sign_convention() {
        assert_eq!(classify(-31.0, 0.0).state, HeadState::Left);
        assert_eq!(classify(31.0, 0.0).state, HeadState::Right);
    }

    #[test]
    fn test_pitch_directions() {
        assert_eq!(classify(29.0, 25.0).state, HeadState::Down);
        assert_eq!(classify(0.0, -25.0).state, HeadState::Up);
        assert_eq!(classify(0.0, 0.0).state, HeadState::Forward);
    }

    #[test]
    fn test_yaw_takes_priority_over_pitch() {
        let reading = classify(-40.0, 35.0);
        assert_eq!(reading.state, HeadState::Left);
        assert!(reading.is_distracted);
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        assert_eq!(classify(30.0, 20.0).state, HeadState::Forward);
        assert_eq!(classify(-30.0, -20.0).state, HeadState::Forward);
    }

    #[test]
    fn test_no_face() {
        let mut classifier = HeadPoseClassifier::default();
        classifier.update(&HeadMeasurement::visible(50.0, 0.0));
        let reading = classifier.update(&HeadMeasurement::no_face());
        assert_eq!(reading.state, HeadState::NoFace);
        assert!(!reading.is_distracted);
        assert_eq!(classifier.last_state(), HeadState::NoFace);
    }

    proptest! {
        #[test]
        fn prop_distracted_iff_not_forward(yaw in -90.0f64..90.0, pitch in -60.0f64..60.0) {
            let reading = classify(yaw, pitch);
            prop_assert_eq!(reading.is_distracted, reading.state != HeadState::Forward);
            if yaw.abs() > 30.0 {
                let expected = if yaw < 0.0 { HeadState::Left } else { HeadState::Right };
                prop_assert_eq!(reading.state, expected);
            }
        }
    }
}
