//! Eye closure and microsleep detection

use tracing::debug;

use crate::classifier::FrameClassifier;
use crate::config::DmsConfig;
use crate::measurement::EyeMeasurement;
use crate::state::{EyeReading, EyeState};

/// EAR-based closure tracker.
///
/// A closure becomes microsleep after `closed_frames_threshold` consecutive
/// sub-threshold frames. Frames without a face report `NoFace` and leave the
/// running closure untouched, so a short tracking dropout does not restart it.
#[derive(Debug, Clone)]
pub struct EyeStateClassifier {
    ear_threshold: f64,
    closed_frames_threshold: u32,
    consecutive_closed_frames: u32,
    closed_since: Option<f64>,
}

impl EyeStateClassifier {
    pub fn new(config: &DmsConfig) -> Self {
        Self {
            ear_threshold: config.ear_threshold,
            closed_frames_threshold: config.closed_frames_threshold,
            consecutive_closed_frames: 0,
            closed_since: None,
        }
    }

    /// Classify one frame
    pub fn update(&mut self, measurement: &EyeMeasurement, now_secs: f64) -> EyeReading {
        if !measurement.face_visible {
            return EyeReading::default();
        }

        if measurement.ear < self.ear_threshold {
            let since = *self.closed_since.get_or_insert(now_secs);
            self.consecutive_closed_frames = self.consecutive_closed_frames.saturating_add(1);
            let closed_duration_secs = now_secs - since;

            let state = if self.consecutive_closed_frames >= self.closed_frames_threshold {
                if self.consecutive_closed_frames == self.closed_frames_threshold {
                    debug!(
                        frames = self.consecutive_closed_frames,
                        duration_secs = closed_duration_secs,
                        "Microsleep onset"
                    );
                }
                EyeState::Microsleep
            } else {
                EyeState::Closed
            };

            EyeReading {
                state,
                ear: measurement.ear,
                closed_duration_secs,
            }
        } else {
            self.consecutive_closed_frames = 0;
            self.closed_since = None;
            EyeReading {
                state: EyeState::Open,
                ear: measurement.ear,
                closed_duration_secs: 0.0,
            }
        }
    }

    /// Consecutive closed frames in the running closure
    pub fn consecutive_closed_frames(&self) -> u32 {
        self.consecutive_closed_frames
    }

    /// Timestamp at which the running closure started
    pub fn closed_since(&self) -> Option<f64> {
        self.closed_since
    }

    pub fn reset(&mut self) {
        self.consecutive_closed_frames = 0;
        self.closed_since = None;
    }
}

impl Default for EyeStateClassifier {
    fn default() -> Self {
        Self::new(&DmsConfig::default())
    }
}

impl FrameClassifier for EyeStateClassifier {
    type Input = EyeMeasurement;
    type Output = EyeReading;

    fn classify(&mut self, input: &EyeMeasurement, now_secs: f64) -> EyeReading {
        self.update(input, now_secs)
    }

    fn reset(&mut self) {
        EyeStateClassifier::reset(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FRAME_SECS: f64 = 1.0 / 30.0;

    fn closed() -> EyeMeasurement {
        EyeMeasurement::visible(0.15)
    }

    #[test]
    fn test_open_eyes() {
        let mut classifier = EyeStateClassifier::default();
        let reading = classifier.update(&EyeMeasurement::visible(0.3), 0.0);
        assert_eq!(reading.state, EyeState::Open);
        assert_eq!(reading.closed_duration_secs, 0.0);
    }

    #[test]
    fn test_microsleep_on_45th_frame() {
        let mut classifier = EyeStateClassifier::default();

        for i in 0..44 {
            let reading = classifier.update(&closed(), i as f64 * FRAME_SECS);
            assert_eq!(reading.state, EyeState::Closed, "frame {}", i + 1);
        }

        let reading = classifier.update(&closed(), 44.0 * FRAME_SECS);
        assert_eq!(reading.state, EyeState::Microsleep);
        assert!((reading.closed_duration_secs - 44.0 * FRAME_SECS).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut classifier = EyeStateClassifier::default();
        assert_eq!(
            classifier.update(&EyeMeasurement::visible(0.21), 0.0).state,
            EyeState::Open
        );
    }

    #[test]
    fn test_open_frame_resets_closure() {
        let mut classifier = EyeStateClassifier::default();
        for i in 0..44 {
            classifier.update(&closed(), i as f64 * FRAME_SECS);
        }
        classifier.update(&EyeMeasurement::visible(0.3), 2.0);
        assert_eq!(classifier.consecutive_closed_frames(), 0);
        assert_eq!(classifier.closed_since(), None);

        let reading = classifier.update(&closed(), 3.0);
        assert_eq!(reading.state, EyeState::Closed);
        assert_eq!(reading.closed_duration_secs, 0.0);
    }

    #[test]
    fn test_no_face_keeps_running_closure() {
        let mut classifier = EyeStateClassifier::default();
        for i in 0..44 {
            classifier.update(&closed(), i as f64 * FRAME_SECS);
        }

        let reading = classifier.update(&EyeMeasurement::no_face(), 44.0 * FRAME_SECS);
        assert_eq!(reading.state, EyeState::NoFace);
        assert_eq!(classifier.consecutive_closed_frames(), 44);
        assert_eq!(classifier.closed_since(), Some(0.0));

        // The dropout frame does not count, the next closed frame is the 45th
        let reading = classifier.update(&closed(), 45.0 * FRAME_SECS);
        assert_eq!(reading.state, EyeState::Microsleep);
        assert!((reading.closed_duration_secs - 45.0 * FRAME_SECS).abs() < 1e-9);
    }

    #[test]
    fn test_trait_reset() {
        let mut classifier = EyeStateClassifier::default();
        classifier.classify(&closed(), 0.0);
        FrameClassifier::reset(&mut classifier);
        assert_eq!(classifier.consecutive_closed_frames(), 0);
    }

    proptest! {
        #[test]
        fn prop_microsleep_exactly_at_threshold(threshold in 1u32..120, extra in 0u32..20) {
            let config = DmsConfig { closed_frames_threshold: threshold, ..Default::default() };
            let mut classifier = EyeStateClassifier::new(&config);

            for frame in 1..=(threshold + extra) {
                let reading = classifier.update(&closed(), frame as f64 * FRAME_SECS);
                if frame < threshold {
                    prop_assert_eq!(reading.state, EyeState::Closed);
                } else {
                    prop_assert_eq!(reading.state, EyeState::Microsleep);
                }
            }
        }
    }
}
