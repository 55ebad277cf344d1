//! Mouth opening and yawn detection

use tracing::debug;

use crate::classifier::FrameClassifier;
use crate::config::DmsConfig;
use crate::measurement::MouthMeasurement;
use crate::state::{MouthReading, MouthState};

/// MAR-based yawn tracker.
///
/// Unlike eye closure, a yawn is confirmed on elapsed time rather than a
/// frame count. Frames without a face report `NoFace` and freeze the timer.
#[derive(Debug, Clone)]
pub struct MouthStateClassifier {
    yawn_threshold: f64,
    open_threshold: f64,
    yawn_duration_secs: f64,
    wide_open_since: Option<f64>,
    yawn_reported: bool,
}

impl MouthStateClassifier {
    pub fn new(config: &DmsConfig) -> Self {
        Self {
            yawn_threshold: config.yawn_mar_threshold,
            open_threshold: config.open_mar_threshold,
            yawn_duration_secs: config.yawn_duration_secs,
            wide_open_since: None,
            yawn_reported: false,
        }
    }

    /// Classify one frame
    pub fn update(&mut self, measurement: &MouthMeasurement, now_secs: f64) -> MouthReading {
        if !measurement.face_visible {
            return MouthReading::default();
        }

        let mar = measurement.mar;

        if mar > self.yawn_threshold {
            let since = *self.wide_open_since.get_or_insert(now_secs);
            let elapsed = now_secs - since;

            let state = if elapsed >= self.yawn_duration_secs {
                if !self.yawn_reported {
                    debug!(duration_secs = elapsed, mar, "Yawn confirmed");
                    self.yawn_reported = true;
                }
                MouthState::Yawning
            } else {
                MouthState::WideOpen
            };

            return MouthReading {
                state,
                mar,
                yawn_duration_secs: elapsed,
            };
        }

        self.wide_open_since = None;
        self.yawn_reported = false;

        let state = if mar > self.open_threshold {
            MouthState::Open
        } else {
            MouthState::Closed
        };

        MouthReading {
            state,
            mar,
            yawn_duration_secs: 0.0,
        }
    }

    /// Timestamp at which the mouth opened wide, if it still is
    pub fn wide_open_since(&self) -> Option<f64> {
        self.wide_open_since
    }

    pub fn reset(&mut self) {
        self.wide_open_since = None;
        self.yawn_reported = false;
    }
}

impl Default for MouthStateClassifier {
    fn default() -> Self {
        Self::new(&DmsConfig::default())
    }
}

impl FrameClassifier for MouthStateClassifier {
    type Input = MouthMeasurement;
    type Output = MouthReading;

    fn classify(&mut self, input: &MouthMeasurement, now_secs: f64) -> MouthReading {
        self.update(input, now_secs)
    }

    fn reset(&mut self) {
        MouthStateClassifier::reset(self);
    }
}
