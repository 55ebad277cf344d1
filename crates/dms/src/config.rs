//! DMS configuration

use serde::{Deserialize, Serialize};

use crate::DmsError;

/// Classifier thresholds for the eye, head, mouth and phone channels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DmsConfig {
    /// EAR below which the eyes count as closed
    pub ear_threshold: f64,

    /// Consecutive closed frames before a closure is reported as microsleep.
    ///
    /// This is a frame count, so the dwell time it represents depends on the
    /// camera rate (45 frames is ~1.5s at 30fps, 3s at 15fps).
    pub closed_frames_threshold: u32,

    /// Yaw magnitude beyond which the driver is looking left/right (degrees)
    pub yaw_threshold_degrees: f64,

    /// Pitch magnitude beyond which the driver is looking up/down (degrees)
    pub pitch_threshold_degrees: f64,

    /// MAR above which the mouth is wide open (yawn candidate)
    pub yawn_mar_threshold: f64,

    /// MAR above which the mouth counts as open
    pub open_mar_threshold: f64,

    /// Wide-open time before a yawn is confirmed (seconds)
    pub yawn_duration_secs: f64,

    /// Phone confirmation window size (samples)
    pub phone_history_size: usize,

    /// Samples required before the confirmation window is consulted
    pub phone_min_samples: usize,

    /// Fraction of usage samples in the window needed to confirm usage
    pub phone_confirmation_threshold: f64,
}

impl Default for DmsConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.21,
            closed_frames_threshold: 45,
            yaw_threshold_degrees: 30.0,
            pitch_threshold_degrees: 20.0,
            yawn_mar_threshold: 0.4,
            open_mar_threshold: 0.1,
            yawn_duration_secs: 2.0,
            phone_history_size: 10,
            phone_min_samples: 5,
            phone_confirmation_threshold: 0.6,
        }
    }
}

impl DmsConfig {
    /// Create strict config (lower thresholds)
    pub fn strict() -> Self {
        Self {
            closed_frames_threshold: 30,
            yaw_threshold_degrees: 20.0,
            pitch_threshold_degrees: 15.0,
            yawn_duration_secs: 1.5,
            phone_confirmation_threshold: 0.5,
            ..Default::default()
        }
    }

    /// Create lenient config (higher thresholds)
    pub fn lenient() -> Self {
        Self {
            closed_frames_threshold: 60,
            yaw_threshold_degrees: 45.0,
            pitch_threshold_degrees: 30.0,
            yawn_duration_secs: 3.0,
            phone_confirmation_threshold: 0.7,
            ..Default::default()
        }
    }

    /// Check that the thresholds describe a usable classifier set
    pub fn validate(&self) -> Result<(), DmsError> {
        positive("ear_threshold", self.ear_threshold)?;
        positive("yaw_threshold_degrees", self.yaw_threshold_degrees)?;
        positive("pitch_threshold_degrees", self.pitch_threshold_degrees)?;
        positive("yawn_mar_threshold", self.yawn_mar_threshold)?;
        positive("open_mar_threshold", self.open_mar_threshold)?;
        positive("yawn_duration_secs", self.yawn_duration_secs)?;

        if self.closed_frames_threshold == 0 {
            return Err(DmsError::Config(
                "closed_frames_threshold must be at least 1".into(),
            ));
        }
        if self.open_mar_threshold >= self.yawn_mar_threshold {
            return Err(DmsError::Config(format!(
                "open_mar_threshold ({}) must be below yawn_mar_threshold ({})",
                self.open_mar_threshold, self.yawn_mar_threshold
            )));
        }
        if self.phone_history_size == 0 {
            return Err(DmsError::Config(
                "phone_history_size must be at least 1".into(),
            ));
        }
        if self.phone_min_samples == 0 || self.phone_min_samples > self.phone_history_size {
            return Err(DmsError::Config(format!(
                "phone_min_samples ({}) must be within 1..={}",
                self.phone_min_samples, self.phone_history_size
            )));
        }
        if !(self.phone_confirmation_threshold > 0.0 && self.phone_confirmation_threshold <= 1.0) {
            return Err(DmsError::Config(format!(
                "phone_confirmation_threshold ({}) must be within (0, 1]",
                self.phone_confirmation_threshold
            )));
        }

        Ok(())
    }
}

pub(crate) fn positive(field: &str, value: f64) -> Result<(), DmsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DmsError::Config(format!("{field} must be positive and finite, got {value}")))
    }
}
