//! Per-frame measurements produced by the perception providers

use serde::{Deserialize, Serialize};

/// Eye openness for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EyeMeasurement {
    /// Eye aspect ratio averaged over both eyes
    pub ear: f64,
    /// Whether a face was found in the frame
    pub face_visible: bool,
}

impl EyeMeasurement {
    pub fn visible(ear: f64) -> Self {
        Self {
            ear,
            face_visible: true,
        }
    }

    pub fn no_face() -> Self {
        Self::default()
    }
}

/// Head rotation for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeadMeasurement {
    /// Horizontal rotation in degrees, negative towards the driver's left
    pub yaw_degrees: f64,
    /// Vertical rotation in degrees, negative when looking up
    pub pitch_degrees: f64,
    pub face_visible: bool,
}

impl HeadMeasurement {
    pub fn visible(yaw_degrees: f64, pitch_degrees: f64) -> Self {
        Self {
            yaw_degrees,
            pitch_degrees,
            face_visible: true,
        }
    }

    pub fn no_face() -> Self {
        Self::default()
    }
}

/// Mouth openness for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MouthMeasurement {
    /// Mouth aspect ratio
    pub mar: f64,
    pub face_visible: bool,
}

impl MouthMeasurement {
    pub fn visible(mar: f64) -> Self {
        Self {
            mar,
            face_visible: true,
        }
    }

    pub fn no_face() -> Self {
        Self::default()
    }
}

/// Boolean cues for phone handling, derived from hand and object detections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneEvidence {
    /// A phone-like object was detected
    pub object_detected: bool,
    /// At least one hand was detected
    pub hand_detected: bool,
    /// A palm is close to the face center
    pub hand_near_face: bool,
    /// A palm is inside the expanded bounding box of a detected object
    pub hand_near_object: bool,
    /// A palm is above the raised-hand line
    pub hand_raised: bool,
}

impl PhoneEvidence {
    /// Evidence with nothing detected
    pub fn none() -> Self {
        Self::default()
    }
}
