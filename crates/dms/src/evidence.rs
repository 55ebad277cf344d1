//! Phone evidence from hand and object detections
//!
//! All positions are normalized image coordinates (0..1, y grows downwards).

use serde::{Deserialize, Serialize};

use crate::config::positive;
use crate::geometry::Point2;
use crate::measurement::PhoneEvidence;
use crate::DmsError;

/// Geometry thresholds for deriving phone evidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidenceConfig {
    /// Palm-to-face-center distance below which the hand is at the face
    pub hand_face_distance: f64,
    /// Palm height above which (smaller y) the hand counts as raised
    pub hand_up_threshold: f64,
    /// Minimum detector confidence for a phone-like object
    pub object_confidence: f64,
    /// Margin added on every side of an object box for the hand-near test
    pub object_margin: f64,
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            hand_face_distance: 0.3,
            hand_up_threshold: 0.6,
            object_confidence: 0.28,
            object_margin: 0.04,
        }
    }
}

impl EvidenceConfig {
    pub fn validate(&self) -> Result<(), DmsError> {
        positive("hand_face_distance", self.hand_face_distance)?;
        positive("hand_up_threshold", self.hand_up_threshold)?;
        if !(0.0..=1.0).contains(&self.object_confidence) {
            return Err(DmsError::Config(format!(
                "object_confidence ({}) must be within [0, 1]",
                self.object_confidence
            )));
        }
        if !self.object_margin.is_finite() || self.object_margin < 0.0 {
            return Err(DmsError::Config(format!(
                "object_margin ({}) must be non-negative",
                self.object_margin
            )));
        }
        Ok(())
    }
}

/// Axis-aligned box of a detected phone-like object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectBox {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
    pub confidence: f64,
}

impl ObjectBox {
    /// Whether `point` lies strictly inside the box grown by `margin`
    pub fn contains_with_margin(&self, point: &Point2, margin: f64) -> bool {
        point.x > self.x_min - margin
            && point.x < self.x_max + margin
            && point.y > self.y_min - margin
            && point.y < self.y_max + margin
    }
}

/// Raw detections for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneDetections {
    /// Palm centers of every detected hand
    pub palms: Vec<Point2>,
    /// Phone-like objects
    pub objects: Vec<ObjectBox>,
    /// Face center (nose tip) when a face was found
    pub face_center: Option<Point2>,
}

impl PhoneEvidence {
    /// Reduce raw detections to the boolean cues the fusion classifier uses
    pub fn from_detections(detections: &PhoneDetections, config: &EvidenceConfig) -> Self {
        let objects: Vec<&ObjectBox> = detections
            .objects
            .iter()
            .filter(|o| o.confidence >= config.object_confidence)
            .collect();
        let palms = &detections.palms;

        let hand_near_face = detections.face_center.map_or(false, |face| {
            palms
                .iter()
                .any(|palm| palm.distance(&face) < config.hand_face_distance)
        });

        let hand_near_object = palms.iter().any(|palm| {
            objects
                .iter()
                .any(|object| object.contains_with_margin(palm, config.object_margin))
        });

        Self {
            object_detected: !objects.is_empty(),
            hand_detected: !palms.is_empty(),
            hand_near_face,
            hand_near_object,
            hand_raised: palms.iter().any(|palm| palm.y < config.hand_up_threshold),
        }
    }
}
