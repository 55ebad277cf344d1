//! Landmark geometry: EAR, MAR and a coarse head pose
//!
//! These turn landmark positions from a face-mesh provider into the scalar
//! measurements the classifiers consume. Degenerate geometry (zero-length
//! reference distances) yields 0 rather than a division by zero.

use serde::{Deserialize, Serialize};

use crate::measurement::{EyeMeasurement, HeadMeasurement, MouthMeasurement};

/// 2-D landmark position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn midpoint(&self, other: &Point2) -> Point2 {
        Point2::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Head rotation estimate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeadAngles {
    pub yaw: f64,
    pub pitch: f64,
}

/// Eye aspect ratio from six eyelid landmarks.
///
/// Points are ordered outer corner, two upper lid points, inner corner, two
/// lower lid points: `(|p1-p5| + |p2-p4|) / (2 * |p0-p3|)`.
pub fn eye_aspect_ratio(points: &[Point2; 6]) -> f64 {
    let horizontal = points[0].distance(&points[3]);
    if horizontal <= 0.0 {
        return 0.0;
    }
    let a = points[1].distance(&points[5]);
    let b = points[2].distance(&points[4]);
    (a + b) / (2.0 * horizontal)
}

/// Mean EAR of both eyes
pub fn average_ear(left: &[Point2; 6], right: &[Point2; 6]) -> f64 {
    (eye_aspect_ratio(left) + eye_aspect_ratio(right)) / 2.0
}

/// Mouth aspect ratio: mean inner-lip opening over mouth width
pub fn mouth_aspect_ratio(verticals: &[(Point2, Point2)], left: Point2, right: Point2) -> f64 {
    let horizontal = left.distance(&right);
    if horizontal <= 0.0 || verticals.is_empty() {
        return 0.0;
    }
    let total: f64 = verticals.iter().map(|(top, bottom)| top.distance(bottom)).sum();
    (total / verticals.len() as f64) / horizontal
}

/// Coarse yaw/pitch from four landmarks.
///
/// Yaw comes from the asymmetry of the eye-to-nose distances and is negative
/// when the nose sits closer to the left eye (head turned left). Pitch comes
/// from the ratio of eye-to-nose over nose-to-chin distance (0.4 when level).
pub fn estimate_head_pose(
    nose: Point2,
    chin: Point2,
    left_eye: Point2,
    right_eye: Point2,
) -> HeadAngles {
    let left = left_eye.distance(&nose);
    let right = right_eye.distance(&nose);
    let mean = (left + right) / 2.0;
    let yaw = if mean > 0.0 {
        (left - right) / mean * 50.0
    } else {
        0.0
    };

    let nose_to_chin = nose.distance(&chin);
    let eye_to_nose = left_eye.midpoint(&right_eye).distance(&nose);
    let pitch = if nose_to_chin > 0.0 {
        (eye_to_nose / nose_to_chin - 0.4) * 100.0
    } else {
        0.0
    };

    HeadAngles { yaw, pitch }
}

impl EyeMeasurement {
    /// Measurement from both eyes' landmarks
    pub fn from_landmarks(left: &[Point2; 6], right: &[Point2; 6]) -> Self {
        Self::visible(average_ear(left, right))
    }
}

impl MouthMeasurement {
    /// Measurement from inner-lip pairs and the mouth corners
    pub fn from_landmarks(verticals: &[(Point2, Point2)], left: Point2, right: Point2) -> Self {
        Self::visible(mouth_aspect_ratio(verticals, left, right))
    }
}

impl HeadMeasurement {
    /// Measurement from nose tip, chin and outer eye corners
    pub fn from_landmarks(nose: Point2, chin: Point2, left_eye: Point2, right_eye: Point2) -> Self {
        let angles = estimate_head_pose(nose, chin, left_eye, right_eye);
        Self::visible(angles.yaw, angles.pitch)
    }
}
