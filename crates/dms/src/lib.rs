//! Driver Monitoring System (DMS) classifiers
//!
//! Per-channel driver state from already-extracted measurements:
//! - Eye closure and microsleep (EAR, frame-count debounce)
//! - Head direction (yaw/pitch thresholds)
//! - Mouth opening and yawning (MAR, time debounce)
//! - Phone usage (multi-evidence fusion with a confirmation window)
//!
//! Every classifier is an owned value fed one measurement per frame with the
//! frame's monotonic timestamp. Nothing here reads a clock or does I/O.

pub mod classifier;
pub mod config;
pub mod evidence;
pub mod eye;
pub mod geometry;
pub mod head;
pub mod measurement;
pub mod mouth;
pub mod phone;
pub mod state;

pub use classifier::FrameClassifier;
pub use config::DmsConfig;
pub use evidence::{EvidenceConfig, ObjectBox, PhoneDetections};
pub use eye::EyeStateClassifier;
pub use geometry::{HeadAngles, Point2};
pub use head::HeadPoseClassifier;
pub use measurement::{EyeMeasurement, HeadMeasurement, MouthMeasurement, PhoneEvidence};
pub use mouth::MouthStateClassifier;
pub use phone::{classify_evidence, PhoneUsageFusionClassifier};
pub use state::{
    EyeReading, EyeState, HeadReading, HeadState, MouthReading, MouthState, PhoneState,
    PhoneUsageSample,
};

use thiserror::Error;

/// DMS error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DmsError {
    #[error("Configuration error: {0}")]
    Config(String),
}

/// The four channel classifiers of one monitored stream
#[derive(Debug, Clone)]
pub struct DmsModule {
    pub eye: EyeStateClassifier,
    pub head: HeadPoseClassifier,
    pub mouth: MouthStateClassifier,
    pub phone: PhoneUsageFusionClassifier,
}

impl DmsModule {
    /// Create the classifier set after validating the configuration
    pub fn new(config: &DmsConfig) -> Result<Self, DmsError> {
        config.validate()?;
        Ok(Self {
            eye: EyeStateClassifier::new(config),
            head: HeadPoseClassifier::new(config),
            mouth: MouthStateClassifier::new(config),
            phone: PhoneUsageFusionClassifier::new(config),
        })
    }

    /// Reset driver state (on driver change)
    pub fn reset_state(&mut self) {
        self.eye.reset();
        self.head.reset();
        self.mouth.reset();
        self.phone.reset();
    }
}
