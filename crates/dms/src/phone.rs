//! Phone usage fusion with temporal confirmation
//!
//! Every frame the hand/object evidence is mapped to an instantaneous
//! classification by fixed priority rules. The sample joins a bounded window,
//! and the reported state only reaches the usage levels once enough of the
//! window agrees, so a single raised hand does not flash a phone alert.

use ring_buffer::RingBuffer;
use tracing::debug;

use crate::classifier::FrameClassifier;
use crate::config::DmsConfig;
use crate::measurement::PhoneEvidence;
use crate::state::{PhoneState, PhoneUsageSample};

const OBJECT_WITH_HAND_CONFIDENCE: f64 = 0.95;
const OBJECT_WITH_RAISED_HAND_CONFIDENCE: f64 = 0.85;
const HAND_AT_FACE_CONFIDENCE: f64 = 0.65;
const OBJECT_ONLY_CONFIDENCE: f64 = 0.40;
const HAND_UP_CONFIDENCE: f64 = 0.30;

/// Unconfirmed classifications are reported at half confidence
const UNCONFIRMED_CONFIDENCE_FACTOR: f64 = 0.5;

/// Instantaneous classification of one frame's evidence (first rule wins)
pub fn classify_evidence(evidence: &PhoneEvidence) -> PhoneUsageSample {
    let (state, confidence) = if evidence.object_detected && evidence.hand_near_object {
        (PhoneState::PhoneUsage, OBJECT_WITH_HAND_CONFIDENCE)
    } else if evidence.object_detected && evidence.hand_raised {
        (PhoneState::PhoneUsage, OBJECT_WITH_RAISED_HAND_CONFIDENCE)
    } else if evidence.hand_near_face && evidence.hand_raised {
        (PhoneState::LikelyPhone, HAND_AT_FACE_CONFIDENCE)
    } else if evidence.object_detected {
        (PhoneState::PhoneVisible, OBJECT_ONLY_CONFIDENCE)
    } else if evidence.hand_raised && evidence.hand_detected {
        (PhoneState::HandUp, HAND_UP_CONFIDENCE)
    } else {
        (PhoneState::NoPhone, 0.0)
    };

    PhoneUsageSample::new(state, confidence)
}

/// Multi-evidence phone classifier with a majority-vote confirmation window
#[derive(Debug, Clone)]
pub struct PhoneUsageFusionClassifier {
    history: RingBuffer<PhoneUsageSample>,
    min_samples: usize,
    confirmation_threshold: f64,
    confirmed: bool,
}

impl PhoneUsageFusionClassifier {
    /// # Panics
    /// Panics if `config.phone_history_size` is zero; run
    /// [`DmsConfig::validate`] first for untrusted configs.
    pub fn new(config: &DmsConfig) -> Self {
        Self {
            history: RingBuffer::new(config.phone_history_size),
            min_samples: config.phone_min_samples,
            confirmation_threshold: config.phone_confirmation_threshold,
            confirmed: false,
        }
    }

    /// Classify one frame and return the smoothed, externally visible sample
    pub fn update(&mut self, evidence: &PhoneEvidence) -> PhoneUsageSample {
        let current = classify_evidence(evidence);
        self.history.push(current);

        if self.history.len() < self.min_samples {
            return Self::unconfirmed(current.state, current.confidence);
        }

        let usage_ratio = self.usage_ratio();
        if usage_ratio >= self.confirmation_threshold {
            let state = self.window_mode();
            let confidence = self.window_mean_confidence();
            if !self.confirmed {
                debug!(%state, usage_ratio, confidence, "Phone usage confirmed");
                self.confirmed = true;
            }
            return PhoneUsageSample::new(state, confidence);
        }

        self.confirmed = false;
        let state = if current.is_usage {
            PhoneState::HandUp
        } else {
            current.state
        };
        Self::unconfirmed(state, current.confidence)
    }

    fn unconfirmed(state: PhoneState, raw_confidence: f64) -> PhoneUsageSample {
        PhoneUsageSample::new(state, raw_confidence * UNCONFIRMED_CONFIDENCE_FACTOR)
    }

    /// Fraction of usage samples in the window (0 when empty)
    pub fn usage_ratio(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }
        let usage = self.history.iter().filter(|s| s.is_usage).count();
        usage as f64 / self.history.len() as f64
    }

    /// Most frequent state in the window, ties going to the state seen first
    fn window_mode(&self) -> PhoneState {
        let mut counts = [0usize; PhoneState::ALL.len()];
        for sample in self.history.iter() {
            counts[sample.state.index()] += 1;
        }

        let mut best = PhoneState::NoPhone;
        let mut best_count = 0;
        for sample in self.history.iter() {
            let count = counts[sample.state.index()];
            if count > best_count {
                best = sample.state;
                best_count = count;
            }
        }
        best
    }

    fn window_mean_confidence(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }
        let total: f64 = self.history.iter().map(|s| s.confidence).sum();
        total / self.history.len() as f64
    }

    /// Raw samples in the window, oldest first
    pub fn history(&self) -> impl Iterator<Item = &PhoneUsageSample> + '_ {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.confirmed = false;
    }
}

impl Default for PhoneUsageFusionClassifier {
    fn default() -> Self {
        Self::new(&DmsConfig::default())
    }
}

impl FrameClassifier for PhoneUsageFusionClassifier {
    type Input = PhoneEvidence;
    type Output = PhoneUsageSample;

    fn classify(&mut self, input: &PhoneEvidence, _now_secs: f64) -> PhoneUsageSample {
        self.update(input)
    }

    fn reset(&mut self) {
        PhoneUsageFusionClassifier::reset(self);
    }
}
