//! Driver state labels and per-channel readings

use std::fmt;

use serde::{Deserialize, Serialize};

/// Eye channel state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EyeState {
    #[default]
    NoFace,
    Open,
    Closed,
    Microsleep,
}

impl EyeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EyeState::NoFace => "NO_FACE",
            EyeState::Open => "OPEN",
            EyeState::Closed => "CLOSED",
            EyeState::Microsleep => "MICROSLEEP",
        }
    }
}

/// Head direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HeadState {
    #[default]
    NoFace,
    Forward,
    Left,
    Right,
    Up,
    Down,
}

impl HeadState {
    /// True for every direction other than forward; a missing face is not a distraction
    pub fn is_distracted(&self) -> bool {
        !matches!(self, HeadState::NoFace | HeadState::Forward)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HeadState::NoFace => "NO_FACE",
            HeadState::Forward => "FORWARD",
            HeadState::Left => "LEFT",
            HeadState::Right => "RIGHT",
            HeadState::Up => "UP",
            HeadState::Down => "DOWN",
        }
    }
}

/// Mouth channel state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MouthState {
    #[default]
    NoFace,
    Closed,
    Open,
    WideOpen,
    Yawning,
}

impl MouthState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MouthState::NoFace => "NO_FACE",
            MouthState::Closed => "CLOSED",
            MouthState::Open => "OPEN",
            MouthState::WideOpen => "WIDE_OPEN",
            MouthState::Yawning => "YAWNING",
        }
    }
}

/// Phone handling state, ordered by severity
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhoneState {
    #[default]
    NoPhone,
    HandUp,
    PhoneVisible,
    LikelyPhone,
    PhoneUsage,
}

impl PhoneState {
    /// All states in severity order
    pub const ALL: [PhoneState; 5] = [
        PhoneState::NoPhone,
        PhoneState::HandUp,
        PhoneState::PhoneVisible,
        PhoneState::LikelyPhone,
        PhoneState::PhoneUsage,
    ];

    /// States that count towards usage confirmation
    pub fn is_usage(&self) -> bool {
        matches!(self, PhoneState::PhoneUsage | PhoneState::LikelyPhone)
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhoneState::NoPhone => "NO_PHONE",
            PhoneState::HandUp => "HAND_UP",
            PhoneState::PhoneVisible => "PHONE_VISIBLE",
            PhoneState::LikelyPhone => "LIKELY_PHONE",
            PhoneState::PhoneUsage => "PHONE_USAGE",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(EyeState, HeadState, MouthState, PhoneState);

/// Output of the eye classifier for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EyeReading {
    pub state: EyeState,
    /// Eye aspect ratio of the frame (0 without a face)
    pub ear: f64,
    /// Time since the current closure started (0 when open or no face)
    pub closed_duration_secs: f64,
}

impl EyeReading {
    pub fn is_microsleep(&self) -> bool {
        self.state == EyeState::Microsleep
    }
}

/// Output of the head pose classifier for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeadReading {
    pub state: HeadState,
    pub yaw_degrees: f64,
    pub pitch_degrees: f64,
    pub is_distracted: bool,
}

/// Output of the mouth classifier for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MouthReading {
    pub state: MouthState,
    /// Mouth aspect ratio of the frame (0 without a face)
    pub mar: f64,
    /// Time the mouth has been wide open (0 otherwise)
    pub yawn_duration_secs: f64,
}

impl MouthReading {
    pub fn is_yawning(&self) -> bool {
        self.state == MouthState::Yawning
    }
}

/// One phone classification, raw or smoothed
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PhoneUsageSample {
    pub state: PhoneState,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Whether `state` counts towards usage confirmation
    pub is_usage: bool,
}

impl PhoneUsageSample {
    pub fn new(state: PhoneState, confidence: f64) -> Self {
        Self {
            state,
            confidence,
            is_usage: state.is_usage(),
        }
    }
}
