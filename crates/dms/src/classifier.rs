//! Per-frame classifier capability

/// A classifier fed one measurement per frame together with the frame's
/// monotonic timestamp in seconds.
///
/// Implementations own their temporal state privately; one instance serves
/// exactly one monitored stream. Channels that are stateless in time ignore
/// `now_secs`.
pub trait FrameClassifier {
    type Input;
    type Output;

    /// Classify one frame
    fn classify(&mut self, input: &Self::Input, now_secs: f64) -> Self::Output;

    /// Drop all temporal state, as at session start
    fn reset(&mut self);
}
