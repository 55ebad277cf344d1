//! Edge-triggered session accumulation

use dms::{EyeReading, HeadReading, MouthReading, PhoneState, PhoneUsageSample};
use event_fusion::FrameAnalysis;
use tracing::debug;

use crate::statistics::{Incident, SessionStatistics};
use crate::summary::SessionSummary;

/// Accumulates [`SessionStatistics`] from one frame verdict at a time.
///
/// An incident is counted when it starts (false to true) and its time is
/// added when it ends (true to false), measured with the caller's clock.
#[derive(Debug, Clone, Default)]
pub struct SessionStatisticsAccumulator {
    stats: SessionStatistics,
    /// Start timestamp of each incident currently in progress
    active_since: [Option<f64>; 4],
    first_frame_secs: Option<f64>,
    last_frame_secs: Option<f64>,
}

impl SessionStatisticsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame, returning the incidents that started on it
    pub fn record(
        &mut self,
        analysis: &FrameAnalysis,
        eye: &EyeReading,
        head: &HeadReading,
        phone: &PhoneUsageSample,
        mouth: &MouthReading,
        now_secs: f64,
    ) -> Vec<Incident> {
        self.first_frame_secs.get_or_insert(now_secs);
        self.last_frame_secs = Some(now_secs);

        self.stats.risk_frames.increment(analysis.risk_level);

        let mut started = Vec::new();
        for incident in Incident::ALL {
            let active = match incident {
                Incident::Microsleep => eye.is_microsleep(),
                Incident::Distraction => head.is_distracted,
                Incident::PhoneUsage => phone.state == PhoneState::PhoneUsage,
                Incident::Yawning => mouth.is_yawning(),
            };
            if self.track(incident, active, now_secs) {
                started.push(incident);
            }
        }

        self.stats.total_frames = self.stats.total_frames.saturating_add(1);
        started
    }

    /// Apply one frame's condition; true on a rising edge
    fn track(&mut self, incident: Incident, active: bool, now_secs: f64) -> bool {
        let slot = &mut self.active_since[incident.index()];
        match (*slot, active) {
            (None, true) => {
                *slot = Some(now_secs);
                let stats = self.stats.incident_mut(incident);
                stats.events = stats.events.saturating_add(1);
                debug!(%incident, at_secs = now_secs, "Incident started");
                true
            }
            (Some(since), false) => {
                *slot = None;
                let elapsed = now_secs - since;
                self.stats.incident_mut(incident).duration_secs += elapsed;
                debug!(%incident, duration_secs = elapsed, "Incident ended");
                false
            }
            _ => false,
        }
    }

    /// Whether an incident is currently in progress
    pub fn is_active(&self, incident: Incident) -> bool {
        self.active_since[incident.index()].is_some()
    }

    /// Current counters
    pub fn statistics(&self) -> &SessionStatistics {
        &self.stats
    }

    /// Copy of the current counters
    pub fn snapshot(&self) -> SessionStatistics {
        self.stats.clone()
    }

    /// Time between the first and the latest recorded frame
    pub fn session_duration_secs(&self) -> f64 {
        match (self.first_frame_secs, self.last_frame_secs) {
            (Some(first), Some(last)) => (last - first).max(0.0),
            _ => 0.0,
        }
    }

    /// Safety score over the frames recorded so far
    pub fn safety_score(&self) -> f64 {
        self.stats.safety_score(self.session_duration_secs())
    }

    /// Summary of the frames recorded so far
    pub fn summary(&self) -> SessionSummary {
        SessionSummary::new(self.snapshot(), self.session_duration_secs())
    }

    /// Close incidents still in progress at `now_secs` and return the final summary
    pub fn finish(&mut self, now_secs: f64) -> SessionSummary {
        for incident in Incident::ALL {
            self.track(incident, false, now_secs);
        }
        if let Some(last) = self.last_frame_secs {
            self.last_frame_secs = Some(last.max(now_secs));
        }
        self.summary()
    }

    /// Start a new session
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
