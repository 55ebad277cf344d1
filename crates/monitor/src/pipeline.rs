//! Per-frame monitoring pipeline

use chrono::{DateTime, Utc};
use dms::{
    DmsModule, EvidenceConfig, EyeMeasurement, EyeReading, FrameClassifier, HeadMeasurement,
    HeadReading, MouthMeasurement, MouthReading, PhoneDetections, PhoneEvidence,
    PhoneUsageSample,
};
use event_fusion::{FrameAnalysis, RiskAggregator, RiskLevel};
use serde::{Deserialize, Serialize};
use session_stats::{Incident, SessionStatisticsAccumulator, SessionSummary};
use storage::FrameRecord;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::MonitorConfig;
use crate::report::SessionReport;
use crate::MonitorError;

/// Measurements of one frame, as produced by the perception providers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Monotonic frame time (seconds)
    pub timestamp_secs: f64,
    #[serde(default)]
    pub eye: EyeMeasurement,
    #[serde(default)]
    pub head: HeadMeasurement,
    #[serde(default)]
    pub mouth: MouthMeasurement,
    /// Precomputed phone cues
    #[serde(default)]
    pub phone: PhoneEvidence,
    /// Raw hand/object detections; when present they replace `phone`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detections: Option<PhoneDetections>,
}

/// Result of processing one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub eye: EyeReading,
    pub head: HeadReading,
    pub phone: PhoneUsageSample,
    pub mouth: MouthReading,
    pub analysis: FrameAnalysis,
    /// Incidents that began on this frame
    pub started: Vec<Incident>,
    pub record: FrameRecord,
}

/// Monitoring state of one driver/camera stream.
///
/// Owns the classifiers, the aggregator and the session accumulator. Not
/// shared: run one per stream.
pub struct DriverMonitor {
    session_id: Uuid,
    started_at: DateTime<Utc>,
    dms: DmsModule,
    aggregator: RiskAggregator,
    accumulator: SessionStatisticsAccumulator,
    evidence: EvidenceConfig,
    frames_processed: u64,
    first_timestamp: Option<f64>,
    last_timestamp: Option<f64>,
}

impl DriverMonitor {
    pub fn new(config: &MonitorConfig) -> Result<Self, MonitorError> {
        config.validate()?;
        let session_id = Uuid::new_v4();
        info!(%session_id, "Starting driver monitoring session");

        Ok(Self {
            session_id,
            started_at: Utc::now(),
            dms: DmsModule::new(&config.dms)?,
            aggregator: RiskAggregator::new(),
            accumulator: SessionStatisticsAccumulator::new(),
            evidence: config.evidence.clone(),
            frames_processed: 0,
            first_timestamp: None,
            last_timestamp: None,
        })
    }

    /// Run one frame through every classifier, the aggregator and the accumulator
    pub fn process(&mut self, input: &FrameInput) -> FrameOutcome {
        let now = input.timestamp_secs;
        let first = *self.first_timestamp.get_or_insert(now);
        self.last_timestamp = Some(now);

        let evidence = match &input.detections {
            Some(detections) => PhoneEvidence::from_detections(detections, &self.evidence),
            None => input.phone,
        };

        let eye = self.dms.eye.classify(&input.eye, now);
        let head = self.dms.head.classify(&input.head, now);
        let phone = self.dms.phone.classify(&evidence, now);
        let mouth = self.dms.mouth.classify(&input.mouth, now);

        let analysis = self.aggregator.combine(&eye, &head, &phone, &mouth);
        let started = self
            .accumulator
            .record(&analysis, &eye, &head, &phone, &mouth, now);

        self.frames_processed += 1;
        let record = FrameRecord::new(
            self.frames_processed,
            now - first,
            &analysis,
            &eye,
            &head,
            &phone,
            &mouth,
        );

        metrics::counter!("dms_frames_total").increment(1);
        metrics::counter!("dms_risk_frames_total", "level" => analysis.risk_level.as_str())
            .increment(1);
        for incident in &started {
            metrics::counter!("dms_events_total", "condition" => incident.as_str()).increment(1);
        }

        if analysis.risk_level >= RiskLevel::Danger {
            warn!(
                frame = self.frames_processed,
                risk = %analysis.risk_level,
                alerts = %analysis.alert_messages().join("; "),
                "Driver at risk"
            );
        } else {
            debug!(frame = self.frames_processed, risk = %analysis.risk_level, "Frame processed");
        }

        FrameOutcome {
            eye,
            head,
            phone,
            mouth,
            analysis,
            started,
            record,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Timestamp of the most recent frame
    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }

    /// Summary of the session so far
    pub fn summary(&self) -> SessionSummary {
        self.accumulator.summary()
    }

    /// Close open incidents at `now_secs` and report the session
    pub fn finish(&mut self, now_secs: f64) -> SessionReport {
        let summary = self.accumulator.finish(now_secs);
        info!(
            session_id = %self.session_id,
            frames = summary.statistics.total_frames,
            score = summary.safety_score,
            rating = %summary.rating,
            "Driver monitoring session finished"
        );
        SessionReport::new(self.session_id, self.started_at, summary)
    }

    /// Start a new session (driver change)
    pub fn reset(&mut self) {
        self.dms.reset_state();
        self.accumulator.reset();
        self.frames_processed = 0;
        self.first_timestamp = None;
        self.last_timestamp = None;
        self.session_id = Uuid::new_v4();
        self.started_at = Utc::now();
        info!(session_id = %self.session_id, "Driver monitoring session reset");
    }
}
