//! Frame record sinks

use std::collections::VecDeque;
use std::io::Write;
use std::sync::Mutex;

use dms::{
    EyeReading, EyeState, HeadReading, HeadState, MouthReading, MouthState, PhoneState,
    PhoneUsageSample,
};
use event_fusion::{FrameAnalysis, RiskLevel};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::StorageError;

/// One processed frame, as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame_number: u64,
    /// Caller clock reading of the frame (seconds)
    pub timestamp_secs: f64,
    pub risk_level: RiskLevel,
    pub eye_state: EyeState,
    pub ear: f64,
    pub closed_duration_secs: f64,
    pub head_state: HeadState,
    pub yaw_degrees: f64,
    pub pitch_degrees: f64,
    pub phone_state: PhoneState,
    pub phone_confidence: f64,
    pub mouth_state: MouthState,
    pub mar: f64,
    pub alerts: Vec<String>,
}

impl FrameRecord {
    pub fn new(
        frame_number: u64,
        timestamp_secs: f64,
        analysis: &FrameAnalysis,
        eye: &EyeReading,
        head: &HeadReading,
        phone: &PhoneUsageSample,
        mouth: &MouthReading,
    ) -> Self {
        Self {
            frame_number,
            timestamp_secs,
            risk_level: analysis.risk_level,
            eye_state: eye.state,
            ear: eye.ear,
            closed_duration_secs: eye.closed_duration_secs,
            head_state: head.state,
            yaw_degrees: head.yaw_degrees,
            pitch_degrees: head.pitch_degrees,
            phone_state: phone.state,
            phone_confidence: phone.confidence,
            mouth_state: mouth.state,
            mar: mouth.mar,
            alerts: analysis.alert_messages(),
        }
    }
}

/// Destination for per-frame records
pub trait FrameSink {
    fn write_frame(&mut self, record: &FrameRecord) -> Result<(), StorageError>;

    fn flush(&mut self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Bounded in-memory frame store; oldest records are dropped past the limit
pub struct Repository {
    records: Mutex<VecDeque<FrameRecord>>,
    max_records: usize,
}

impl Repository {
    /// Default retention (~10 minutes at 30fps)
    pub const DEFAULT_MAX_RECORDS: usize = 18_000;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_MAX_RECORDS)
    }

    pub fn with_capacity(max_records: usize) -> Self {
        info!("Creating in-memory frame repository (max {} records)", max_records);
        Self {
            records: Mutex::new(VecDeque::with_capacity(max_records.min(1024))),
            max_records: max_records.max(1),
        }
    }

    /// Insert a frame record
    pub fn insert(&self, record: FrameRecord) -> Result<(), StorageError> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        // Enforce retention
        while records.len() >= self.max_records {
            records.pop_front();
        }

        debug!("Stored frame {}", record.frame_number);
        records.push_back(record);
        Ok(())
    }

    /// Most recent records, newest first
    pub fn recent(&self, limit: usize) -> Result<Vec<FrameRecord>, StorageError> {
        let records = self
            .records
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        Ok(records.iter().rev().take(limit).cloned().collect())
    }

    /// Most recent records at or above a risk level, newest first
    pub fn at_or_above(
        &self,
        level: RiskLevel,
        limit: usize,
    ) -> Result<Vec<FrameRecord>, StorageError> {
        let records = self
            .records
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        Ok(records
            .iter()
            .rev()
            .filter(|r| r.risk_level >= level)
            .take(limit)
            .cloned()
            .collect())
    }

    /// Get stored record count
    pub fn count(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Clear all records
    pub fn clear(&self) {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSink for Repository {
    fn write_frame(&mut self, record: &FrameRecord) -> Result<(), StorageError> {
        self.insert(record.clone())
    }
}

/// Lets a caller keep querying the repository while it is being filled
impl FrameSink for &Repository {
    fn write_frame(&mut self, record: &FrameRecord) -> Result<(), StorageError> {
        self.insert(record.clone())
    }
}

/// Writes one JSON object per frame, newline separated
pub struct JsonLinesSink<W: Write> {
    writer: W,
    lines_written: u64,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            lines_written: 0,
        }
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FrameSink for JsonLinesSink<W> {
    fn write_frame(&mut self, record: &FrameRecord) -> Result<(), StorageError> {
        serde_json::to_writer(&mut self.writer, record)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        self.writer.write_all(b"\n")?;
        self.lines_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StorageError> {
        self.writer.flush()?;
        Ok(())
    }
}
