//! Monitor configuration

use dms::{DmsConfig, EvidenceConfig};
use serde::{Deserialize, Serialize};

use crate::MonitorError;

/// Everything a [`crate::DriverMonitor`] and the replay binary need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Classifier thresholds
    pub dms: DmsConfig,
    /// Hand/object geometry for phone evidence
    pub evidence: EvidenceConfig,
    /// Frames kept by the in-memory repository
    pub repository_capacity: usize,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            dms: DmsConfig::default(),
            evidence: EvidenceConfig::default(),
            repository_capacity: 18_000,
            log_level: "info".to_string(),
        }
    }
}

impl MonitorConfig {
    /// Layer defaults, an optional file and `DMS__*` environment variables
    pub fn load(path: Option<&str>) -> Result<Self, MonitorError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(
            config::Config::try_from(&MonitorConfig::default())
                .map_err(|e| MonitorError::Config(e.to_string()))?,
        );

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        // e.g. DMS__DMS__EAR_THRESHOLD=0.25
        builder = builder.add_source(
            config::Environment::with_prefix("DMS")
                .separator("__")
                .try_parsing(true),
        );

        let config: MonitorConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| MonitorError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MonitorError> {
        self.dms.validate()?;
        self.evidence.validate()?;
        if self.repository_capacity == 0 {
            return Err(MonitorError::Config(
                "repository_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = MonitorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dms.closed_frames_threshold, 45);
        assert_eq!(config.evidence.object_confidence, 0.28);
    }

    #[test]
    fn test_load_without_file_gives_defaults() {
        let config = MonitorConfig::load(None).unwrap();
        assert_eq!(config.dms, DmsConfig::default());
        assert_eq!(config.repository_capacity, 18_000);
    }

    #[test]
    fn test_load_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!(
            "driver-monitor-config-{}.json",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{ "dms": {{ "ear_threshold": 0.25, "phone_history_size": 20 }}, "repository_capacity": 100 }}"#
        )
        .unwrap();
        drop(file);

        let config = MonitorConfig::load(path.to_str()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.dms.ear_threshold, 0.25);
        assert_eq!(config.dms.phone_history_size, 20);
        // Unset fields keep their defaults
        assert_eq!(config.dms.phone_min_samples, 5);
        assert_eq!(config.repository_capacity, 100);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let path = std::env::temp_dir().join(format!(
            "driver-monitor-bad-config-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "dms": { "phone_min_samples": 50 } }"#).unwrap();

        let result = MonitorConfig::load(path.to_str());
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(MonitorError::Dms(_))));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = MonitorConfig::load(Some("/nonexistent/driver-monitor.toml"));
        assert!(matches!(result, Err(MonitorError::Config(_))));
    }
}
