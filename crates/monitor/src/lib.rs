//! Driver Monitoring Pipeline
//!
//! Ties the DMS classifiers, risk fusion and session statistics into one
//! per-stream [`DriverMonitor`], plus configuration loading, logging setup
//! and replay of recorded sessions.

pub mod config;
pub mod pipeline;
pub mod replay;
pub mod report;

pub use config::MonitorConfig;
pub use pipeline::{DriverMonitor, FrameInput, FrameOutcome};
pub use replay::{run_replay, run_replay_with};
pub use report::SessionReport;

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Monitor errors
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Dms(#[from] dms::DmsError),
    #[error(transparent)]
    Storage(#[from] storage::StorageError),
    #[error("Invalid frame on line {line}: {message}")]
    Input { line: usize, message: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Initialize logging; `RUST_LOG` overrides `default_level`
pub fn init_logging(json: bool, default_level: &str) -> Result<(), MonitorError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };

    result.map_err(|e| MonitorError::Logging(e.to_string()))
}
