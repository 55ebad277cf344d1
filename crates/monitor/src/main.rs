//! Driver Monitoring - Replay Entry Point

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use event_fusion::RiskLevel;
use monitor::{init_logging, run_replay_with, DriverMonitor, FrameOutcome, MonitorConfig};
use storage::{FrameSink, JsonLinesSink, Repository};
use tracing::info;

const RISKY_FRAMES_SHOWN: usize = 10;

/// Replay recorded driver measurements through the monitoring pipeline
#[derive(Parser, Debug)]
#[command(name = "driver-monitor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON-lines file of frame measurements (stdin when omitted)
    input: Option<PathBuf>,

    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long, env = "DMS_CONFIG")]
    config: Option<String>,

    /// Write per-frame records as JSON lines
    #[arg(long)]
    records: Option<PathBuf>,

    /// Write the session report as JSON
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Enable JSON logging
    #[arg(long, env = "DMS_LOG_JSON")]
    json_logs: bool,

    /// Print the frame verdict every N frames (0 disables)
    #[arg(long, default_value_t = 0)]
    print_every: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = MonitorConfig::load(cli.config.as_deref()).context("loading configuration")?;
    init_logging(cli.json_logs, &config.log_level)?;

    info!("=== Driver Monitor v{} ===", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &cli.config {
        info!("Loaded configuration from {}", path);
    }

    // Without a records file, frames go to the in-memory repository and the
    // most recent high-risk ones are printed after the report.
    let repository = Repository::with_capacity(config.repository_capacity);
    let mut records_sink = match &cli.records {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating records file {}", path.display()))?;
            Some(JsonLinesSink::new(BufWriter::new(file)))
        }
        None => None,
    };
    let mut repository_sink = &repository;
    let sink: &mut dyn FrameSink = match records_sink.as_mut() {
        Some(records) => records,
        None => &mut repository_sink,
    };

    let mut monitor = DriverMonitor::new(&config)?;
    let print_every = cli.print_every;
    let on_frame = |outcome: &FrameOutcome| {
        let frame = outcome.record.frame_number;
        if print_every > 0 && frame % print_every == 0 {
            println!(
                "[{:>6}] {:<8} eye={} head={} phone={} mouth={} {}",
                frame,
                outcome.analysis.risk_level,
                outcome.eye.state,
                outcome.head.state,
                outcome.phone.state,
                outcome.mouth.state,
                outcome.analysis.alert_messages().join(" | ")
            );
        }
    };

    let report = match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening input {}", path.display()))?;
            run_replay_with(BufReader::new(file), &mut monitor, sink, on_frame)
        }
        None => run_replay_with(io::stdin().lock(), &mut monitor, sink, on_frame),
    }
    .context("replaying session")?;

    if let Some(path) = &cli.summary {
        let file = File::create(path)
            .with_context(|| format!("creating summary file {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &report)
            .context("writing session summary")?;
    }

    println!("{report}");

    if cli.records.is_none() {
        let risky = repository
            .at_or_above(RiskLevel::Danger, RISKY_FRAMES_SHOWN)
            .context("reading frame repository")?;
        if !risky.is_empty() {
            println!("\nMost recent high-risk frames:");
            for record in risky.iter().rev() {
                println!(
                    "  frame {:>6} at {:>8.2}s  {}  {}",
                    record.frame_number,
                    record.timestamp_secs,
                    record.risk_level,
                    record.alerts.join(" | ")
                );
            }
        }
    }
    Ok(())
}
