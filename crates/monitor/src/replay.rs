//! Replay of recorded sessions

use std::io::BufRead;

use storage::FrameSink;
use tracing::info;

use crate::pipeline::{DriverMonitor, FrameInput, FrameOutcome};
use crate::report::SessionReport;
use crate::MonitorError;

/// Feed every JSON-lines frame from `reader` through `monitor` into `sink`
pub fn run_replay<R, S>(
    reader: R,
    monitor: &mut DriverMonitor,
    sink: &mut S,
) -> Result<SessionReport, MonitorError>
where
    R: BufRead,
    S: FrameSink + ?Sized,
{
    run_replay_with(reader, monitor, sink, |_| {})
}

/// [`run_replay`] with a callback invoked after each frame
pub fn run_replay_with<R, S, F>(
    reader: R,
    monitor: &mut DriverMonitor,
    sink: &mut S,
    mut on_frame: F,
) -> Result<SessionReport, MonitorError>
where
    R: BufRead,
    S: FrameSink + ?Sized,
    F: FnMut(&FrameOutcome),
{
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let input: FrameInput =
            serde_json::from_str(line).map_err(|e| MonitorError::Input {
                line: index + 1,
                message: e.to_string(),
            })?;

        let outcome = monitor.process(&input);
        sink.write_frame(&outcome.record)?;
        on_frame(&outcome);
    }
    sink.flush()?;

    let end = monitor.last_timestamp().unwrap_or(0.0);
    info!(frames = monitor.frames_processed(), "Replay complete");
    Ok(monitor.finish(end))
}
