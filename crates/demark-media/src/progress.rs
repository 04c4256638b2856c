//! Transcode progress reporting.
//!
//! Progress is advisory telemetry parsed from FFmpeg's `-progress`
//! output. It never gates pipeline state transitions.

use serde::{Deserialize, Serialize};

/// A snapshot of transcode progress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscodeProgress {
    /// Current frame number
    pub frame: u64,
    /// Encoding speed relative to realtime (e.g., 1.5 = 1.5x)
    pub speed: f64,
    /// Output position in milliseconds
    pub out_time_ms: i64,
    /// Whether encoding has finished
    pub is_complete: bool,
}

impl TranscodeProgress {
    /// Progress percentage against a known duration, capped to 0-100.
    pub fn percentage(&self, total_duration_secs: f64) -> f64 {
        if total_duration_secs <= 0.0 {
            return 0.0;
        }
        let done = self.out_time_ms as f64 / 1000.0;
        (done / total_duration_secs * 100.0).clamp(0.0, 100.0)
    }
}

/// Callback invoked for each progress snapshot.
pub type ProgressCallback = Box<dyn Fn(TranscodeProgress) + Send + 'static>;

/// Keys FFmpeg emits on its `-progress` stream.
const PROGRESS_KEYS: &[&str] = &[
    "frame",
    "fps",
    "stream_0_0_q",
    "bitrate",
    "total_size",
    "out_time_us",
    "out_time_ms",
    "out_time",
    "dup_frames",
    "drop_frames",
    "speed",
    "progress",
];

/// Whether a stderr line belongs to the `-progress` stream rather than
/// the error log. Error lines may contain `=` too (filter-argument
/// echoes, `ret = -22` codes), so the key is matched against the known
/// progress keys instead of the presence of `=`.
pub(crate) fn is_progress_line(line: &str) -> bool {
    match line.trim().split_once('=') {
        Some((key, _)) => PROGRESS_KEYS.contains(&key),
        None => false,
    }
}

/// Feed one `key=value` line from FFmpeg's progress stream into the
/// accumulating snapshot. Returns a snapshot to publish when the stream
/// flushes (`progress=continue|end`).
pub(crate) fn parse_progress_line(
    line: &str,
    current: &mut TranscodeProgress,
) -> Option<TranscodeProgress> {
    let (key, value) = line.trim().split_once('=')?;

    match key {
        "frame" => {
            if let Ok(frame) = value.parse() {
                current.frame = frame;
            }
        }
        "out_time_ms" | "out_time_us" => {
            // Despite its name, out_time_ms is reported in microseconds by
            // modern FFmpeg builds; both keys carry the same unit.
            if let Ok(us) = value.parse::<i64>() {
                current.out_time_ms = us / 1000;
            }
        }
        "speed" => {
            if let Some(stripped) = value.strip_suffix('x') {
                if let Ok(speed) = stripped.parse() {
                    current.speed = speed;
                }
            }
        }
        "progress" => {
            if value == "end" {
                current.is_complete = true;
            }
            return Some(current.clone());
        }
        _ => {}
    }

    None
}
