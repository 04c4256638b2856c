//! FFmpeg command builder and runner.
//!
//! The runner supports progress callbacks, a wall-clock timeout, and
//! cooperative cancellation via a `tokio::sync::watch` channel. Cancelling
//! kills the child process and surfaces [`MediaError::Cancelled`]; the
//! partially written output is removed by the caller.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{MediaError, MediaResult};
use crate::filters::FilterGraph;
use crate::progress::{is_progress_line, parse_progress_line, TranscodeProgress};

/// Builder for a single-input FFmpeg invocation.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    input: PathBuf,
    output: PathBuf,
    output_args: Vec<String>,
}

impl FfmpegCommand {
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            output_args: Vec::new(),
        }
    }

    /// Attach a filter graph, either as `-vf` or as `-filter_complex`
    /// with its output label mapped (video from the graph, audio from the
    /// source).
    pub fn filter_graph(mut self, graph: &FilterGraph) -> Self {
        match graph {
            FilterGraph::VideoFilter(vf) => {
                self.output_args.push("-vf".to_string());
                self.output_args.push(vf.clone());
            }
            FilterGraph::FilterComplex { graph, output_label } => {
                self.output_args.push("-filter_complex".to_string());
                self.output_args.push(graph.clone());
                self.output_args.push("-map".to_string());
                self.output_args.push(format!("[{output_label}]"));
                self.output_args.push("-map".to_string());
                self.output_args.push("0:a?".to_string());
            }
        }
        self
    }

    /// Append raw output arguments (encoding settings and the like).
    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Full argument list for the `ffmpeg` binary.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-hide_banner".to_string(),
            "-v".to_string(),
            "error".to_string(),
            "-progress".to_string(),
            "pipe:2".to_string(),
            "-i".to_string(),
            self.input.to_string_lossy().to_string(),
        ];
        args.extend(self.output_args.clone());
        args.push(self.output.to_string_lossy().to_string());
        args
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }
}

/// Runs FFmpeg commands with progress tracking and cancellation.
pub struct FfmpegRunner {
    cancel_rx: Option<watch::Receiver<bool>>,
    timeout_secs: Option<u64>,
}

impl Default for FfmpegRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegRunner {
    pub fn new() -> Self {
        Self {
            cancel_rx: None,
            timeout_secs: None,
        }
    }

    /// Attach a cancellation signal; `true` on the channel cancels the run.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    /// Abort the run after `secs` of wall-clock time.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Run a command, discarding progress.
    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        self.run_with_progress(cmd, |_| {}).await
    }

    /// Run a command, invoking `progress_callback` for each progress
    /// snapshot FFmpeg flushes.
    pub async fn run_with_progress<F>(
        &self,
        cmd: &FfmpegCommand,
        progress_callback: F,
    ) -> MediaResult<()>
    where
        F: Fn(TranscodeProgress) + Send + 'static,
    {
        which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

        let args = cmd.build_args();
        debug!(args = %args.join(" "), "Running FFmpeg");

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        // FFmpeg interleaves -progress key/value pairs with its error log
        // on stderr; progress lines are consumed, everything else is kept
        // for the failure report.
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| MediaError::ffmpeg_failed("stderr not captured", None, None))?;

        let log_handle = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            let mut current = TranscodeProgress::default();
            let mut log_lines: Vec<String> = Vec::new();

            while let Ok(Some(line)) = lines.next_line().await {
                if let Some(snapshot) = parse_progress_line(&line, &mut current) {
                    progress_callback(snapshot);
                } else if !is_progress_line(&line) && !line.trim().is_empty() {
                    log_lines.push(line);
                }
            }
            log_lines
        });

        let run_result = self.wait_for_completion(&mut child).await;
        let log_lines = log_handle.await.unwrap_or_default();

        match run_result {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(MediaError::ffmpeg_failed(
                "FFmpeg exited with non-zero status",
                Some(log_lines.join("\n")),
                status.code(),
            )),
            Err(e) => Err(e),
        }
    }

    async fn wait_for_completion(
        &self,
        child: &mut Child,
    ) -> MediaResult<std::process::ExitStatus> {
        let mut cancel_rx = self.cancel_rx.clone();

        let wait = async {
            loop {
                match &mut cancel_rx {
                    Some(rx) => {
                        tokio::select! {
                            status = child.wait() => return status.map_err(MediaError::from),
                            changed = rx.changed() => {
                                if changed.is_err() || *rx.borrow() {
                                    info!("FFmpeg cancelled, killing process");
                                    let _ = child.kill().await;
                                    return Err(MediaError::Cancelled);
                                }
                            }
                        }
                    }
                    None => return child.wait().await.map_err(MediaError::from),
                }
            }
        };

        match self.timeout_secs {
            Some(secs) => {
                match tokio::time::timeout(std::time::Duration::from_secs(secs), wait).await {
                    Ok(result) => result,
                    Err(_) => {
                        warn!(timeout_secs = secs, "FFmpeg timed out, killing process");
                        let _ = child.kill().await;
                        Err(MediaError::Timeout(secs))
                    }
                }
            }
            None => wait.await,
        }
    }
}

/// Check that FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}
