//! High-level overlay removal: filter plan in, repaired video out.

use std::path::Path;
use tracing::info;

use demark_models::EncodingConfig;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::filters::translate_plan;
use crate::plan::FilterPlan;
use crate::progress::TranscodeProgress;

/// Apply a filter plan to `input`, writing the repaired video to `output`.
///
/// The transcode targets a scratch file first and is renamed into place
/// only on success, so a failed or cancelled run never leaves a partial
/// file at the output path.
pub async fn remove_overlay<F>(
    input: &Path,
    output: &Path,
    plan: &FilterPlan,
    width: u32,
    height: u32,
    encoding: &EncodingConfig,
    runner: FfmpegRunner,
    progress_callback: F,
) -> MediaResult<()>
where
    F: Fn(TranscodeProgress) + Send + 'static,
{
    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    let graph = translate_plan(plan, width, height)?;
    let scratch = output.with_extension("part.mp4");

    info!(
        input = %input.display(),
        output = %output.display(),
        entries = plan.len(),
        "Removing overlay"
    );

    let cmd = FfmpegCommand::new(input, &scratch)
        .filter_graph(&graph)
        .output_args(encoding.to_ffmpeg_args());

    if let Err(e) = runner.run_with_progress(&cmd, progress_callback).await {
        let _ = tokio::fs::remove_file(&scratch).await;
        return Err(e);
    }

    tokio::fs::rename(&scratch, output).await.map_err(|e| {
        MediaError::invalid_video(format!(
            "failed to move transcoded file into place: {e}"
        ))
    })?;

    info!(output = %output.display(), "Overlay removed");
    Ok(())
}
