//! Watermark removal CLI binary.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use demark_app::{
    AppConfig, AppError, AppResult, FfmpegTranscoder, PipelineController, RegionSelection,
};
use demark_detect::GeminiClient;
use demark_media::{check_ffmpeg, probe_video};
use demark_models::RemovalMethod;

/// How the watermark is located before removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Use the region given on the command line, constant for the whole
    /// video.
    Manual,
    /// Ask the vision service to detect watermarks across the video.
    Detect,
    /// Track the given reference region across the video.
    Track,
}

/// Remove watermarks and logo overlays from a video.
#[derive(Debug, Parser)]
#[command(name = "demark", version, about)]
struct Cli {
    /// Input video file
    input: PathBuf,

    /// Location mode
    #[arg(long, value_enum, default_value = "manual")]
    mode: Mode,

    /// Manual region or tracking reference as `x,y,w,h` in pixels
    #[arg(long, conflicts_with = "preset")]
    region: Option<String>,

    /// Corner preset instead of explicit coordinates
    /// (top-left, top-right, bottom-left, bottom-right)
    #[arg(long)]
    preset: Option<String>,

    /// Removal method (inpaint, blur)
    #[arg(long, default_value = "inpaint")]
    method: String,

    /// Detection/tracking sampling rate in frames per second (1-4)
    #[arg(long)]
    sampling_fps: Option<u32>,

    /// Output file (defaults to `<input>-demark.mp4` next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!(error = %e, "Run failed");
        std::process::exit(e.exit_code());
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("demark=info,warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(true)
                .with_target(true)
                .with_file(false)
                .with_line_number(false),
        )
        .with(env_filter)
        .init();
}

async fn run(cli: Cli) -> AppResult<()> {
    check_ffmpeg()?;

    let mut config = AppConfig::from_env();
    if let Some(fps) = cli.sampling_fps {
        config.sampling_fps = fps;
        config = config.clamp();
    }

    let method: RemovalMethod = cli.method.parse()?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output(&cli.input));

    let info = probe_video(&cli.input).await?;
    info!(
        input = %cli.input.display(),
        duration = info.duration,
        width = info.width,
        height = info.height,
        codec = %info.codec,
        "Probed video"
    );

    let mut controller = PipelineController::new(config);
    controller.video_loaded(cli.input.clone(), info)?;

    // Ctrl-C cancels the in-flight service call or transcode.
    let cancel = controller.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, cancelling");
            cancel.cancel();
        }
    });

    match cli.mode {
        Mode::Manual => {
            let selection = selection_from_args(&cli)?;
            controller.select_manual(&selection)?;
        }
        Mode::Detect => {
            let client = GeminiClient::from_env()?;
            let video = tokio::fs::read(&cli.input).await?;
            controller
                .locate_detect(&client, &video, mime_type_for(&cli.input))
                .await?;
        }
        Mode::Track => {
            let selection = selection_from_args(&cli)?;
            let client = GeminiClient::from_env()?;
            let video = tokio::fs::read(&cli.input).await?;
            controller
                .locate_track(&client, &video, mime_type_for(&cli.input), &selection)
                .await?;
        }
    }

    controller.confirm(method)?;
    controller.process(&FfmpegTranscoder, &output).await?;

    println!("{}", output.display());
    Ok(())
}

/// Build the manual/reference region from `--region` or `--preset`.
fn selection_from_args(cli: &Cli) -> AppResult<RegionSelection> {
    if let Some(region) = &cli.region {
        let (x, y, w, h) = parse_region(region)?;
        return Ok(RegionSelection::Coords { x, y, w, h });
    }
    if let Some(preset) = &cli.preset {
        return Ok(RegionSelection::Preset(preset.parse()?));
    }
    Err(AppError::config(
        "manual and track modes need --region or --preset",
    ))
}

fn parse_region(s: &str) -> AppResult<(u32, u32, u32, u32)> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, w, h] = parts.as_slice() else {
        return Err(AppError::config(format!(
            "region must be x,y,w,h in pixels, got {s:?}"
        )));
    };

    let parse = |v: &str| -> AppResult<u32> {
        v.parse()
            .map_err(|_| AppError::config(format!("bad region component {v:?}")))
    };
    Ok((parse(x)?, parse(y)?, parse(w)?, parse(h)?))
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}-demark.mp4"))
}

fn mime_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("avi") => "video/x-msvideo",
        _ => "video/mp4",
    }
}
