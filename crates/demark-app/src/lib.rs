//! Pipeline controller and CLI for the demark watermark-removal tool.
//!
//! The controller walks one video through Upload -> Locate -> Review ->
//! Process, holding the authoritative facts (resolution, duration, the
//! located region, the confirmed filter plan) between stages. The vision
//! service and the transcoder sit behind traits so the state machine is
//! testable without network or FFmpeg.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod select;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use pipeline::{
    CancelHandle, FfmpegTranscoder, LocatedRegion, Locator, PipelineController, PipelineState,
    Transcoder, VideoFacts,
};
pub use select::{CornerPreset, RegionSelection};
