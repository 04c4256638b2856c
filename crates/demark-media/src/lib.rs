#![deny(unreachable_patterns)]
//! FFmpeg integration for the demark pipeline.
//!
//! This crate provides:
//! - Region tracks with hold-until-next interpolation
//! - Filter-plan synthesis from sparse observations
//! - Translation of plans into FFmpeg filter graphs (delogo / boxblur)
//! - Type-safe FFmpeg command building with progress and cancellation
//! - FFprobe metadata for the upload stage

pub mod command;
pub mod error;
pub mod filters;
pub mod plan;
pub mod probe;
pub mod progress;
pub mod remove;
pub mod track;

pub use command::{check_ffmpeg, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use filters::{translate_plan, FilterGraph};
pub use plan::{FilterPlan, FilterPlanBuilder, PlanEntry, DEFAULT_DWELL_SECS};
pub use probe::{probe_video, VideoInfo};
pub use progress::{ProgressCallback, TranscodeProgress};
pub use remove::remove_overlay;
pub use track::{InterpolationPolicy, RegionTrack, TrackSample};
