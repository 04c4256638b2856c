//! Shared data models for the demark watermark-removal pipeline.
//!
//! This crate provides the pure, I/O-free core of the system:
//! - Normalized (0-1000) and pixel-space rectangles with conversion
//! - `MM:SS` timestamp parsing and formatting
//! - Detection sets built from vision-service observations
//! - Removal method and encoding configuration

pub mod detection;
pub mod encoding;
pub mod error;
pub mod method;
pub mod rect;
pub mod timestamp;

pub use detection::{DetectionSet, Observation, RawBox, RawObservation, RegionCandidate};
pub use encoding::EncodingConfig;
pub use error::{ModelError, ModelResult};
pub use method::RemovalMethod;
pub use rect::{NormalizedBox, PixelBox, NORMALIZED_SCALE};
pub use timestamp::{format_timestamp, parse_timestamp};
