//! Gemini vision-service client for watermark detection and tracking.

pub mod client;
pub mod error;

pub use client::{GeminiClient, TrackedBox, TrackedPoint};
pub use error::{DetectError, DetectResult};
