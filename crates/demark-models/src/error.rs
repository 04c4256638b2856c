//! Error types for model validation and editing.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised by the pure data-model layer.
///
/// These are caller-fault validation failures. They are caught at the
/// boundary where raw external data enters the system and are never
/// retried.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Invalid normalized box {coords:?}: {reason}")]
    InvalidNormalizedBox {
        coords: [i64; 4],
        reason: String,
    },

    #[error("Invalid pixel box (x={x}, y={y}, w={w}, h={h}) for {width}x{height} frame")]
    InvalidPixelBox {
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        width: u32,
        height: u32,
    },

    #[error("Invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Invalid timestamp format: {0}")]
    InvalidTimestamp(String),

    #[error("No observation at timestamp {0}")]
    ObservationNotFound(String),

    #[error("Unknown removal method: {0}")]
    UnknownMethod(String),

    #[error("Empty point set cannot be reduced to a bounding box")]
    EmptyPointSet,
}

impl ModelError {
    /// Create an invalid-timestamp error.
    pub fn invalid_timestamp(ts: impl Into<String>) -> Self {
        Self::InvalidTimestamp(ts.into())
    }

    /// Create an observation-not-found error.
    pub fn not_found(ts: impl Into<String>) -> Self {
        Self::ObservationNotFound(ts.into())
    }
}
