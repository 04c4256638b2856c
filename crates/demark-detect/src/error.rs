//! Detection-service error types.

use thiserror::Error;

/// Result type for vision-service operations.
pub type DetectResult<T> = Result<T, DetectError>;

/// A failure talking to or interpreting the vision service.
///
/// These are surfaced verbatim to the operator and retryable at the
/// user's discretion; the pipeline never retries them automatically
/// (the calls are slow and billed).
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("GEMINI_API_KEY not set")]
    ApiKeyMissing,

    #[error("Vision service transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Vision service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed vision-service response: {0}")]
    MalformedResponse(String),

    #[error("Vision service found no watermarks")]
    NoDetections,

    #[error("All vision models failed; last error: {0}")]
    AllModelsFailed(String),
}

impl DetectError {
    /// Create a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }
}
