//! Application error types and exit-code categorization.

use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid pipeline state: expected {expected}, currently {actual}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Another operation is already in flight for this pipeline")]
    Busy,

    #[error("Operation cancelled")]
    Cancelled,

    #[error("No video loaded")]
    NoVideo,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Model(#[from] demark_models::ModelError),

    #[error("Media error: {0}")]
    Media(#[from] demark_media::MediaError),

    #[error("Detection service error: {0}")]
    Detect(#[from] demark_detect::DetectError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Process exit code for the CLI, one per error category.
    pub fn exit_code(&self) -> i32 {
        use demark_media::MediaError;
        match self {
            // Caller-fault validation; never retried.
            AppError::Model(_) | AppError::Config(_) => 2,
            // External collaborator failure; retryable at user discretion.
            AppError::Detect(_) => 3,
            AppError::Media(MediaError::EmptyPlan) => 4,
            AppError::Media(_) => 5,
            AppError::Cancelled => 6,
            _ => 1,
        }
    }
}
