use gyan_adaptive::AdaptiveError;
use thiserror::Error;

/// Errors returned by the learning services.
#[derive(Error, Debug)]
pub enum LearningError {
    /// The request failed validation
    #[error("Validation error: {0}")]
    Validation(String),
    /// The addressed gap does not exist
    #[error("Not found: {0}")]
    NotFound(String),
    /// The engine rejected its input or tuning
    #[error(transparent)]
    Adaptive(#[from] AdaptiveError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    /// Environment or tuning file could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LearningError {
    /// HTTP status a transport layer should answer with.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::Adaptive(AdaptiveError::InvalidInput(_)) => 400,
            Self::NotFound(_) => 404,
            Self::Adaptive(AdaptiveError::InvalidConfig(_)) | Self::Database(_) | Self::Config(_) => {
                500
            }
        }
    }
}

impl From<validator::ValidationErrors> for LearningError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}
