use thiserror::Error;

/// Application-level errors (command-line layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] almanac_service::error::ServiceError),

    #[error(transparent)]
    CoreError(#[from] almanac_core::error::CoreError),

    #[error("Malformed request: {0}")]
    MalformedRequest(#[from] serde_json::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
