use thiserror::Error;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("one argument is required")]
    MissingInput,

    #[error(transparent)]
    RfcError(#[from] almanac_rfc::error::RfcError),

    #[error(transparent)]
    CoreError(#[from] almanac_core::error::CoreError),

    #[error("Assembly panicked: {0}")]
    Panicked(String),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
