use thiserror::Error;

/// Record building and validation errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid attributes: {0}")]
    InvalidAttributes(#[from] serde_json::Error),

    #[error("Invalid recurrence rule: {0}")]
    RRuleError(#[from] rrule::RRuleError),

    #[error(transparent)]
    CoreError(#[from] almanac_core::error::CoreError),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
