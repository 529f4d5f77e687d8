use thiserror::Error;

/// Core error type with minimal dependencies
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
