use thiserror::Error;

/// Store layer errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Event not found: {0}")]
    EventNotFound(uuid::Uuid),

    #[error("Backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
