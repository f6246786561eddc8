pub mod booking;
pub mod flight;
pub mod memory;
pub mod repository;
pub mod user;

/// Boxed error type carried by the repository traits.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("flight {0} not found")]
    FlightNotFound(i64),
    #[error("booking {0} not found")]
    BookingNotFound(i64),
    #[error("booking {0} does not belong to the caller")]
    NotOwner(i64),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("store error: {0}")]
    Store(BoxError),
}

impl From<BoxError> for ServiceError {
    fn from(err: BoxError) -> Self {
        Self::Store(err)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
