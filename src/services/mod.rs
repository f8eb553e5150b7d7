use thiserror::Error;

pub mod admin;
pub mod checkout;
pub mod products;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// The payment gateway failed or returned an unusable response.
    #[error("payment failed: {0}")]
    Payment(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
