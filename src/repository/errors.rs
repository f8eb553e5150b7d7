use thiserror::Error;

use crate::domain::types::TypeConstraintError;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("failed to get a database connection: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    /// A stored row violated a domain constraint when loaded.
    #[error("invalid stored value: {0}")]
    Validation(String),
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(value: TypeConstraintError) -> Self {
        Self::Validation(value.to_string())
    }
}

/// Convenient alias for results returned from repository methods.
pub type RepositoryResult<T> = Result<T, RepositoryError>;
