use serde::Serialize;
use thiserror::Error;

use super::ApiError;

#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("An unknown error occurred: {0}")]
    Unknown(String),
}

impl From<RepositoryError> for ApiError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound(msg) => ApiError::NotFound(msg),
            RepositoryError::InvalidData(msg) => ApiError::BadRequest(msg),
            RepositoryError::ConstraintViolation(msg) | RepositoryError::Unknown(msg) => {
                ApiError::InternalError(msg)
            }
        }
    }
}
