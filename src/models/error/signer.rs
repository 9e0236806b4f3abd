use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SignerError {
    #[error("Invalid key: {0}")]
    KeyError(String),

    #[error("Failed to sign: {0}")]
    SigningError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
