use thiserror::Error;

use crate::errors::StoreError;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("User already exists with this email")]
    Conflict,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("token error: {0}")]
    Token(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
