use thiserror::Error;

use crate::errors::StoreError;

/// Business errors for complaint workflows
#[derive(Debug, Error)]
pub enum ComplaintError {
    /// Carries one message per violated field, not just the first.
    #[error("Validation failed")]
    Validation(Vec<String>),
    #[error("Complaint not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}
