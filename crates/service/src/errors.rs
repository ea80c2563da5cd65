use thiserror::Error;

/// Tagged error kinds returned uniformly by store collaborators. Callers
/// never inspect implementation-specific error shapes.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
