use thiserror::Error;

use crate::fetch::FetchError;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Satellite {0} is already being tracked")]
    AlreadyTracked(String),
    #[error("{0}")]
    FetchFailed(#[from] FetchError),
    #[error("duplicate identifier in registry: {0}")]
    DuplicateIdentifier(String),
    #[error("invalid satellite identifier")]
    InvalidIdentifier,
    #[error("clock step must be positive and at most one year, got {0}")]
    InvalidClockStep(chrono::Duration),
}
