use thiserror::Error;

use crate::predict::PredictError;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to fetch satellite data (Status: {0})")]
    Status(u16),
    #[error("malformed payload: {0}")]
    Malformed(String),
    #[error("invalid element set: {0}")]
    InvalidElements(#[from] PredictError),
    #[error("satellite {0} not found in catalog")]
    NotFound(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("catalog read error: {0}")]
    Io(#[from] std::io::Error),
}
