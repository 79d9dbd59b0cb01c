use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("invalid tle: {0}")]
    InvalidTle(#[from] sgp4::TleError),
    #[error("elements error: {0}")]
    Elements(#[from] sgp4::ElementsError),
}
