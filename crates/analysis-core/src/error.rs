use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid ticker: {0:?}")]
    InvalidTicker(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Non-numeric value in field: {0}")]
    NonNumeric(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
