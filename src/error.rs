use thiserror::Error;

/// Rejected uploads. Nothing is fingerprinted or stored for these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("media is empty")]
    EmptyMedia,
    #[error("media is {size} bytes, limit is {max}")]
    TooLarge { size: usize, max: usize },
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("analysis cancelled")]
    Cancelled,
}
