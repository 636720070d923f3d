use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Insufficient text extracted ({chars} characters)")]
    InsufficientText { chars: usize },

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),
}
