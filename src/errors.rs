//! Error types for kyccheck
//!
//! Validation failures are never errors: they are recorded in the
//! `ValidationReport`. `KycError` covers the conditions that abort work on a
//! document: malformed input, API failures, unreadable images, bad config.

use thiserror::Error;

/// Main error type for kyccheck
#[derive(Error, Debug)]
pub enum KycError {
    /// Extraction result is malformed (missing document type, non-numeric confidence, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Vision model API errors
    #[error("Extraction API error: {0}")]
    ExtractionApi(String),

    /// Image loading errors
    #[error("Image error: {0}")]
    ImageError(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for kyccheck operations
pub type Result<T> = std::result::Result<T, KycError>;

/// Convert anyhow errors to KycError
impl From<anyhow::Error> for KycError {
    fn from(err: anyhow::Error) -> Self {
        KycError::Generic(err.to_string())
    }
}

impl KycError {
    /// Shorthand for building an `InvalidInput` error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        KycError::InvalidInput(message.into())
    }
}
