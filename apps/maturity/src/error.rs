//! # Application Errors
//!
//! Errors raised by the binary around the pure engine: file and socket I/O,
//! configuration, and JSON (de)serialization. Engine rejections pass through
//! unchanged as [`AppError::Validation`].

use maturity_core::ValidationError;
use thiserror::Error;

/// Errors that can occur in the Maturity application.
#[derive(Debug, Error)]
pub enum AppError {
    /// The engine rejected the input.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),

    /// The configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}
