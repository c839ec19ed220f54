//! Core error types for Tonal
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for Tonal
#[derive(Error, Debug)]
pub enum CoreError {
    /// An operation value is outside its documented bounds
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// A rejected operation value
///
/// `field` is the dotted path of the offending value as the caller wrote it,
/// e.g. `advanced.pitch.semitones`.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid value for {field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
