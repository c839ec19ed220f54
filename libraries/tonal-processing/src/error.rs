//! Error types for job execution and batch scheduling

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Input is not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Input file is not readable: {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Output file already exists: {} (set overwrite to replace it)", .0.display())]
    OutputExists(PathBuf),

    #[error("Output directory is not writable: {}: {reason}", .path.display())]
    OutputNotWritable { path: PathBuf, reason: String },

    #[error("FFmpeg failed: {message}")]
    Engine { message: String },

    #[error("FFmpeg is not available: {0}")]
    EngineUnavailable(String),

    #[error("No files found matching {pattern} in {}", .directory.display())]
    NoFilesFound { directory: PathBuf, pattern: String },

    #[error("Invalid file pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Job aborted while running: {0}")]
    JobAborted(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProcessingError {
    pub fn engine(message: impl Into<String>) -> Self {
        ProcessingError::Engine {
            message: message.into(),
        }
    }
}
