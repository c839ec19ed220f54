/// Server error types
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tonal_core::ValidationError;
use tonal_processing::ProcessingError;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Startup and transport failures
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Caller-visible error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolErrorCode {
    InvalidParams,
    UnknownTool,
    PresetNotFound,
    NoFilesFound,
    ProcessingFailed,
    InternalError,
}

impl ToolErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolErrorCode::InvalidParams => "INVALID_PARAMS",
            ToolErrorCode::UnknownTool => "UNKNOWN_TOOL",
            ToolErrorCode::PresetNotFound => "PRESET_NOT_FOUND",
            ToolErrorCode::NoFilesFound => "NO_FILES_FOUND",
            ToolErrorCode::ProcessingFailed => "PROCESSING_FAILED",
            ToolErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }

    /// JSON-RPC error code used when the failure is framed as an error object
    pub fn rpc_code(&self) -> i64 {
        match self {
            ToolErrorCode::InvalidParams => -32602,
            ToolErrorCode::UnknownTool => -32601,
            ToolErrorCode::InternalError => -32603,
            _ => -32000,
        }
    }
}

impl fmt::Display for ToolErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured failure returned by every tool instead of a raw fault
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("{code}: {message}")]
pub struct ToolError {
    pub code: ToolErrorCode,
    pub message: String,
    pub tool_name: String,
}

pub type ToolResult<T> = std::result::Result<T, ToolError>;

impl ToolError {
    pub fn new(code: ToolErrorCode, tool_name: &str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            tool_name: tool_name.to_string(),
        }
    }

    pub fn invalid_params(tool_name: &str, message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::InvalidParams, tool_name, message)
    }

    pub fn validation(tool_name: &str, err: &ValidationError) -> Self {
        Self::invalid_params(tool_name, err.to_string())
    }

    /// Map a request-level processing failure
    pub fn processing(tool_name: &str, err: &ProcessingError) -> Self {
        let code = match err {
            ProcessingError::NoFilesFound { .. } => ToolErrorCode::NoFilesFound,
            ProcessingError::InvalidPattern { .. } => ToolErrorCode::InvalidParams,
            _ => ToolErrorCode::ProcessingFailed,
        };
        Self::new(code, tool_name, err.to_string())
    }

    pub fn internal(tool_name: &str, message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::InternalError, tool_name, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn test_tool_error_shape() {
        let err = ToolError::new(ToolErrorCode::PresetNotFound, "apply_preset", "no preset x");
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({
                "code": "PRESET_NOT_FOUND",
                "message": "no preset x",
                "toolName": "apply_preset"
            })
        );
        assert_eq!(err.to_string(), "PRESET_NOT_FOUND: no preset x");
    }

    #[test]
    fn test_processing_error_mapping() {
        let none = ProcessingError::NoFilesFound {
            directory: PathBuf::from("/in"),
            pattern: "*.wav".into(),
        };
        assert_eq!(
            ToolError::processing("process_audio_batch", &none).code,
            ToolErrorCode::NoFilesFound
        );

        let pattern = ProcessingError::InvalidPattern {
            pattern: "{".into(),
            reason: "unclosed".into(),
        };
        assert_eq!(
            ToolError::processing("process_audio_batch", &pattern).code,
            ToolErrorCode::InvalidParams
        );

        let engine = ProcessingError::engine("boom");
        assert_eq!(
            ToolError::processing("process_audio_file", &engine).code,
            ToolErrorCode::ProcessingFailed
        );
    }
}
