//! Tonal Server Library
//!
//! Audio-processing tool server: exposes the Tonal processing tools over
//! JSON-RPC on stdio and HTTP.
//!
//! This library exposes the core components for testing purposes.

pub mod config;
pub mod error;
pub mod presets;
pub mod rpc;
pub mod state;
pub mod tools;
pub mod transport;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError, ToolError, ToolErrorCode, ToolResult};
pub use presets::{Preset, PresetCategory};
pub use state::AppState;
pub use tools::call_tool;
