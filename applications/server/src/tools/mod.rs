//! Tool dispatch
//!
//! Every tool takes a JSON argument object and returns either a JSON result
//! or a [`ToolError`]. Handler faults, panics included, are converted to
//! `INTERNAL_ERROR` here and never reach the transport.

pub mod args;
pub mod catalog;
mod creative;
mod preset;
mod process;
mod queue;

use crate::error::{ToolError, ToolErrorCode, ToolResult};
use crate::state::AppState;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub use catalog::{catalog, is_known_tool, ToolDescriptor};

/// Run tool `name` with `args`
pub async fn call_tool(state: &AppState, name: &str, args: Value) -> ToolResult<Value> {
    let state = state.clone();
    let tool_name = name.to_string();
    tracing::debug!(tool = %tool_name, "Tool call");

    let handle = tokio::spawn(async move { dispatch(&state, &tool_name, args).await });
    match handle.await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(tool = %name, "Tool handler aborted: {}", e);
            Err(ToolError::internal(name, format!("Tool handler aborted: {}", e)))
        }
    }
}

async fn dispatch(state: &AppState, name: &str, args: Value) -> ToolResult<Value> {
    match name {
        "process_audio_file" => process::process_audio_file(state, args).await,
        "process_audio_batch" => process::process_audio_batch(state, args).await,
        "advanced_process" => process::advanced_process(state, args).await,
        "layer_sounds" => process::layer_sounds(state, args).await,
        "apply_preset" => preset::apply_preset(state, args).await,
        "list_presets" => preset::list_presets(args),
        "generate_variations" => creative::generate_variations(state, args).await,
        "create_harmonics" => creative::create_harmonics(state, args).await,
        "get_queue_status" => queue::get_queue_status(state).await,
        "pause_queue" => queue::pause_queue(state).await,
        "resume_queue" => queue::resume_queue(state).await,
        "clear_queue" => queue::clear_queue(state).await,
        other => Err(ToolError::new(
            ToolErrorCode::UnknownTool,
            other,
            format!("Unknown tool: {}", other),
        )),
    }
}

fn to_json<T: Serialize>(tool_name: &str, value: &T) -> ToolResult<Value> {
    serde_json::to_value(value).map_err(|e| ToolError::internal(tool_name, e.to_string()))
}

/// `dir / {input stem}_{tag}.{input extension}`, falling back to `wav`
fn tagged_output(input: &Path, dir: &Path, tag: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let extension = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "wav".to_string());
    dir.join(format!("{}_{}.{}", stem, tag, extension))
}
