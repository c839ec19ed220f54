/// Queue introspection and control tools
use super::to_json;
use crate::error::ToolResult;
use crate::state::AppState;
use serde::Serialize;
use serde_json::Value;
use tonal_core::QueueStatus;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClearedQueue {
    cleared: usize,
    status: QueueStatus,
}

pub(super) async fn get_queue_status(state: &AppState) -> ToolResult<Value> {
    to_json("get_queue_status", &state.scheduler.status().await)
}

pub(super) async fn pause_queue(state: &AppState) -> ToolResult<Value> {
    state.scheduler.pause().await;
    tracing::info!("Queue paused");
    to_json("pause_queue", &state.scheduler.status().await)
}

pub(super) async fn resume_queue(state: &AppState) -> ToolResult<Value> {
    state.scheduler.resume().await;
    tracing::info!("Queue resumed");
    to_json("resume_queue", &state.scheduler.status().await)
}

pub(super) async fn clear_queue(state: &AppState) -> ToolResult<Value> {
    let cleared = state.scheduler.clear().await;
    tracing::info!(cleared, "Queue cleared");
    to_json(
        "clear_queue",
        &ClearedQueue {
            cleared,
            status: state.scheduler.status().await,
        },
    )
}
