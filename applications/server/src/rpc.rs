//! JSON-RPC 2.0 framing
//!
//! Understands the MCP-style `initialize`, `tools/list` and `tools/call`
//! methods, and also accepts a tool name as the method itself. Requests
//! without an `id` are notifications and get no response.

use crate::error::{ToolError, ToolErrorCode};
use crate::state::AppState;
use crate::tools;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const JSONRPC_VERSION: &str = "2.0";
pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "tonal-server";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Deserialize)]
struct RpcRequest {
    jsonrpc: String,
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, code: i64, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
                data,
            }),
        }
    }
}

impl From<&ToolError> for RpcError {
    fn from(err: &ToolError) -> Self {
        RpcError {
            code: err.code.rpc_code(),
            message: err.message.clone(),
            data: Some(json!({ "code": err.code, "toolName": err.tool_name })),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Handle one serialized request; `None` when no response is due
pub async fn handle_line(state: &AppState, line: &str) -> Option<String> {
    let response = match serde_json::from_str::<Value>(line) {
        Ok(value) => handle_value(state, value).await?,
        Err(e) => {
            tracing::warn!("Unparseable request: {}", e);
            RpcResponse::failure(Value::Null, PARSE_ERROR, format!("Parse error: {}", e), None)
        }
    };
    encode(&response)
}

/// Parse-error response for a request that is not readable text
pub fn parse_error(reason: impl std::fmt::Display) -> Option<String> {
    tracing::warn!("Unreadable request: {}", reason);
    encode(&RpcResponse::failure(
        Value::Null,
        PARSE_ERROR,
        format!("Parse error: {}", reason),
        None,
    ))
}

fn encode(response: &RpcResponse) -> Option<String> {
    match serde_json::to_string(response) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("Failed to serialize response: {}", e);
            None
        }
    }
}

/// Handle one decoded request
pub async fn handle_value(state: &AppState, value: Value) -> Option<RpcResponse> {
    let id_hint = value.get("id").cloned().unwrap_or(Value::Null);

    let request: RpcRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(e) => {
            return Some(RpcResponse::failure(
                id_hint,
                INVALID_REQUEST,
                format!("Invalid request: {}", e),
                None,
            ));
        }
    };

    if request.jsonrpc != JSONRPC_VERSION {
        return Some(RpcResponse::failure(
            id_hint,
            INVALID_REQUEST,
            format!("Unsupported jsonrpc version: {}", request.jsonrpc),
            None,
        ));
    }

    let Some(id) = request.id else {
        tracing::debug!(method = %request.method, "Notification");
        return None;
    };

    Some(dispatch(state, id, &request.method, request.params).await)
}

async fn dispatch(state: &AppState, id: Value, method: &str, params: Value) -> RpcResponse {
    match method {
        "initialize" => RpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "serverInfo": { "name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION") },
                "capabilities": { "tools": {} },
            }),
        ),
        "ping" => RpcResponse::success(id, json!({})),
        "tools/list" => RpcResponse::success(id, json!({ "tools": tools::catalog() })),
        "tools/call" => {
            let params: ToolCallParams = match serde_json::from_value(params) {
                Ok(params) => params,
                Err(e) => {
                    return RpcResponse::failure(
                        id,
                        INVALID_PARAMS,
                        format!("Invalid tools/call params: {}", e),
                        None,
                    );
                }
            };
            let outcome = tools::call_tool(state, &params.name, params.arguments).await;
            RpcResponse::success(id, tool_content(&params.name, outcome))
        }
        name if tools::is_known_tool(name) => match tools::call_tool(state, name, params).await {
            Ok(result) => RpcResponse::success(id, result),
            Err(err) => {
                log_tool_error(&err);
                RpcResponse {
                    jsonrpc: JSONRPC_VERSION.to_string(),
                    id,
                    result: None,
                    error: Some(RpcError::from(&err)),
                }
            }
        },
        other => RpcResponse::failure(
            id,
            METHOD_NOT_FOUND,
            format!("Method not found: {}", other),
            None,
        ),
    }
}

/// Wrap a tool outcome as an MCP content block
fn tool_content(name: &str, outcome: Result<Value, ToolError>) -> Value {
    let (payload, is_error) = match outcome {
        Ok(result) => (result, false),
        Err(err) => {
            log_tool_error(&err);
            match serde_json::to_value(&err) {
                Ok(value) => (value, true),
                Err(e) => (
                    json!({
                        "code": ToolErrorCode::InternalError,
                        "message": e.to_string(),
                        "toolName": name,
                    }),
                    true,
                ),
            }
        }
    };

    let text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
    json!({
        "content": [{ "type": "text", "text": text }],
        "isError": is_error,
    })
}

fn log_tool_error(err: &ToolError) {
    match err.code {
        ToolErrorCode::InternalError => tracing::error!(tool = %err.tool_name, "{}", err),
        _ => tracing::warn!(tool = %err.tool_name, "{}", err),
    }
}
