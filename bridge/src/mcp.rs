//! JSON-RPC 2.0 tool-calling endpoint (MCP-style)
//!
//! - `POST /mcp`    `initialize`, `ping`, `tools/list`, `tools/call`
//! - `GET  /health` bridge liveness and the tool server it talks to
//!
//! Notifications (requests without an `id`) are accepted with `202` and no
//! body.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::dispatch::Dispatcher;

pub const SERVER_NAME: &str = "Kali-Linux-MCP";
pub const PROTOCOL_VERSION: &str = "2025-03-26";
pub const INSTRUCTIONS: &str = "This is a comprehensive MCP server for Kali Linux security tools. \
It provides access to 60+ penetration testing and security assessment tools organized by category.";

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Method not found: {0}")]
    MethodNotFound(String),
    #[error("Invalid params: {0}")]
    InvalidParams(String),
}

impl RpcError {
    pub fn code(&self) -> i64 {
        match self {
            RpcError::Parse(_) => -32700,
            RpcError::InvalidRequest(_) => -32600,
            RpcError::MethodNotFound(_) => -32601,
            RpcError::InvalidParams(_) => -32602,
        }
    }

    fn to_json(&self) -> Value {
        json!({ "code": self.code(), "message": self.to_string() })
    }
}

#[derive(Debug, Deserialize)]
struct RpcRequest {
    jsonrpc: String,
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Clone)]
pub struct McpState {
    dispatcher: Arc<Dispatcher>,
}

impl McpState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}

pub fn router(state: McpState) -> Router {
    Router::new()
        .route("/mcp", post(handle_rpc))
        .route("/health", get(bridge_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until `cancel` fires.
pub async fn serve(
    listener: TcpListener,
    state: McpState,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!("MCP bridge listening on http://{addr}/mcp");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .context("MCP bridge failed")
}

async fn bridge_health(State(state): State<McpState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "Kali MCP bridge is running",
        "kali_server": state.dispatcher.client().base_url(),
    }))
}

async fn handle_rpc(
    State(state): State<McpState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            return rpc_failure(
                StatusCode::BAD_REQUEST,
                Value::Null,
                RpcError::Parse(rejection.body_text()),
            )
        }
    };
    if body.is_array() {
        return rpc_failure(
            StatusCode::BAD_REQUEST,
            Value::Null,
            RpcError::InvalidRequest("batch requests are not supported".to_string()),
        );
    }
    let request: RpcRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(e) => {
            return rpc_failure(
                StatusCode::BAD_REQUEST,
                Value::Null,
                RpcError::InvalidRequest(e.to_string()),
            )
        }
    };
    let id = request.id.clone().unwrap_or(Value::Null);
    if request.jsonrpc != "2.0" {
        return rpc_failure(
            StatusCode::BAD_REQUEST,
            id,
            RpcError::InvalidRequest(format!("unsupported jsonrpc version {}", request.jsonrpc)),
        );
    }

    let Some(id) = request.id.clone() else {
        debug!("Notification {}", request.method);
        return StatusCode::ACCEPTED.into_response();
    };

    match dispatch(&state, request).await {
        Ok(result) => Json(json!({ "jsonrpc": "2.0", "id": id, "result": result })).into_response(),
        Err(e) => rpc_failure(StatusCode::OK, id, e),
    }
}

fn rpc_failure(status: StatusCode, id: Value, error: RpcError) -> Response {
    warn!("JSON-RPC error: {error}");
    (
        status,
        Json(json!({ "jsonrpc": "2.0", "id": id, "error": error.to_json() })),
    )
        .into_response()
}

async fn dispatch(state: &McpState, request: RpcRequest) -> Result<Value, RpcError> {
    match request.method.as_str() {
        "initialize" => Ok(initialize(&request.params)),
        "ping" => Ok(json!({})),
        "tools/list" => Ok(list_tools(&state.dispatcher)),
        "tools/call" => call_tool(&state.dispatcher, request.params).await,
        other => Err(RpcError::MethodNotFound(other.to_string())),
    }
}

fn initialize(params: &Value) -> Value {
    let version = params
        .get("protocolVersion")
        .and_then(Value::as_str)
        .unwrap_or(PROTOCOL_VERSION);
    json!({
        "protocolVersion": version,
        "capabilities": { "tools": { "listChanged": false } },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        },
        "instructions": INSTRUCTIONS,
    })
}

fn list_tools(dispatcher: &Dispatcher) -> Value {
    let tools: Vec<Value> = dispatcher
        .tools()
        .iter()
        .map(|tool| {
            json!({
                "name": tool.name,
                "description": tool.description,
                "inputSchema": tool.schema.schema(),
            })
        })
        .collect();
    json!({ "tools": tools })
}

async fn call_tool(dispatcher: &Dispatcher, params: Value) -> Result<Value, RpcError> {
    let name = params
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| RpcError::InvalidParams("missing tool name".to_string()))?;
    if dispatcher.get(name).is_none() {
        return Err(RpcError::InvalidParams(format!("Unknown tool: {name}")));
    }
    let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

    let payload = dispatcher.call(name, arguments).await;
    let is_error = payload.get("success").and_then(Value::as_bool) == Some(false);
    let text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
    Ok(json!({
        "content": [{ "type": "text", "text": text }],
        "isError": is_error,
    }))
}
