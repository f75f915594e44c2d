//! HTTP API — command execution, tool endpoints and health
//!
//! - `POST /api/command`      run an arbitrary shell command
//! - `POST /api/tools/:name`  render and run a catalogued tool
//! - `GET  /api/tools`        list the catalog
//! - `GET  /health`           server status and essential-tool availability

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use kali_common::{ExecutionResult, HealthReport, ToolSpec};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::commands::ParamError;
use crate::config::ServerConfig;
use crate::health::HealthChecker;
use crate::registry::Registry;
use crate::session::{self, SessionLimits};

/// Request-level failures, reported as `{"error": "..."}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Command parameter is required")]
    MissingCommand,
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error(transparent)]
    Param(#[from] ParamError),
    #[error("Server error: {0}")]
    BadRequest(String),
    #[error("Server error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::UnknownTool(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{self}");
        } else {
            warn!("Rejected request: {self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    registry: Arc<Registry>,
    limits: SessionLimits,
    health: Arc<HealthChecker>,
    scratch_dir: Option<Arc<PathBuf>>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        let limits = config.session_limits();
        Self {
            registry: Arc::new(Registry::with_builtin_tools()),
            health: Arc::new(HealthChecker::new(config.essential_tools.clone(), &limits)),
            limits,
            scratch_dir: config.scratch_dir.clone().map(Arc::new),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/command", post(run_command))
        .route("/api/tools", get(list_tools))
        .route("/api/tools/:name", post(run_tool))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until `cancel` fires.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!("Kali tool API server listening on http://{addr}");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .context("Tool API server failed")
}

async fn run_command(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ExecutionResult>, ApiError> {
    let Json(body) = body?;
    let command = body
        .get("command")
        .and_then(Value::as_str)
        .filter(|c| !c.is_empty())
        .ok_or(ApiError::MissingCommand)?;
    Ok(Json(session::run(command, &state.limits).await))
}

async fn run_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ExecutionResult>, ApiError> {
    if state.registry.get_tool(&name).is_none() {
        return Err(ApiError::UnknownTool(name));
    }
    let Json(body) = body?;
    let Value::Object(params) = body else {
        return Err(ApiError::BadRequest(
            "request body must be a JSON object".to_string(),
        ));
    };

    let rendered = state
        .registry
        .render(&name, &params)
        .ok_or_else(|| ApiError::UnknownTool(name.clone()))??;

    // the resource script is deleted when `prepared` drops, including when
    // the client goes away mid-run
    let prepared = rendered
        .prepare(state.scratch_dir.as_deref().map(PathBuf::as_path))
        .map_err(|e| ApiError::Internal(format!("failed to write resource script: {e}")))?;
    let result = session::run(&prepared.command, &state.limits).await;
    Ok(Json(result))
}

async fn list_tools(State(state): State<AppState>) -> Json<Vec<&'static ToolSpec>> {
    Json(state.registry.list_tools())
}

async fn health_check(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.health.check_all().await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_statuses() {
        assert_eq!(ApiError::MissingCommand.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::UnknownTool("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Param(ParamError::missing("Target parameter is required")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal("disk full".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ApiError::MissingCommand.to_string(), "Command parameter is required");
        assert_eq!(
            ApiError::Param(ParamError::missing("URL parameter is required")).to_string(),
            "URL parameter is required"
        );
        assert_eq!(
            ApiError::BadRequest("expected object".into()).to_string(),
            "Server error: expected object"
        );
    }
}
