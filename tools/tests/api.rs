//! Integration tests for the tool server's HTTP API
//!
//! Requests go straight into the router with `tower::ServiceExt::oneshot`.
//! Tool endpoints are exercised with commands that exist on any Unix host.

use std::os::unix::fs::PermissionsExt;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use kali_common::{ExecutionResult, HealthReport};
use kali_tools::config::ServerConfig;
use kali_tools::server::{router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let config = ServerConfig {
        command_timeout_secs: 5,
        grace_period_secs: 1,
        essential_tools: vec!["sh".to_string(), "no_such_tool_kali_test".to_string()],
        ..Default::default()
    };
    router(AppState::new(&config))
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ============================================================================
// /api/command
// ============================================================================

#[tokio::test]
async fn test_command_returns_execution_result() {
    let (status, body) = send(app(), Method::POST, "/api/command", Some(json!({"command": "echo hello"}))).await;
    assert_eq!(status, StatusCode::OK);
    let result: ExecutionResult = serde_json::from_value(body).unwrap();
    assert_eq!(result.stdout, "hello\n");
    assert_eq!(result.return_code, 0);
    assert!(result.success);
}

#[tokio::test]
async fn test_command_failure_is_still_200() {
    let (status, body) = send(app(), Method::POST, "/api/command", Some(json!({"command": "false"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["return_code"], 1);
}

#[tokio::test]
async fn test_command_timeout_reports_partial_results() {
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/command",
        Some(json!({"command": "echo partial; sleep 30"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timed_out"], true);
    assert_eq!(body["partial_results"], true);
    assert_eq!(body["success"], true);
    assert_eq!(body["stdout"], "partial\n");
}

#[tokio::test]
async fn test_missing_command_is_400() {
    let (status, body) = send(app(), Method::POST, "/api/command", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Command parameter is required");

    let (status, _) = send(app(), Method::POST, "/api/command", Some(json!({"command": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/command")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Server error: "));
}

// ============================================================================
// /api/tools
// ============================================================================

#[tokio::test]
async fn test_unknown_tool_is_404() {
    let (status, body) = send(app(), Method::POST, "/api/tools/not_a_tool", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Unknown tool: not_a_tool");
}

#[tokio::test]
async fn test_tool_parameter_error_is_400() {
    let (status, body) = send(app(), Method::POST, "/api/tools/nmap", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Target parameter is required");

    let (status, body) = send(
        app(),
        Method::POST,
        "/api/tools/gobuster",
        Some(json!({"url": "http://t", "mode": "invalid"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid mode: invalid. Must be one of: dir, dns, fuzz, vhost");
}

#[tokio::test]
async fn test_tool_body_must_be_object() {
    let (status, body) = send(app(), Method::POST, "/api/tools/nmap", Some(json!(["10.0.0.1"]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Server error: request body must be a JSON object");
}

/// The rendered command runs through a session; a tool that is not installed
/// comes back as a normal result with the shell's exit code
#[tokio::test]
async fn test_tool_runs_rendered_command() {
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/tools/proxychains",
        Some(json!({"command": "echo via-proxy", "config_file": "/nonexistent.conf"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let result: ExecutionResult = serde_json::from_value(body).unwrap();
    assert!(!result.timed_out);
    assert!(result.error.is_none());
}

/// Dropping an in-flight request must still remove the metasploit resource
/// script. The shell is swapped for a slow stand-in so the run outlives the
/// abort.
#[tokio::test]
async fn test_abandoned_request_removes_resource_script() {
    let dir = tempfile::tempdir().unwrap();
    let shell = dir.path().join("slow_shell");
    std::fs::write(&shell, "#!/bin/sh\nsleep 5\n").unwrap();
    std::fs::set_permissions(&shell, std::fs::Permissions::from_mode(0o755)).unwrap();
    let scratch = dir.path().join("scratch");
    std::fs::create_dir(&scratch).unwrap();

    let config = ServerConfig {
        command_timeout_secs: 30,
        grace_period_secs: 1,
        shell: shell.display().to_string(),
        essential_tools: vec![],
        scratch_dir: Some(scratch.clone()),
        ..Default::default()
    };
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/tools/metasploit")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"module": "exploit/multi/handler"}).to_string()))
        .unwrap();
    let handle = tokio::spawn(router(AppState::new(&config)).oneshot(request));

    let scripts = || std::fs::read_dir(&scratch).unwrap().count();
    for _ in 0..100 {
        if scripts() > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(scripts(), 1, "resource script was never written");
    let name = std::fs::read_dir(&scratch).unwrap().next().unwrap().unwrap().file_name();
    assert!(name.to_string_lossy().starts_with("kali_msf_"));

    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());
    assert_eq!(scripts(), 0);
}

#[tokio::test]
async fn test_list_tools() {
    let (status, body) = send(app(), Method::GET, "/api/tools", None).await;
    assert_eq!(status, StatusCode::OK);
    let tools = body.as_array().unwrap();
    assert_eq!(tools.len(), kali_common::catalog::TOOLS.len());
    assert_eq!(tools[0]["name"], "nmap");
    assert_eq!(tools[0]["function"], "nmap_scan");
    assert_eq!(tools[0]["category"], "network_scanning");
}

// ============================================================================
// /health
// ============================================================================

#[tokio::test]
async fn test_health_reports_tool_status() {
    let (status, body) = send(app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    let report: HealthReport = serde_json::from_value(body).unwrap();
    assert_eq!(report.status, "healthy");
    assert_eq!(report.message, "Kali Linux Tools API Server is running");
    assert_eq!(report.tools_status.get("sh"), Some(&true));
    assert_eq!(report.tools_status.get("no_such_tool_kali_test"), Some(&false));
    assert!(!report.all_essential_tools_available);
}
