//! Bridge against a real tool server
//!
//! Starts the `kali-tools` router on an ephemeral port and drives it through
//! the remote client and the dispatcher, so the HTTP contract between the two
//! crates is checked end to end.

use std::time::Duration;

use kali_bridge::client::{RemoteClient, RemoteReply};
use kali_bridge::dispatch::{Dispatcher, EXECUTE_COMMAND, SERVER_HEALTH};
use kali_tools::config::ServerConfig;
use kali_tools::server::{self, AppState};
use serde_json::json;
use tokio_util::sync::CancellationToken;

struct Running {
    client: RemoteClient,
    cancel: CancellationToken,
}

impl Drop for Running {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn start() -> Running {
    let config = ServerConfig {
        command_timeout_secs: 2,
        grace_period_secs: 1,
        essential_tools: vec!["sh".to_string()],
        ..Default::default()
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let cancel = CancellationToken::new();
    tokio::spawn(server::serve(listener, AppState::new(&config), cancel.clone()));
    Running {
        client: RemoteClient::new(format!("http://{addr}"), Duration::from_secs(10)),
        cancel,
    }
}

#[tokio::test]
async fn test_execute_command_round_trip() {
    let server = start().await;
    let result = server.client.execute_command("echo hello").await;
    assert_eq!(result["stdout"], "hello\n");
    assert_eq!(result["stderr"], "");
    assert_eq!(result["return_code"], 0);
    assert_eq!(result["success"], true);
    assert_eq!(result["timed_out"], false);
    assert_eq!(result["partial_results"], false);
}

#[tokio::test]
async fn test_remote_timeout_is_qualified_success() {
    let server = start().await;
    let result = server
        .client
        .execute_command("echo partial; sleep 10")
        .await;
    assert_eq!(result["stdout"], "partial\n");
    assert_eq!(result["return_code"], -1);
    assert_eq!(result["success"], true);
    assert_eq!(result["timed_out"], true);
    assert_eq!(result["partial_results"], true);
}

#[tokio::test]
async fn test_health_round_trip() {
    let server = start().await;
    let reply = server.client.check_health().await;
    let RemoteReply::Payload(body) = reply else {
        panic!("health check failed: {reply:?}");
    };
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["tools_status"]["sh"], true);
    assert_eq!(body["all_essential_tools_available"], true);
}

#[tokio::test]
async fn test_server_rejection_reaches_caller() {
    let server = start().await;
    let body = server
        .client
        .post("api/command", &json!({}))
        .await
        .into_json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Command parameter is required");

    let body = server
        .client
        .post("api/tools/not_a_tool", &json!({}))
        .await
        .into_json();
    assert_eq!(body["error"], "Unknown tool: not_a_tool");
}

#[tokio::test]
async fn test_dispatcher_calls() {
    let server = start().await;
    let dispatcher = Dispatcher::new(server.client.clone()).unwrap();

    let health = dispatcher.call(SERVER_HEALTH, json!({})).await;
    assert_eq!(health["status"], "healthy");

    let result = dispatcher
        .call(EXECUTE_COMMAND, json!({"command": "printf abc"}))
        .await;
    assert_eq!(result["stdout"], "abc");
    assert_eq!(result["success"], true);

    // defaults are filled by the bridge, the server renders and runs it
    let result = dispatcher
        .call(
            "proxychains_run",
            json!({"command": "echo through", "config_file": "/nonexistent.conf"}),
        )
        .await;
    assert_eq!(result["timed_out"], false);
    assert!(result.get("return_code").is_some());
}
