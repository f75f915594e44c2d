//! Remote invocation client for the Kali tool server
//!
//! Every failure on the way to the server (connection refused, DNS, the
//! request timing out, a non-success status, a body that is not JSON) comes
//! back as [`RemoteReply::Failed`]. No operation here returns `Err` or
//! panics, so callers only ever inspect the reply.

use std::fmt::Display;
use std::time::Duration;

use kali_common::ExecutionResult;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// Path of the command-execution endpoint
pub const COMMAND_PATH: &str = "api/command";
/// Path of the health endpoint
pub const HEALTH_PATH: &str = "health";

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Request to {url} timed out after {}s", .timeout.as_secs())]
    Timeout { url: String, timeout: Duration },
    #[error("Request failed: {0}")]
    Transport(String),
    /// Non-success status; `message` is the server's own `error` text when
    /// it sent one.
    #[error("{message}")]
    Status { status: StatusCode, message: String },
    #[error("Invalid response from server: {0}")]
    Malformed(String),
}

/// Outcome of one remote call
#[derive(Debug)]
pub enum RemoteReply {
    Payload(Value),
    Failed(RemoteError),
}

impl RemoteReply {
    pub fn is_ok(&self) -> bool {
        matches!(self, RemoteReply::Payload(_))
    }

    /// The payload as received, or `{"error": ..., "success": false}`.
    pub fn into_json(self) -> Value {
        match self {
            RemoteReply::Payload(value) => value,
            RemoteReply::Failed(e) => error_payload(e),
        }
    }

    /// Decode the payload as an execution result. Missing fields take their
    /// defaults; a failed call becomes a result with no process behind it.
    /// A payload that does not decode still keeps its `stdout` and `stderr`.
    pub fn into_result(self) -> ExecutionResult {
        match self {
            RemoteReply::Payload(value) => {
                ExecutionResult::deserialize(&value).unwrap_or_else(|e| {
                    let mut result = ExecutionResult::unreachable(
                        RemoteError::Malformed(e.to_string()).to_string(),
                    );
                    let text = |key: &str| value.get(key).and_then(Value::as_str).map(String::from);
                    result.stdout = text("stdout").unwrap_or_default();
                    result.stderr = text("stderr").unwrap_or_default();
                    result
                })
            }
            RemoteReply::Failed(e) => ExecutionResult::unreachable(e.to_string()),
        }
    }
}

/// `{"error": <message>, "success": false}`
pub fn error_payload(message: impl Display) -> Value {
    json!({
        "error": message.to_string(),
        "success": false,
    })
}

/// HTTP client bound to one tool server
#[derive(Debug, Clone)]
pub struct RemoteClient {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl RemoteClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            timeout,
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|e| {
                    warn!("Failed to build HTTP client ({e}); using defaults");
                    reqwest::Client::new()
                }),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `GET <base>/<path>` with optional query parameters. The timeout is set
    /// per request as well, so it holds even on a default-built client.
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> RemoteReply {
        let url = self.url(path);
        debug!("GET {url}");
        let sent = self
            .client
            .get(&url)
            .query(query)
            .timeout(self.timeout)
            .send()
            .await;
        self.finish(url, sent).await
    }

    /// `POST <base>/<path>` with `body` as JSON.
    pub async fn post(&self, path: &str, body: &Value) -> RemoteReply {
        let url = self.url(path);
        debug!("POST {url}");
        let sent = self
            .client
            .post(&url)
            .json(body)
            .timeout(self.timeout)
            .send()
            .await;
        self.finish(url, sent).await
    }

    /// Run `command` on the server. The result object comes back exactly as
    /// the server sent it; use [`RemoteReply::into_result`] on a `post` reply
    /// for a typed view.
    pub async fn execute_command(&self, command: &str) -> Value {
        self.post(COMMAND_PATH, &json!({ "command": command }))
            .await
            .into_json()
    }

    /// Fetch the server's status and essential-tool availability.
    pub async fn check_health(&self) -> RemoteReply {
        self.get(HEALTH_PATH, &[]).await
    }

    async fn finish(
        &self,
        url: String,
        sent: Result<reqwest::Response, reqwest::Error>,
    ) -> RemoteReply {
        let reply = match sent {
            Ok(response) => self.read(&url, response).await,
            Err(e) => RemoteReply::Failed(self.transport_error(url.clone(), e)),
        };
        if let RemoteReply::Failed(e) = &reply {
            warn!("Remote call to {url} failed: {e}");
        }
        reply
    }

    async fn read(&self, url: &str, response: reqwest::Response) -> RemoteReply {
        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return RemoteReply::Failed(self.transport_error(url.to_string(), e)),
        };
        let parsed = serde_json::from_slice::<Value>(&bytes);

        if !status.is_success() {
            let message = parsed
                .ok()
                .and_then(|body| body.get("error").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| status_message(status, &bytes));
            return RemoteReply::Failed(RemoteError::Status { status, message });
        }

        match parsed {
            Ok(value @ Value::Object(_)) => RemoteReply::Payload(value),
            Ok(other) => RemoteReply::Failed(RemoteError::Malformed(format!(
                "expected a JSON object, got {other}"
            ))),
            Err(e) => RemoteReply::Failed(RemoteError::Malformed(e.to_string())),
        }
    }

    fn transport_error(&self, url: String, e: reqwest::Error) -> RemoteError {
        if e.is_timeout() {
            RemoteError::Timeout {
                url,
                timeout: self.timeout,
            }
        } else {
            RemoteError::Transport(e.to_string())
        }
    }
}

fn status_message(status: StatusCode, body: &[u8]) -> String {
    let body = String::from_utf8_lossy(body);
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP error {status}")
    } else {
        format!("HTTP error {status}: {body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_stripped() {
        let client = RemoteClient::new("http://localhost:5001/", Duration::from_secs(60));
        assert_eq!(client.base_url(), "http://localhost:5001");
        assert_eq!(client.timeout(), Duration::from_secs(60));
        assert_eq!(client.url("health"), "http://localhost:5001/health");
        assert_eq!(client.url("/api/command"), "http://localhost:5001/api/command");
    }

    #[test]
    fn test_failed_reply_json_shape() {
        let reply = RemoteReply::Failed(RemoteError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "boom".to_string(),
        });
        assert!(!reply.is_ok());
        let json = reply.into_json();
        assert_eq!(json["error"], "boom");
        assert_eq!(json["success"], false);
    }

    #[test]
    fn test_payload_decodes_leniently() {
        let reply = RemoteReply::Payload(json!({"stdout": "output", "success": true}));
        let result = reply.into_result();
        assert_eq!(result.stdout, "output");
        assert!(result.success);
        assert_eq!(result.return_code, kali_common::NO_EXIT_CODE);
        assert!(result.stderr.is_empty());
    }

    #[test]
    fn test_payload_with_wrong_types_is_malformed() {
        let reply = RemoteReply::Payload(json!({"stdout": 42}));
        let result = reply.into_result();
        assert!(!result.success);
        assert!(result
            .error
            .unwrap()
            .starts_with("Invalid response from server: "));
    }

    #[test]
    fn test_malformed_payload_keeps_output() {
        let reply = RemoteReply::Payload(json!({
            "stdout": "found 3 hosts\n",
            "stderr": "warning\n",
            "return_code": "zero",
        }));
        let result = reply.into_result();
        assert_eq!(result.stdout, "found 3 hosts\n");
        assert_eq!(result.stderr, "warning\n");
        assert!(!result.success);
        assert!(result.error.is_some());
    }

    #[test]
    fn test_partial_results_as_text_decodes() {
        let reply = RemoteReply::Payload(json!({
            "stdout": "partial\n",
            "stderr": "",
            "return_code": -1,
            "success": true,
            "timed_out": true,
            "partial_results": "partial\n",
        }));
        let result = reply.into_result();
        assert_eq!(result.stdout, "partial\n");
        assert!(result.partial_results);
        assert!(result.is_qualified_success());
        assert!(result.error.is_none());
    }

    #[test]
    fn test_failed_reply_becomes_unreachable_result() {
        let reply = RemoteReply::Failed(RemoteError::Transport("connection refused".into()));
        let result = reply.into_result();
        assert!(!result.success);
        assert!(!result.timed_out);
        assert_eq!(result.error.as_deref(), Some("Request failed: connection refused"));
    }

    #[test]
    fn test_timeout_message() {
        let e = RemoteError::Timeout {
            url: "http://k/health".into(),
            timeout: Duration::from_secs(300),
        };
        assert_eq!(e.to_string(), "Request to http://k/health timed out after 300s");
    }

    #[test]
    fn test_status_message_fallback() {
        assert_eq!(
            status_message(StatusCode::BAD_GATEWAY, b""),
            "HTTP error 502 Bad Gateway"
        );
        assert_eq!(
            status_message(StatusCode::NOT_FOUND, b"no such page\n"),
            "HTTP error 404 Not Found: no such page"
        );
    }
}
