//! Execution result — the outcome record of one command invocation
//!
//! Produced once per invocation by the tool server's process session and
//! relayed unchanged over HTTP. The bridge also builds these locally when the
//! remote call itself fails, so every caller sees the same shape.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Return code reported when the process did not exit normally
/// (timeout, launch failure, transport failure).
pub const NO_EXIT_CODE: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    #[serde(default = "no_exit_code")]
    pub return_code: i32,
    #[serde(default, deserialize_with = "truthy")]
    pub success: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub timed_out: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub partial_results: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn no_exit_code() -> i32 {
    NO_EXIT_CODE
}

/// Older servers send `partial_results` as the captured text itself; any
/// non-empty, non-zero value counts as set.
fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    })
}

impl ExecutionResult {
    /// The process exited on its own before the deadline.
    pub fn completed(stdout: String, stderr: String, return_code: i32) -> Self {
        Self {
            stdout,
            stderr,
            return_code,
            success: return_code == 0,
            timed_out: false,
            partial_results: false,
            error: None,
        }
    }

    /// The deadline elapsed and the process was terminated.
    ///
    /// Any captured output turns this into a qualified success.
    pub fn timed_out(stdout: String, stderr: String) -> Self {
        let mut result = Self {
            stdout,
            stderr,
            return_code: NO_EXIT_CODE,
            success: false,
            timed_out: true,
            partial_results: false,
            error: None,
        };
        result.partial_results = result.has_output();
        result.success = result.partial_results;
        result
    }

    /// Launching or waiting on the process failed.
    pub fn failed(stdout: String, stderr: String, error: impl Into<String>) -> Self {
        let error = error.into();
        let partial_results = !stdout.is_empty() || !stderr.is_empty();
        Self {
            stderr: format!("Error executing command: {error}\n{stderr}"),
            stdout,
            return_code: NO_EXIT_CODE,
            success: false,
            timed_out: false,
            partial_results,
            error: Some(error),
        }
    }

    /// The invocation never reached a process (network, protocol or
    /// validation failure on the calling side).
    pub fn unreachable(error: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            return_code: NO_EXIT_CODE,
            success: false,
            timed_out: false,
            partial_results: false,
            error: Some(error.into()),
        }
    }

    pub fn has_output(&self) -> bool {
        !self.stdout.is_empty() || !self.stderr.is_empty()
    }

    /// Timed out but kept because partial output was captured.
    pub fn is_qualified_success(&self) -> bool {
        self.timed_out && self.success
    }
}
