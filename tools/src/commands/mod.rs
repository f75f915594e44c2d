//! Command renderers — turn tool parameters into shell command lines
//!
//! One module per tool category. Each exposes `register_tools(reg)`, which
//! binds every catalog entry of that category to its renderer. Renderers are
//! pure: they read a request body and produce the command string handed to a
//! process session, or a parameter error that the server reports as 400.

pub mod exploitation;
pub mod forensics;
pub mod network;
pub mod password;
pub mod recon;
pub mod shells;
pub mod utility;
pub mod vuln;
pub mod web;
pub mod windows;
pub mod wireless;

use std::io::{self, Write};
use std::path::Path;

use kali_common::{ParamKind, ToolSpec};
use serde_json::{Map, Value};
use tempfile::TempPath;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// A required parameter (or combination) is missing or empty
    #[error("{0}")]
    Missing(String),
    /// Parameters are present but not usable together
    #[error("{0}")]
    Invalid(String),
}

impl ParamError {
    pub fn missing(message: impl Into<String>) -> Self {
        Self::Missing(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// Script a command reads from disk while it runs. Its path is appended to
/// the command line once the file exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceScript {
    /// File name prefix, e.g. `kali_msf_`
    pub prefix: &'static str,
    /// File name suffix, e.g. `.rc`
    pub suffix: &'static str,
    pub content: String,
}

/// A rendered invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub command: String,
    pub resource: Option<ResourceScript>,
}

impl From<String> for Rendered {
    fn from(command: String) -> Self {
        Self {
            command,
            resource: None,
        }
    }
}

impl Rendered {
    /// Write the resource script, if any, under `dir` (the system temp dir
    /// when `None`) and produce the final command line.
    pub fn prepare(self, dir: Option<&Path>) -> io::Result<Prepared> {
        let Some(script) = self.resource else {
            return Ok(Prepared {
                command: self.command,
                script: None,
            });
        };

        let mut builder = tempfile::Builder::new();
        builder.prefix(script.prefix).suffix(script.suffix);
        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(script.content.as_bytes())?;
        file.flush()?;
        let path = file.into_temp_path();
        Ok(Prepared {
            command: format!("{} {}", self.command, path.display()),
            script: Some(path),
        })
    }
}

/// A command ready to run. The resource script lives exactly as long as this
/// value and is deleted when it drops, whether the run finished or not.
#[derive(Debug)]
pub struct Prepared {
    pub command: String,
    script: Option<TempPath>,
}

impl Prepared {
    pub fn script_path(&self) -> Option<&Path> {
        self.script.as_deref()
    }
}

pub type Renderer = fn(&Params<'_>) -> Result<Rendered, ParamError>;

/// Request parameters of one tool call, with catalog defaults behind them
pub struct Params<'a> {
    spec: &'static ToolSpec,
    body: &'a Map<String, Value>,
}

impl<'a> Params<'a> {
    pub fn new(spec: &'static ToolSpec, body: &'a Map<String, Value>) -> Self {
        Self { spec, body }
    }

    /// Raw JSON value as sent, or the catalog default
    pub fn raw(&self, name: &str) -> Option<Value> {
        match self.body.get(name) {
            Some(Value::Null) | None => self.spec.param(name).and_then(|p| p.default_value()),
            Some(value) => Some(value.clone()),
        }
    }

    /// Textual value. A parameter sent as an empty string stays empty and
    /// does not fall back to its default.
    pub fn value(&self, name: &str) -> String {
        self.raw(name).map(|v| text(&v)).unwrap_or_default()
    }

    /// Value if present and non-empty
    pub fn opt(&self, name: &str) -> Option<String> {
        Some(self.value(name)).filter(|v| !v.is_empty())
    }

    pub fn required(&self, name: &str, message: &str) -> Result<String, ParamError> {
        self.opt(name).ok_or_else(|| ParamError::missing(message))
    }

    /// Fail with `message` unless every name has a non-empty value.
    pub fn require_all(&self, names: &[&str], message: &str) -> Result<(), ParamError> {
        if names.iter().all(|name| self.opt(name).is_some()) {
            Ok(())
        } else {
            Err(ParamError::missing(message))
        }
    }

    pub fn flag(&self, name: &str) -> bool {
        match self.raw(name) {
            Some(Value::Bool(b)) => b,
            Some(Value::String(s)) => matches!(s.as_str(), "true" | "True" | "1" | "yes"),
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            _ => false,
        }
    }

    /// Key/value pairs of an object parameter, in the order they were sent
    pub fn pairs(&self, name: &str) -> Vec<(String, String)> {
        match self.raw(name) {
            Some(Value::Object(map)) => map.iter().map(|(k, v)| (k.clone(), text(v))).collect(),
            _ => Vec::new(),
        }
    }

    /// Append `additional_args` when set
    pub fn append_args(&self, command: &mut String) {
        if let Some(args) = self.opt("additional_args") {
            command.push(' ');
            command.push_str(&args);
        }
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parameter kinds a request body must not contradict
pub fn check_kinds(spec: &ToolSpec, body: &Map<String, Value>) -> Result<(), ParamError> {
    for param in spec.params {
        let Some(value) = body.get(param.name) else {
            continue;
        };
        let ok = match (param.kind, value) {
            (_, Value::Null) => true,
            (ParamKind::Object, v) => v.is_object(),
            (ParamKind::Boolean, v) => v.is_boolean() || v.is_string() || v.is_number(),
            (ParamKind::String, v) => !v.is_object() && !v.is_array(),
        };
        if !ok {
            return Err(ParamError::invalid(format!(
                "Parameter '{}' has the wrong type",
                param.name
            )));
        }
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use serde_json::json;

    #[test]
    fn test_defaults_fill_missing_params() {
        assert_eq!(
            command("nmap", json!({"target": "10.0.0.1"})),
            "nmap -sCV -T4 -Pn 10.0.0.1"
        );
    }

    #[test]
    fn test_explicit_empty_string_overrides_default() {
        assert_eq!(
            command("nmap", json!({"target": "10.0.0.1", "additional_args": ""})),
            "nmap -sCV 10.0.0.1"
        );
    }

    #[test]
    fn test_null_falls_back_to_default() {
        assert_eq!(
            command("masscan", json!({"target": "10.0.0.0/24", "rate": null})),
            "masscan 10.0.0.0/24 -p0-65535 --rate 1000"
        );
    }

    #[test]
    fn test_numbers_render_as_text() {
        assert_eq!(
            command("beef", json!({"port": 8080})),
            "beef-xss -p 8080"
        );
    }

    #[test]
    fn test_boolean_flag_from_string() {
        assert_eq!(
            command("binwalk", json!({"file_path": "fw.bin", "extract": "true"})),
            "binwalk -e fw.bin"
        );
    }

    #[test]
    fn test_missing_required_param() {
        assert_eq!(error("nikto", json!({})), "Target parameter is required");
        assert_eq!(error("nikto", json!({"target": ""})), "Target parameter is required");
    }

    #[test]
    fn test_wrong_kind_rejected() {
        assert_eq!(
            error("nmap", json!({"target": ["a", "b"]})),
            "Parameter 'target' has the wrong type"
        );
        assert_eq!(
            error("metasploit", json!({"module": "x", "options": "RHOSTS=1"})),
            "Parameter 'options' has the wrong type"
        );
    }
}
